//! C++ input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{target_name, Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// cin >> a >> b[i] >> c
    static ref CIN: Regex = Regex::new(
        r"\b(?:std::)?cin((?:\s*>>\s*[A-Za-z_][A-Za-z0-9_.]*(?:\s*\[[^\]]*\])*)+)"
    ).unwrap();

    /// getline(cin, s)
    static ref GETLINE: Regex =
        Regex::new(r"\b(?:std::)?getline\s*\(\s*(?:std::)?cin\s*,\s*([A-Za-z_]\w*)\s*\)").unwrap();

    /// getline(cin, s, ',')
    static ref GETLINE_DELIM: Regex = Regex::new(
        r"\b(?:std::)?getline\s*\(\s*(?:std::)?cin\s*,\s*([A-Za-z_]\w*)\s*,\s*([^)]+?)\s*\)"
    ).unwrap();

    /// cin.get(c)
    static ref CIN_GET: Regex = Regex::new(r"\bcin\s*\.\s*get\s*\(\s*([^,()]+?)\s*\)").unwrap();

    /// cin.getline(buf, size)
    static ref CIN_GETLINE: Regex =
        Regex::new(r"\bcin\s*\.\s*getline\s*\(\s*([^,]+?)\s*,\s*([^)]+?)\s*\)").unwrap();
}

/// Primitive declarations whose type the analyzer can read back.
const DECL_TYPES: &str = "int|long|short|unsigned|float|double|char|string|bool";

/// C++ language analyzer.
pub struct CppAnalyzer;

impl CppAnalyzer {
    /// Find the nearest declaration of `name` in `preceding` and map its type.
    fn declared_type(&self, preceding: &str, name: &str) -> anyhow::Result<InputType> {
        let escaped = regex::escape(name);
        let scalar = Regex::new(&format!(
            r"\b({DECL_TYPES})\b\s+(?:[A-Za-z_]\w*(?:\s*\[[^\]]*\])*(?:\s*=\s*[^,;]+)?\s*,\s*)*{escaped}\b"
        ))?;
        let vector = Regex::new(&format!(
            r"\bvector\s*<\s*(?:std::)?(\w+)\s*>\s+(?:[A-Za-z_]\w*(?:\s*\([^)]*\))?\s*,\s*)*{escaped}\b"
        ))?;

        let nearest = scalar
            .captures_iter(preceding)
            .chain(vector.captures_iter(preceding))
            .filter_map(|caps| caps.get(1).map(|m| (m.start(), m.as_str().to_string())))
            .max_by_key(|(start, _)| *start);

        Ok(match nearest {
            Some((_, type_name)) => match type_name.as_str() {
                "unsigned" => InputType::Int,
                "string" => InputType::String,
                other => InputType::from_type_name(other),
            },
            None => InputType::String,
        })
    }
}

impl LanguageAnalyzer for CppAnalyzer {
    fn language(&self) -> Language {
        Language::Cpp
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::Halved
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in CIN.captures_iter(code) {
            let whole = caps.get(0).map_or(0..0, |m| m.range());
            let preceding = &code[..whole.start];

            for target in caps[1].split(">>").map(str::trim).filter(|t| !t.is_empty()) {
                let name = target_name(target);
                let input_type = self.declared_type(preceding, &name)?;
                let req = if target.contains('[') {
                    InputRequirement::array(
                        input_type,
                        name.clone(),
                        format!("Input {} values for {}", input_type, name),
                    )
                } else {
                    InputRequirement::scalar(
                        input_type,
                        name.clone(),
                        format!("Input {} value for {}", input_type, name),
                    )
                };
                found.record(whole.start, Claim::Always, req);
            }
        }

        for caps in GETLINE.captures_iter(code) {
            let name = caps[1].to_string();
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(
                    InputType::Line,
                    name.clone(),
                    format!("Input line of text for {}", name),
                ),
            );
        }

        for caps in GETLINE_DELIM.captures_iter(code) {
            let name = caps[1].to_string();
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(
                    InputType::Line,
                    name.clone(),
                    format!("Input line of text for {} (with delimiter {})", name, &caps[2]),
                ),
            );
        }

        for caps in CIN_GET.captures_iter(code) {
            let name = target_name(&caps[1]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(
                    InputType::Char,
                    name.clone(),
                    format!("Input character for {}", name),
                ),
            );
        }

        for caps in CIN_GETLINE.captures_iter(code) {
            let name = target_name(&caps[1]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(
                    InputType::Line,
                    name.clone(),
                    format!("Input line of text for {}", name),
                ),
            );
        }

        Ok(())
    }
}
