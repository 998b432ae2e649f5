//! C input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{format_conversions, split_args, target_name, Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// scanf("fmt", &a, &b)
    static ref SCANF: Regex =
        Regex::new(r#"\bscanf\s*\(\s*"([^"]*)"\s*,\s*([^)]+)\)"#).unwrap();

    /// fscanf(stdin, "fmt", &a, &b)
    static ref FSCANF: Regex =
        Regex::new(r#"\bfscanf\s*\(\s*stdin\s*,\s*"([^"]*)"\s*,\s*([^)]+)\)"#).unwrap();

    /// gets(buf)
    static ref GETS: Regex = Regex::new(r"\bgets\s*\(\s*([^)]+?)\s*\)").unwrap();

    /// fgets(buf, size, stdin)
    static ref FGETS: Regex =
        Regex::new(r"\bfgets\s*\(\s*([^,]+?)\s*,\s*([^,]+?)\s*,\s*stdin\s*\)").unwrap();

    /// c = getchar()
    static ref GETCHAR: Regex = Regex::new(r"(\w+)\s*=\s*getchar\s*\(\s*\)").unwrap();

    /// c = getc(stdin) / fgetc(stdin)
    static ref GETC: Regex = Regex::new(r"(\w+)\s*=\s*f?getc\s*\(\s*stdin\s*\)").unwrap();
}

/// C language analyzer.
pub struct CAnalyzer;

impl CAnalyzer {
    /// Record one requirement per assigning directive of a scanf-style call.
    fn record_formatted(
        &self,
        found: &mut RequirementSet,
        offset: usize,
        format: &str,
        targets: &str,
    ) {
        let names: Vec<String> = split_args(targets).iter().map(|t| target_name(t)).collect();

        for (index, conv) in format_conversions(format).into_iter().enumerate() {
            let input_type = InputType::from_conversion(conv);
            let name = names
                .get(index)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("var{}", index));
            let description = format!("Input {} value for {}", input_type, name);
            found.record(
                offset,
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }
    }
}

impl LanguageAnalyzer for CAnalyzer {
    fn language(&self) -> Language {
        Language::C
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::Halved
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in SCANF.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            self.record_formatted(found, offset, &caps[1], &caps[2]);
        }

        for caps in FSCANF.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            self.record_formatted(found, offset, &caps[1], &caps[2]);
        }

        for (pattern, what) in [(&*GETS, "gets"), (&*FGETS, "fgets")] {
            for caps in pattern.captures_iter(code) {
                let name = target_name(&caps[1]);
                found.record(
                    caps.get(0).map_or(0, |m| m.start()),
                    Claim::Always,
                    InputRequirement::scalar(
                        InputType::Line,
                        name.clone(),
                        format!("Input line of text for {} ({})", name, what),
                    ),
                );
            }
        }

        for pattern in [&*GETCHAR, &*GETC] {
            for caps in pattern.captures_iter(code) {
                let name = caps[1].to_string();
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
        }

        Ok(())
    }
}
