//! Go input analyzer.
//!
//! Buffered reads only count when the scanner or reader was built over
//! `os.Stdin`, and `strconv` conversions only count when their argument
//! comes from such a read.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{
    format_conversions, mentions_any, split_args, target_name, Claim, RequirementSet,
};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

/// Left-hand side of a (possibly multi-result) assignment; captures the first name.
const LHS: &str = r"\b(\w+)(?:\s*,\s*\w+)*\s*:?=\s*";

lazy_static! {
    /// fmt.Scanf("%d %f", &a, &b)
    static ref SCANF: Regex =
        Regex::new(r#"\bfmt\.Scanf\s*\(\s*"([^"]*)"\s*,\s*([^)]+)\)"#).unwrap();

    /// fmt.Scan(&a, &b)
    static ref SCAN: Regex = Regex::new(r"\bfmt\.Scan\s*\(\s*([^)]+)\)").unwrap();

    /// fmt.Scanln(&a, &b)
    static ref SCANLN: Regex = Regex::new(r"\bfmt\.Scanln\s*\(\s*([^)]+)\)").unwrap();

    static ref SCANNER_DECL: Regex =
        Regex::new(r"\b(\w+)\s*:?=\s*bufio\.NewScanner\s*\(\s*os\.Stdin\s*\)").unwrap();

    static ref READER_DECL: Regex =
        Regex::new(r"\b(\w+)\s*:?=\s*bufio\.NewReader\s*\(\s*os\.Stdin\s*\)").unwrap();

    /// line := scanner.Text()
    static ref TEXT: Regex =
        Regex::new(&format!(r"{LHS}(\w+)\.Text\s*\(\s*\)")).unwrap();

    /// line, _ := reader.ReadString('\n')
    static ref READ_STRING: Regex =
        Regex::new(&format!(r"{LHS}(\w+)\.ReadString\s*\(")).unwrap();

    /// line, _, _ := reader.ReadLine()
    static ref READ_LINE: Regex =
        Regex::new(&format!(r"{LHS}(\w+)\.ReadLine\s*\(\s*\)")).unwrap();

    /// n, _ := strconv.Atoi(<expr>)
    static ref CONVERSION: Regex = Regex::new(&format!(
        r"{LHS}strconv\.(Atoi|ParseFloat|ParseInt)\s*\(((?:[^()]|\((?:[^()]|\([^()]*\))*\))*)\)"
    )).unwrap();

    /// A buffered read call inside a conversion argument.
    static ref READ_CALL: Regex =
        Regex::new(r"\.(?:Text|ReadString|ReadLine)\s*\(").unwrap();

    static ref RAW_READ: Regex = Regex::new(r"\bos\.Stdin\.Read\s*\(").unwrap();
}

/// Go language analyzer.
pub struct GoAnalyzer;

impl GoAnalyzer {
    /// Type of `name` from the nearest `var` declaration in `preceding`.
    fn declared_type(&self, preceding: &str, name: &str) -> anyhow::Result<InputType> {
        let decl = Regex::new(&format!(
            r"\bvar\s+(?:\w+\s*,\s*)*{}\b(?:\s*,\s*\w+)*\s+(?:\[\w*\])?(\w+)",
            regex::escape(name)
        ))?;
        Ok(decl
            .captures_iter(preceding)
            .last()
            .map_or(InputType::String, |caps| go_type(&caps[1])))
    }

    fn record_scan(
        &self,
        found: &mut RequirementSet,
        code: &str,
        offset: usize,
        targets: &str,
    ) -> anyhow::Result<()> {
        for target in split_args(targets) {
            let name = target_name(&target);
            let input_type = self.declared_type(&code[..offset], &name)?;
            let req = if target.contains('[') {
                let description = format!("Input {} values for {} (fmt.Scan)", input_type, name);
                InputRequirement::array(input_type, name, description)
            } else {
                let description = format!("Input {} value for {} (fmt.Scan)", input_type, name);
                InputRequirement::scalar(input_type, name, description)
            };
            found.record(offset, Claim::Always, req);
        }
        Ok(())
    }
}

fn go_type(type_name: &str) -> InputType {
    match type_name {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" => InputType::Int,
        "float32" | "float64" => InputType::Float,
        _ => InputType::String,
    }
}

fn handles(pattern: &Regex, code: &str) -> HashSet<String> {
    pattern
        .captures_iter(code)
        .map(|caps| caps[1].to_string())
        .collect()
}

impl LanguageAnalyzer for GoAnalyzer {
    fn language(&self) -> Language {
        Language::Go
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::Halved
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in SCANF.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            let names: Vec<String> = split_args(&caps[2]).iter().map(|t| target_name(t)).collect();
            for (index, conv) in format_conversions(&caps[1]).into_iter().enumerate() {
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

        for caps in SCAN.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            self.record_scan(found, code, offset, &caps[1])?;
        }

        for caps in SCANLN.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            for target in split_args(&caps[1]) {
                let name = target_name(&target);
                let description = format!("Input string value for {} (fmt.Scanln)", name);
                found.record(
                    offset,
                    Claim::Always,
                    InputRequirement::scalar(InputType::String, name, description),
                );
            }
        }

        let scanners = handles(&SCANNER_DECL, code);
        let readers = handles(&READER_DECL, code);
        let mut produced: HashSet<String> = HashSet::new();

        let buffered: [(&Regex, &HashSet<String>, InputType, &str); 3] = [
            (&*TEXT, &scanners, InputType::String, "bufio.Scanner"),
            (&*READ_STRING, &readers, InputType::String, "ReadString"),
            (&*READ_LINE, &readers, InputType::Line, "ReadLine"),
        ];
        for (pattern, sources, input_type, via) in buffered {
            for caps in pattern.captures_iter(code) {
                if !sources.contains(&caps[2]) {
                    continue;
                }
                let name = caps[1].to_string();
                produced.insert(name.clone());
                let description = format!("Input {} value for {} ({})", input_type, name, via);
                found.record(
                    caps.get(0).map_or(0, |m| m.start()),
                    Claim::Always,
                    InputRequirement::scalar(input_type, name, description),
                );
            }
        }

        for caps in CONVERSION.captures_iter(code) {
            let argument = &caps[3];
            if !READ_CALL.is_match(argument) && !mentions_any(argument, &produced) {
                continue;
            }
            let name = caps[1].to_string();
            let input_type = match &caps[2] {
                "ParseFloat" => InputType::Float,
                _ => InputType::Int,
            };
            let description = format!("Input {} value for {} (strconv.{})", input_type, name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        if let Some(m) = RAW_READ.find(code) {
            found.record(
                m.start(),
                Claim::Unclaimed,
                InputRequirement::scalar(
                    InputType::String,
                    "stdinInput",
                    "Input data from stdin".to_string(),
                ),
            );
        }

        Ok(())
    }
}
