//! Java input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// x = sc.nextInt(), arr[i] = sc.nextInt()
    static ref SCANNER_READ: Regex = Regex::new(
        r"([A-Za-z_]\w*)(\s*\[[^\]]*\])?\s*=\s*(\w+)\s*\.\s*(nextInt|nextLong|nextByte|nextShort|nextDouble|nextFloat|nextBoolean|nextLine|next)\s*\(\s*\)"
    ).unwrap();

    /// line = br.readLine()
    static ref READ_LINE: Regex =
        Regex::new(r"([A-Za-z_]\w*)\s*=\s*(\w+)\s*\.\s*readLine\s*\(\s*\)").unwrap();

    /// n = Integer.parseInt(<expr>)
    static ref PARSE: Regex = Regex::new(
        r"([A-Za-z_]\w*)\s*=\s*(Integer\.parseInt|Long\.parseLong|Double\.parseDouble|Float\.parseFloat)\s*\(((?:[^()]|\((?:[^()]|\([^()]*\))*\))*)\)"
    ).unwrap();

    /// A read call inside a parse argument.
    static ref READ_CALL: Regex = Regex::new(r"\b(?:readLine|next\w*)\s*\(").unwrap();
}

/// Java language analyzer.
pub struct JavaAnalyzer;

fn scanner_type(method: &str) -> InputType {
    match method {
        "nextInt" | "nextLong" | "nextByte" | "nextShort" => InputType::Int,
        "nextDouble" | "nextFloat" => InputType::Float,
        "nextLine" => InputType::Line,
        _ => InputType::String,
    }
}

fn parse_type(call: &str) -> InputType {
    match call {
        "Integer.parseInt" | "Long.parseLong" => InputType::Int,
        _ => InputType::Float,
    }
}

impl LanguageAnalyzer for JavaAnalyzer {
    fn language(&self) -> Language {
        Language::Java
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::Halved
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        // Any receiver counts, including scanners passed in as parameters.
        for caps in SCANNER_READ.captures_iter(code) {
            let name = caps[1].to_string();
            let method = &caps[4];
            let input_type = scanner_type(method);
            let req = if caps.get(2).is_some() {
                let description = format!("Input {} values for {} ({})", input_type, name, method);
                InputRequirement::array(input_type, name, description)
            } else {
                let description = format!("Input {} value for {} ({})", input_type, name, method);
                InputRequirement::scalar(input_type, name, description)
            };
            found.record(caps.get(0).map_or(0, |m| m.start()), Claim::Always, req);
        }

        for caps in READ_LINE.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input line of text for {} (BufferedReader)", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(InputType::Line, name, description),
            );
        }

        for caps in PARSE.captures_iter(code) {
            if !READ_CALL.is_match(&caps[3]) {
                continue;
            }
            let name = caps[1].to_string();
            let input_type = parse_type(&caps[2]);
            let description = format!("Input {} value for {} ({})", input_type, name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        Ok(())
    }
}
