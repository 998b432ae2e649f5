//! JavaScript (Node) input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// const x = readline() / readlineSync.questionInt(...)
    static ref DECLARED_READ: Regex = Regex::new(
        r"\b(?:const|let|var)\s+(\w+)\s*=\s*(readline|readlineSync(?:\.(?:question|questionInt|questionFloat))?)\s*\("
    ).unwrap();

    /// parseInt(readline()) / parseFloat(prompt(...))
    static ref PARSED_READ: Regex =
        Regex::new(r"\b(parseInt|parseFloat)\s*\(\s*(readline|prompt)\s*\(").unwrap();

    /// x = prompt(...)
    static ref PROMPT: Regex = Regex::new(r"(\w+)\s*=\s*prompt\s*\(").unwrap();

    /// process.argv[2]
    static ref ARGV: Regex = Regex::new(r"\bprocess\.argv\s*\[\s*(\d+)\s*\]").unwrap();

    /// Event-driven or whole-stream stdin consumption.
    static ref STDIN_STREAM: Vec<Regex> = vec![
        Regex::new(r#"\bprocess\.stdin\.on\s*\(\s*['"]data['"]"#).unwrap(),
        Regex::new(r"\bprocess\.stdin\.resume\s*\(").unwrap(),
        Regex::new(r"\bcreateInterface\s*\(\s*\{[^}]*\binput\s*:\s*process\.stdin\b").unwrap(),
        Regex::new(r#"\breadFileSync\s*\(\s*(?:0|['"]/dev/stdin['"])"#).unwrap(),
    ];
}

/// JavaScript language analyzer.
pub struct JavaScriptAnalyzer;

impl LanguageAnalyzer for JavaScriptAnalyzer {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::PerRequirement
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in DECLARED_READ.captures_iter(code) {
            let name = caps[1].to_string();
            let (input_type, via) = match &caps[2] {
                "readline" => (InputType::String, "readline"),
                "readlineSync.questionInt" => (InputType::Int, "questionInt"),
                "readlineSync.questionFloat" => (InputType::Float, "questionFloat"),
                "readlineSync.question" => (InputType::String, "question"),
                _ => (InputType::String, "readline-sync"),
            };
            let description = format!("Input {} value for {} ({})", input_type, name, via);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        // Anonymous numeric reads are numbered per kind, in source order.
        let (mut ints, mut floats, mut prompt_ints, mut prompt_floats) = (0, 0, 0, 0);
        for caps in PARSED_READ.captures_iter(code) {
            let (input_type, name, description) = match (&caps[1], &caps[2]) {
                ("parseInt", "readline") => {
                    ints += 1;
                    (InputType::Int, format!("intInput{}", ints), "Input integer value")
                }
                ("parseFloat", "readline") => {
                    floats += 1;
                    (InputType::Float, format!("floatInput{}", floats), "Input float value")
                }
                ("parseInt", _) => {
                    prompt_ints += 1;
                    (
                        InputType::Int,
                        format!("promptInt{}", prompt_ints),
                        "Input integer value (prompt)",
                    )
                }
                _ => {
                    prompt_floats += 1;
                    (
                        InputType::Float,
                        format!("promptFloat{}", prompt_floats),
                        "Input float value (prompt)",
                    )
                }
            };
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description.to_string()),
            );
        }

        for caps in PROMPT.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input value for {} (prompt)", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::scalar(InputType::String, name, description),
            );
        }

        let stream_at = STDIN_STREAM
            .iter()
            .filter_map(|pattern| pattern.find(code).map(|m| m.start()))
            .min();
        if let Some(offset) = stream_at {
            found.record(
                offset,
                Claim::Unclaimed,
                InputRequirement::scalar(
                    InputType::String,
                    "stdinInput",
                    "Input data from stdin".to_string(),
                ),
            );
        }

        for caps in ARGV.captures_iter(code) {
            let index = &caps[1];
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::scalar(
                    InputType::String,
                    format!("argv{}", index),
                    format!("Command line argument {}", index),
                ),
            );
        }

        Ok(())
    }
}
