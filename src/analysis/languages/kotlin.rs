//! Kotlin input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

/// `val x: T =` / `var x =` binding prefix.
const BINDING: &str = r"\b(?:val|var)\s+(\w+)(?:\s*:\s*[\w?<>]+)?\s*=\s*";

/// `readLine()!!` or `readln()`.
const LINE_READ: &str = r"(?:readLine\s*\(\s*\)\s*!!|readln\s*\(\s*\))";

/// Optional `.trim()` between the read and what consumes it.
const TRIMMED: &str = r"(?:\s*\.\s*trim\s*\(\s*\))?";

lazy_static! {
    static ref TYPED: Regex = Regex::new(&format!(
        r"{BINDING}{LINE_READ}{TRIMMED}\s*\.\s*(toInt|toLong|toDouble|toFloat|toBoolean)\s*\(\s*\)"
    )).unwrap();

    static ref SPLIT_MAP: Regex = Regex::new(&format!(
        r"{BINDING}{LINE_READ}{TRIMMED}\s*\.\s*split\s*\([^)]*\)\s*\.\s*map\s*(?:\{{\s*it\s*\.\s*(\w+)\s*\(\s*\)\s*\}}|\(\s*String::(\w+)\s*\))"
    )).unwrap();

    static ref SPLIT: Regex = Regex::new(&format!(
        r"{BINDING}{LINE_READ}{TRIMMED}\s*\.\s*split\s*\("
    )).unwrap();

    static ref SCANNER_READ: Regex = Regex::new(&format!(
        r"{BINDING}(\w+)\s*\.\s*(nextInt|nextLong|nextDouble|nextFloat|nextLine)\s*\(\s*\)"
    )).unwrap();

    /// val x = readLine()?.toInt()
    static ref NULLABLE: Regex = Regex::new(&format!(
        r"{BINDING}readLine\s*\(\s*\)\s*\?\.\s*\w+\s*\(\s*\)"
    )).unwrap();

    static ref BARE: Regex = Regex::new(&format!(
        r"{BINDING}(?:readLine\s*\(\s*\)|readln\s*\(\s*\))"
    )).unwrap();
}

/// Kotlin language analyzer.
pub struct KotlinAnalyzer;

fn coercion_type(method: &str) -> InputType {
    match method {
        "toInt" | "toLong" => InputType::Int,
        "toDouble" | "toFloat" => InputType::Float,
        _ => InputType::String,
    }
}

impl LanguageAnalyzer for KotlinAnalyzer {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::PerRequirement
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in TYPED.captures_iter(code) {
            let name = caps[1].to_string();
            let input_type = coercion_type(&caps[2]);
            let description = format!("Input {} value for {} ({})", input_type, name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        for caps in SPLIT_MAP.captures_iter(code) {
            let name = caps[1].to_string();
            let method = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            let input_type = coercion_type(method);
            let description = format!("Input {} values for {}", input_type, name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::array(input_type, name, description),
            );
        }

        for caps in SPLIT.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input values for {}", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::array(InputType::String, name, description),
            );
        }

        for caps in SCANNER_READ.captures_iter(code) {
            let name = caps[1].to_string();
            let input_type = match &caps[3] {
                "nextInt" | "nextLong" => InputType::Int,
                "nextDouble" | "nextFloat" => InputType::Float,
                _ => InputType::Line,
            };
            let description = format!("Input {} value for {} (Scanner)", input_type, name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        for caps in NULLABLE.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input value for {} (nullable)", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(InputType::String, name, description),
            );
        }

        for caps in BARE.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input string value for {}", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::scalar(InputType::String, name, description),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Vec<InputRequirement> {
        KotlinAnalyzer.requirements(source).unwrap()
    }

    fn shape(reqs: &[InputRequirement]) -> Vec<(String, InputType, bool)> {
        reqs.iter()
            .map(|r| (r.display_name().to_string(), r.input_type, r.is_array))
            .collect()
    }

    #[test]
    fn test_typed_coercions() {
        let reqs = analyze(
            r#"
fun main() {
    val n = readLine()!!.toInt()
    val x: Double = readln().toDouble()
    var big = readLine()!!.trim().toLong()
    val ok = readln().toBoolean()
}
"#,
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("n".to_string(), InputType::Int, false),
                ("x".to_string(), InputType::Float, false),
                ("big".to_string(), InputType::Int, false),
                ("ok".to_string(), InputType::String, false),
            ]
        );
    }

    #[test]
    fn test_split_variants() {
        let reqs = analyze(
            r#"
val nums = readLine()!!.split(" ").map { it.toInt() }
val ds = readln().split(" ").map(String::toDouble)
val words = readln().split(" ")
"#,
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("nums".to_string(), InputType::Int, true),
                ("ds".to_string(), InputType::Float, true),
                ("words".to_string(), InputType::String, true),
            ]
        );
    }

    #[test]
    fn test_scanner_reads() {
        let reqs = analyze(
            r#"
val sc = Scanner(System.`in`)
val a = sc.nextInt()
val b = sc.nextDouble()
val s = sc.nextLine()
"#,
        );
        let types: Vec<_> = reqs.iter().map(|r| r.input_type).collect();
        assert_eq!(types, vec![InputType::Int, InputType::Float, InputType::Line]);
    }

    #[test]
    fn test_scanner_parameter() {
        let reqs = analyze("fun solve(input: Scanner) {\n    val n = input.nextInt()\n}\n");
        assert_eq!(shape(&reqs), vec![("n".to_string(), InputType::Int, false)]);
    }

    #[test]
    fn test_nullable_and_bare_reads() {
        let reqs = analyze("val maybe = readLine()?.toInt()\nval name = readLine()\n");
        assert_eq!(
            shape(&reqs),
            vec![
                ("maybe".to_string(), InputType::String, false),
                ("name".to_string(), InputType::String, false),
            ]
        );
    }
}
