//! Python input analyzer.
//!
//! Python's input idiom is almost always `input()` wrapped in a cast,
//! a split or both, so the rules below run from the most specific
//! wrapping to the bare call. The bare rules only fill in names no
//! earlier rule claimed.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, CommentStyle, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// x = int(input()) / int(input().strip()) / int(sys.stdin.readline())
    static ref INT_INPUT: Regex = Regex::new(
        r"\b(\w+)\s*=\s*int\s*\(\s*(?:input\s*\([^)]*\)|sys\.stdin\.readline\s*\(\s*\))(?:\.strip\(\))?\s*\)"
    ).unwrap();

    /// x = float(input())
    static ref FLOAT_INPUT: Regex = Regex::new(
        r"\b(\w+)\s*=\s*float\s*\(\s*(?:input\s*\([^)]*\)|sys\.stdin\.readline\s*\(\s*\))(?:\.strip\(\))?\s*\)"
    ).unwrap();

    /// x = eval(input())
    static ref EVAL_INPUT: Regex =
        Regex::new(r"\b(\w+)\s*=\s*eval\s*\(\s*input\s*\([^)]*\)\s*\)").unwrap();

    /// x = raw_input()
    static ref RAW_INPUT: Regex = Regex::new(r"\b(\w+)\s*=\s*raw_input\s*\(").unwrap();

    /// s = sys.stdin.readline().strip()
    static ref STDIN_STRIPPED: Regex =
        Regex::new(r"\b(\w+)\s*=\s*sys\.stdin\.readline\s*\(\s*\)\s*\.\s*strip\s*\(\s*\)").unwrap();

    /// s = sys.stdin.readline()
    static ref STDIN_LINE: Regex =
        Regex::new(r"\b(\w+)\s*=\s*sys\.stdin\.readline\s*\(\s*\)").unwrap();

    /// a, b = map(int, input().split())
    static ref UNPACK_MAP: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)+)\s*=\s*(?:list\s*\(\s*)?map\s*\(\s*(int|float|str)\s*,\s*input\s*\([^)]*\)(?:\.strip\(\))?\.split\([^)]*\)"
    ).unwrap();

    /// a, b = input().split()
    static ref UNPACK_SPLIT: Regex = Regex::new(
        r"(?m)^[ \t]*([A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)+)\s*=\s*input\s*\([^)]*\)(?:\.strip\(\))?\.split\([^)]*\)"
    ).unwrap();

    /// xs = [int(t) for t in input().split()]
    static ref COMPREHENSION: Regex = Regex::new(
        r"(?m)^[ \t]*(\w+)\s*=\s*\[\s*(int|float|str)\s*\(\s*\w+\s*\)\s*for\s+\w+\s+in\s+input\s*\([^)]*\)(?:\.strip\(\))?\.split\([^)]*\)\s*\]"
    ).unwrap();

    /// xs = list(map(int, input().split()))
    static ref MAP_SPLIT: Regex = Regex::new(
        r"(?m)^[ \t]*(\w+)\s*=\s*(?:list\s*\(\s*)?map\s*\(\s*(int|float|str)\s*,\s*(?:input\s*\([^)]*\)|sys\.stdin\.readline\s*\(\s*\))(?:\.strip\(\))?\.split\([^)]*\)"
    ).unwrap();

    /// words = input().split()
    static ref SPLIT: Regex = Regex::new(
        r"(?m)^[ \t]*(\w+)\s*=\s*input\s*\([^)]*\)(?:\.strip\(\))?\.split\([^)]*\)"
    ).unwrap();

    /// s = input()
    static ref INPUT: Regex = Regex::new(r"\b(\w+)\s*=\s*input\s*\(").unwrap();

    static ref NAME: Regex = Regex::new(r"[A-Za-z_]\w*").unwrap();
}

/// Python language analyzer.
pub struct PythonAnalyzer;

fn cast_type(cast: &str) -> InputType {
    InputType::from_type_name(cast)
}

fn type_word(input_type: InputType) -> &'static str {
    match input_type {
        InputType::Int => "integer",
        InputType::Float => "float",
        _ => "string",
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language(&self) -> Language {
        Language::Python
    }

    fn comment_style(&self) -> CommentStyle {
        CommentStyle::Hash
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::PerRequirement
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        let scalar_rules: [(&Regex, InputType, &str, Claim); 6] = [
            (&*INT_INPUT, InputType::Int, "Input integer value for", Claim::Always),
            (&*FLOAT_INPUT, InputType::Float, "Input float value for", Claim::Always),
            (&*EVAL_INPUT, InputType::String, "Input expression (evaluated) for", Claim::Always),
            (&*RAW_INPUT, InputType::String, "Input string value (raw_input) for", Claim::Always),
            (&*STDIN_STRIPPED, InputType::String, "Input stripped line from stdin for", Claim::Always),
            (&*STDIN_LINE, InputType::Line, "Input line from stdin for", Claim::Unclaimed),
        ];

        for (pattern, input_type, what, claim) in scalar_rules {
            for caps in pattern.captures_iter(code) {
                let name = caps[1].to_string();
                let description = format!("{} {}", what, name);
                found.record(
                    caps.get(0).map_or(0, |m| m.start()),
                    claim,
                    InputRequirement::scalar(input_type, name, description),
                );
            }
        }

        for caps in UNPACK_MAP.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            let input_type = cast_type(&caps[2]);
            for name in NAME.find_iter(&caps[1]) {
                found.record(
                    offset,
                    Claim::Always,
                    InputRequirement::scalar(
                        input_type,
                        name.as_str(),
                        format!(
                            "Input {} value for {} (space-separated on one line)",
                            type_word(input_type),
                            name.as_str()
                        ),
                    ),
                );
            }
        }

        for caps in UNPACK_SPLIT.captures_iter(code) {
            let offset = caps.get(0).map_or(0, |m| m.start());
            for name in NAME.find_iter(&caps[1]) {
                found.record(
                    offset,
                    Claim::Always,
                    InputRequirement::scalar(
                        InputType::String,
                        name.as_str(),
                        format!("Input value for {} (from split input)", name.as_str()),
                    ),
                );
            }
        }

        for pattern in [&*COMPREHENSION, &*MAP_SPLIT] {
            for caps in pattern.captures_iter(code) {
                let name = caps[1].to_string();
                let input_type = cast_type(&caps[2]);
                let description =
                    format!("Input {} values for {}", type_word(input_type), name);
                found.record(
                    caps.get(0).map_or(0, |m| m.start()),
                    Claim::Always,
                    InputRequirement::array(input_type, name, description),
                );
            }
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

        for caps in INPUT.captures_iter(code) {
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
        PythonAnalyzer.requirements(source).unwrap()
    }

    fn shape(reqs: &[InputRequirement]) -> Vec<(String, InputType, bool)> {
        reqs.iter()
            .map(|r| (r.name.clone().unwrap_or_default(), r.input_type, r.is_array))
            .collect()
    }

    #[test]
    fn test_cast_then_split() {
        let reqs = analyze("x = int(input())\ny = input().split()\n");
        assert_eq!(
            shape(&reqs),
            vec![
                ("x".to_string(), InputType::Int, false),
                ("y".to_string(), InputType::String, true),
            ]
        );
    }

    #[test]
    fn test_cast_is_not_double_counted() {
        let reqs = analyze("n = int(input().strip())\nr = float(input())\ns = input()\n");
        assert_eq!(
            shape(&reqs),
            vec![
                ("n".to_string(), InputType::Int, false),
                ("r".to_string(), InputType::Float, false),
                ("s".to_string(), InputType::String, false),
            ]
        );
    }

    #[test]
    fn test_tuple_unpack() {
        let reqs = analyze("a, b, c = input().split()\n");
        assert_eq!(reqs.len(), 3);
        assert!(reqs.iter().all(|r| !r.is_array && r.input_type == InputType::String));
        assert_eq!(reqs[2].name.as_deref(), Some("c"));
    }

    #[test]
    fn test_tuple_unpack_with_map() {
        let reqs = analyze("n, m = map(int, input().split())\n");
        assert_eq!(
            shape(&reqs),
            vec![
                ("n".to_string(), InputType::Int, false),
                ("m".to_string(), InputType::Int, false),
            ]
        );
    }

    #[test]
    fn test_map_and_comprehension_arrays() {
        let reqs = analyze(
            "arr = list(map(int, input().split()))\nvals = [float(v) for v in input().split()]\n",
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("arr".to_string(), InputType::Int, true),
                ("vals".to_string(), InputType::Float, true),
            ]
        );
    }

    #[test]
    fn test_stdin_variants() {
        let reqs = analyze(
            "import sys\nname = sys.stdin.readline().strip()\nrest = sys.stdin.readline()\n",
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("name".to_string(), InputType::String, false),
                ("rest".to_string(), InputType::Line, false),
            ]
        );
    }

    #[test]
    fn test_eval_and_raw_input() {
        let reqs = analyze("e = eval(input())\nr = raw_input()\n");
        assert_eq!(reqs.len(), 2);
        assert!(reqs.iter().all(|r| r.input_type == InputType::String));
        assert!(reqs[0].description.contains("evaluated"));
    }

    #[test]
    fn test_comments_and_docstrings_ignored() {
        let reqs = analyze(
            "\"\"\"\nx = int(input())\n\"\"\"\n# y = input()\nz = input()  # z = int(input())\n",
        );
        assert_eq!(shape(&reqs), vec![("z".to_string(), InputType::String, false)]);
    }
}
