//! Rust input analyzer.
//!
//! Rust reads a whole line into a `String` buffer and parses it later, so
//! the analyzer works in two steps: find the buffers filled from stdin,
//! then find the expressions that consume them.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

lazy_static! {
    /// let mut buf = String::new();
    static ref STRING_NEW: Regex = Regex::new(
        r"\blet\s+mut\s+(\w+)(?:\s*:\s*String)?\s*=\s*String\s*::\s*(?:new|with_capacity)\s*\([^)]*\)"
    ).unwrap();

    /// let stdin = io::stdin(); / let mut handle = stdin().lock();
    static ref STDIN_HANDLE: Regex = Regex::new(
        r"\blet\s+(?:mut\s+)?(\w+)\s*=\s*(?:\w+\s*::\s*)*stdin\s*\(\s*\)(?:\s*\.\s*lock\s*\(\s*\))?\s*;"
    ).unwrap();

    /// io::stdin().read_line(&mut buf) / handle.read_line(&mut buf)
    static ref READ_LINE: Regex = Regex::new(
        r"(?:(?:\w+\s*::\s*)*stdin\s*\(\s*\)(?:\s*\.\s*lock\s*\(\s*\))?|\b(\w+))\s*\.\s*read_line\s*\(\s*&\s*mut\s+(\w+)\s*\)"
    ).unwrap();

    /// let n: i32 = buf.trim().parse().unwrap();
    static ref PARSE: Regex = Regex::new(
        r"\blet\s+(?:mut\s+)?(\w+)\s*(?::\s*(\w+)\s*)?=\s*(\w+)\s*\.\s*trim\s*\(\s*\)\s*\.\s*parse\s*(?:::\s*<\s*(\w+)\s*>\s*)?\(\s*\)"
    ).unwrap();

    /// let v: Vec<i32> = buf.split_whitespace().map(|x| x.parse().unwrap()).collect();
    static ref VEC_ANNOTATED: Regex = Regex::new(
        r"\blet\s+(?:mut\s+)?(\w+)\s*:\s*Vec\s*<\s*(\w+)\s*>\s*=\s*(\w+)(?:\s*\.\s*trim\s*\(\s*\))?\s*\.\s*split_whitespace\s*\(\s*\)\s*\.\s*map\s*\([^;]*?\bparse\b[^;]*?\.\s*collect\b"
    ).unwrap();

    /// let v = buf.split_whitespace().map(...).collect::<Vec<i32>>();
    static ref VEC_TURBOFISH: Regex = Regex::new(
        r"\blet\s+(?:mut\s+)?(\w+)\s*=\s*(\w+)(?:\s*\.\s*trim\s*\(\s*\))?\s*\.\s*split_whitespace\s*\(\s*\)\s*\.\s*map\s*\([^;]*?\bparse\b[^;]*?\.\s*collect\s*::\s*<\s*Vec\s*<\s*(\w+)\s*>\s*>"
    ).unwrap();
}

/// Rust language analyzer.
pub struct RustAnalyzer;

/// Element type of a parsed `Vec<T>`; only numbers are narrowed.
fn element_type(type_name: &str) -> InputType {
    match InputType::from_type_name(type_name) {
        InputType::Char => InputType::String,
        other => other,
    }
}

impl RustAnalyzer {
    /// Buffers filled by a stdin line read, with the offset of their first read.
    fn tracked_buffers(&self, code: &str) -> HashMap<String, usize> {
        let buffers: HashSet<String> = STRING_NEW
            .captures_iter(code)
            .map(|caps| caps[1].to_string())
            .collect();
        let handles: HashSet<String> = STDIN_HANDLE
            .captures_iter(code)
            .map(|caps| caps[1].to_string())
            .collect();

        let mut tracked = HashMap::new();
        for caps in READ_LINE.captures_iter(code) {
            if let Some(receiver) = caps.get(1) {
                if !handles.contains(receiver.as_str()) {
                    continue;
                }
            }
            let buffer = &caps[2];
            if buffers.contains(buffer) {
                let offset = caps.get(0).map_or(0, |m| m.start());
                tracked.entry(buffer.to_string()).or_insert(offset);
            }
        }
        tracked
    }
}

impl LanguageAnalyzer for RustAnalyzer {
    fn language(&self) -> Language {
        Language::Rust
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::PerRequirement
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        let tracked = self.tracked_buffers(code);
        let mut consumed: HashSet<&str> = HashSet::new();

        for caps in PARSE.captures_iter(code) {
            let source = caps.get(3).map_or("", |m| m.as_str());
            if !tracked.contains_key(source) {
                continue;
            }
            consumed.insert(source);
            let name = caps[1].to_string();
            let input_type = caps
                .get(2)
                .or_else(|| caps.get(4))
                .map_or(InputType::String, |m| InputType::from_type_name(m.as_str()));
            let description = format!("Input {} value for {}", input_type, name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        let vectors = VEC_ANNOTATED
            .captures_iter(code)
            .map(|caps| (caps.get(0), caps.get(1), caps.get(3), caps.get(2)))
            .chain(
                VEC_TURBOFISH
                    .captures_iter(code)
                    .map(|caps| (caps.get(0), caps.get(1), caps.get(2), caps.get(3))),
            );
        for (whole, name, source, element) in vectors {
            let (Some(whole), Some(name), Some(source), Some(element)) = (whole, name, source, element)
            else {
                continue;
            };
            if !tracked.contains_key(source.as_str()) {
                continue;
            }
            consumed.insert(source.as_str());
            let input_type = element_type(element.as_str());
            let description = format!("Input {} values for {}", input_type, name.as_str());
            found.record(
                whole.start(),
                Claim::Always,
                InputRequirement::array(input_type, name.as_str(), description),
            );
        }

        for (buffer, offset) in &tracked {
            if consumed.contains(buffer.as_str()) {
                continue;
            }
            found.record(
                *offset,
                Claim::Unclaimed,
                InputRequirement::scalar(
                    InputType::String,
                    buffer.as_str(),
                    format!("Input string value for {}", buffer),
                ),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(source: &str) -> Vec<InputRequirement> {
        RustAnalyzer.requirements(source).unwrap()
    }

    fn shape(reqs: &[InputRequirement]) -> Vec<(String, InputType, bool)> {
        reqs.iter()
            .map(|r| (r.display_name().to_string(), r.input_type, r.is_array))
            .collect()
    }

    #[test]
    fn test_parse_from_tracked_buffer() {
        let reqs = analyze(
            r#"
use std::io;

fn main() {
    let mut input = String::new();
    io::stdin().read_line(&mut input).expect("read");
    let n: i32 = input.trim().parse().unwrap();

    let mut second = String::new();
    std::io::stdin().read_line(&mut second).unwrap();
    let x = second.trim().parse::<f64>().unwrap();
}
"#,
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("n".to_string(), InputType::Int, false),
                ("x".to_string(), InputType::Float, false),
            ]
        );
    }

    #[test]
    fn test_unparsed_buffer_is_a_string() {
        let reqs = analyze(
            "let mut name = String::new();\nio::stdin().read_line(&mut name).unwrap();\nprintln!(\"{}\", name);\n",
        );
        assert_eq!(shape(&reqs), vec![("name".to_string(), InputType::String, false)]);
    }

    #[test]
    fn test_vec_from_split() {
        let reqs = analyze(
            r#"
let stdin = io::stdin();
let mut line = String::new();
stdin.read_line(&mut line).unwrap();
let nums: Vec<i64> = line
    .trim()
    .split_whitespace()
    .map(|tok| tok.parse().unwrap())
    .collect();
let mut other = String::new();
stdin.read_line(&mut other).unwrap();
let fs = other.split_whitespace().map(|t| t.parse::<f32>().unwrap()).collect::<Vec<f32>>();
"#,
        );
        assert_eq!(
            shape(&reqs),
            vec![
                ("nums".to_string(), InputType::Int, true),
                ("fs".to_string(), InputType::Float, true),
            ]
        );
    }

    #[test]
    fn test_untracked_buffers_are_ignored() {
        let reqs = analyze(
            r#"
let mut s = String::new();
file.read_line(&mut s).unwrap();
let n: u32 = s.trim().parse().unwrap();
"#,
        );
        assert!(reqs.is_empty());
    }

    #[test]
    fn test_char_and_lifetimes() {
        let reqs = analyze(
            r#"
fn first<'a>(s: &'a str) -> &'a str { s }
let mut c = String::new();
io::stdin().lock().read_line(&mut c).unwrap();
let ch: char = c.trim().parse().unwrap();
"#,
        );
        assert_eq!(shape(&reqs), vec![("ch".to_string(), InputType::Char, false)]);
    }
}
