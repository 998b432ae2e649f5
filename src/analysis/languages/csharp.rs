//! C# input analyzer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::patterns::{Claim, RequirementSet};
use crate::analysis::{InputRequirement, InputType, Language, LanguageAnalyzer, LineEstimate};

/// `Console.ReadLine()` with an optional null-forgiving `!` and `.Trim()`.
const READ_LINE: &str = r"Console\s*\.\s*ReadLine\s*\(\s*\)\s*!?(?:\s*\.\s*Trim\s*\(\s*\))?";

lazy_static! {
    /// n = int.Parse(Console.ReadLine())
    static ref PARSE: Regex = Regex::new(&format!(
        r"(\w+)\s*=\s*(\w+)\s*\.\s*Parse\s*\(\s*{READ_LINE}\s*\)"
    )).unwrap();

    /// n = Convert.ToInt32(Console.ReadLine())
    static ref CONVERT: Regex = Regex::new(&format!(
        r"(\w+)\s*=\s*Convert\s*\.\s*To(\w+)\s*\(\s*{READ_LINE}\s*\)"
    )).unwrap();

    /// c = (char)Console.Read()
    static ref READ_CHAR: Regex = Regex::new(
        r"(\w+)\s*=\s*(?:\(\s*char\s*\)\s*)?Console\s*\.\s*Read\s*\(\s*\)"
    ).unwrap();

    /// key = Console.ReadKey(true)
    static ref READ_KEY: Regex = Regex::new(
        r"(\w+)\s*=\s*Console\s*\.\s*ReadKey\s*\(\s*(?:true|false)?\s*\)"
    ).unwrap();

    /// line = reader.ReadLine() on any TextReader-family object.
    static ref READER_LINE: Regex =
        Regex::new(r"(\w+)\s*=\s*(\w+)\s*\.\s*ReadLine\s*\(\s*\)").unwrap();

    /// xs = Console.ReadLine().Split(' ').Select(int.Parse)
    static ref SPLIT_SELECT: Regex = Regex::new(&format!(
        r"(\w+)\s*=\s*{READ_LINE}\s*\.\s*Split\s*\([^)]*\)\s*\.\s*Select\s*\(\s*(?:(\w+)\s*\.\s*Parse|\w+\s*=>\s*(\w+)\s*\.\s*Parse\s*\(\s*\w+\s*\))\s*\)"
    )).unwrap();

    /// xs = Array.ConvertAll(Console.ReadLine().Split(' '), int.Parse)
    static ref CONVERT_ALL: Regex = Regex::new(&format!(
        r"(\w+)\s*=\s*Array\s*\.\s*ConvertAll\s*\(\s*{READ_LINE}\s*\.\s*Split\s*\([^)]*\)\s*,\s*(\w+)\s*\.\s*Parse\s*\)"
    )).unwrap();

    /// words = Console.ReadLine().Split(' ')
    static ref SPLIT: Regex = Regex::new(&format!(
        r"(\w+)\s*=\s*{READ_LINE}\s*\.\s*Split\s*\("
    )).unwrap();

    /// s = Console.ReadLine()
    static ref BARE: Regex = Regex::new(&format!(r"(\w+)\s*=\s*{READ_LINE}")).unwrap();

    static ref CONSOLE_IN: Regex = Regex::new(r"\bConsole\s*\.\s*In\b").unwrap();
}

/// C# language analyzer.
pub struct CSharpAnalyzer;

/// `Int32`, `Single`, `double` style names; `bool` reads as a string.
fn parsed_type(type_name: &str) -> InputType {
    InputType::from_type_name(type_name)
}

impl LanguageAnalyzer for CSharpAnalyzer {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn line_estimate(&self) -> LineEstimate {
        LineEstimate::PerRequirement
    }

    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()> {
        for caps in PARSE.captures_iter(code) {
            let name = caps[1].to_string();
            let input_type = parsed_type(&caps[2]);
            let description = format!("Input {} value for {} ({}.Parse)", input_type, name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        for caps in CONVERT.captures_iter(code) {
            let name = caps[1].to_string();
            let input_type = parsed_type(&caps[2]);
            let description =
                format!("Input {} value for {} (Convert.To{})", input_type, name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::scalar(input_type, name, description),
            );
        }

        for (pattern, via) in [(&*READ_CHAR, "Console.Read"), (&*READ_KEY, "Console.ReadKey")] {
            for caps in pattern.captures_iter(code) {
                let name = caps[1].to_string();
                let description = format!("Input character for {} ({})", name, via);
                found.record(
                    caps.get(0).map_or(0, |m| m.start()),
                    Claim::Always,
                    InputRequirement::scalar(InputType::Char, name, description),
                );
            }
        }

        for caps in READER_LINE.captures_iter(code) {
            // Console.ReadLine() and Console.In.ReadLine() have their own rules.
            if matches!(&caps[2], "Console" | "In") {
                continue;
            }
            let name = caps[1].to_string();
            let description = format!("Input line of text for {} ({})", name, &caps[2]);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Always,
                InputRequirement::scalar(InputType::Line, name, description),
            );
        }

        for caps in SPLIT_SELECT.captures_iter(code).chain(CONVERT_ALL.captures_iter(code)) {
            let name = caps[1].to_string();
            let type_name = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            let input_type = parsed_type(type_name);
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

        for caps in BARE.captures_iter(code) {
            let name = caps[1].to_string();
            let description = format!("Input string value for {}", name);
            found.record(
                caps.get(0).map_or(0, |m| m.start()),
                Claim::Unclaimed,
                InputRequirement::scalar(InputType::String, name, description),
            );
        }

        if let Some(m) = CONSOLE_IN.find(code) {
            found.record(
                m.start(),
                Claim::Unclaimed,
                InputRequirement::scalar(
                    InputType::String,
                    "consoleInput",
                    "Input data from Console.In".to_string(),
                ),
            );
        }

        Ok(())
    }
}
