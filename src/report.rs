//! Output formatting for stdinfer results.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};

use crate::analysis::{FileAnalysis, InputFormat, InputRequirement, InputType, ValidationResult};
use crate::hints::generate_input_hints;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty' or 'json'",
                s
            )),
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report for one or more analyzed files.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_analyzed: usize,
    pub files: Vec<JsonFileReport>,
}

/// One analyzed file.
#[derive(Serialize, Deserialize)]
pub struct JsonFileReport {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub format: InputFormat,
    pub hints: String,
}

/// JSON report for a validation run.
#[derive(Serialize, Deserialize)]
pub struct JsonValidationReport {
    pub version: String,
    pub source: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

pub fn build_json_report(path: &str, analyses: &[FileAnalysis]) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_analyzed: analyses.len(),
        files: analyses
            .iter()
            .map(|a| JsonFileReport {
                path: a.path.clone(),
                language: a.language.map(|l| l.as_str().to_string()),
                format: a.format.clone(),
                hints: generate_input_hints(&a.format),
            })
            .collect(),
    }
}

/// Write analysis results in JSON format.
pub fn write_json(path: &str, analyses: &[FileAnalysis]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_json_report(path, analyses))?;
    println!("{}", json);
    Ok(())
}

/// Write a validation result in JSON format.
pub fn write_validation_json(source: &str, result: &ValidationResult) -> anyhow::Result<()> {
    let report = JsonValidationReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: source.to_string(),
        result: result.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header(label: &str, path: &str) {
    println!();
    print!("  ");
    print!("{}", "stdinfer".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("  {}", format!("{:<11}", label).dimmed());
    println!("{}", path);
    println!();
}

/// Write analysis results with colors.
pub fn write_pretty(path: &str, analyses: &[FileAnalysis]) {
    write_header("Analyzing:", path);

    for analysis in analyses {
        write_file_analysis(analysis);
        println!();
    }

    let with_format = analyses
        .iter()
        .filter(|a| a.format.has_requirements())
        .count();
    println!(
        "  {} file(s) analyzed, {} with a detected input format",
        analyses.len(),
        with_format
    );
    println!();
}

fn write_file_analysis(analysis: &FileAnalysis) {
    let format = &analysis.format;

    print!("  {}", analysis.path.blue().bold());
    if let Some(lang) = analysis.language {
        print!("  {}", format!("[{}]", lang).dimmed());
    }
    println!();

    for error in &format.errors {
        println!("    {} {}", "ERROR".red(), error);
    }
    if format.has_errors() {
        return;
    }

    print!("    Confidence: ");
    write_colored_confidence(format.confidence);
    println!("  Lines: {}", format.total_lines);

    if !format.has_requirements() {
        println!("    {}", "No stdin reads detected".dimmed());
        return;
    }

    println!();
    for (index, req) in format.requirements.iter().enumerate() {
        write_requirement(index + 1, req);
    }

    if let Some(example) = format.examples.first() {
        println!();
        println!("    {}", "Example:".bold());
        for line in example.lines() {
            println!("      {}", line);
        }
    }
}

fn write_requirement(line: usize, req: &InputRequirement) {
    print!("    {}", format!("{:>3}.", line).dimmed());
    print!(" ");
    write_type_tag(req.input_type, req.is_array);
    print!(" {:<16}", req.name.as_deref().unwrap_or("-"));
    println!("{}", req.description.dimmed());
}

fn write_type_tag(input_type: InputType, is_array: bool) {
    let tag = if is_array {
        format!("{}[]", input_type)
    } else {
        input_type.to_string()
    };
    let tag = format!("{:<8}", tag);
    match input_type {
        InputType::Int => print!("{}", tag.green()),
        InputType::Float => print!("{}", tag.cyan()),
        InputType::Char => print!("{}", tag.magenta()),
        InputType::Line => print!("{}", tag.yellow()),
        InputType::String => print!("{}", tag.blue()),
    }
}

fn write_colored_confidence(confidence: f64) {
    let text = format!("{:.0}%", confidence * 100.0);
    match confidence {
        c if c >= 0.85 => print!("{}", text.green().bold()),
        c if c >= 0.75 => print!("{}", text.green()),
        c if c >= 0.5 => print!("{}", text.yellow()),
        _ => print!("{}", text.red()),
    }
}

/// Write a validation result with colors.
pub fn write_validation_pretty(source: &str, result: &ValidationResult) {
    write_header("Source:", source);

    if result.is_valid {
        println!("  {}  input matches the expected format", "✓ VALID".green());
    } else {
        println!(
            "  {}  {} problem(s) found",
            "✗ INVALID".red(),
            result.errors.len()
        );
        println!();
        for error in &result.errors {
            println!("    {} {}", "•".red(), error);
        }
    }
    println!();
}
