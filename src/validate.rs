//! Validation of candidate input against an inferred format.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{InputFormat, InputRequirement, InputType, ValidationResult};

lazy_static! {
    static ref INT_VALUE: Regex = Regex::new(r"^-?\d+$").unwrap();
    static ref FLOAT_VALUE: Regex = Regex::new(r"^-?\d*\.?\d+(?:[eE][-+]?\d+)?$").unwrap();
}

/// Check `candidate` line by line against `format`.
///
/// Each requirement consumes one line, arrays included. Every violation
/// is reported; validation never stops at the first one.
pub fn validate_input(candidate: &str, format: &InputFormat) -> ValidationResult {
    if format.requirements.is_empty() {
        return ValidationResult {
            is_valid: true,
            errors: Vec::new(),
        };
    }

    let lines: Vec<&str> = candidate.trim().split('\n').collect();
    let mut errors = Vec::new();

    for (index, req) in format.requirements.iter().enumerate() {
        let Some(line) = lines.get(index).map(|l| l.trim()) else {
            errors.push(format!("Missing input for {}", label(req)));
            continue;
        };

        if req.is_array {
            let mut tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                tokens.push("");
            }
            for token in tokens {
                if !is_valid_value(token, req.input_type) {
                    errors.push(format!(
                        "Invalid {} value: \"{}\" in {}",
                        req.input_type,
                        token,
                        label(req)
                    ));
                }
            }
        } else if !is_valid_value(line, req.input_type) {
            errors.push(format!(
                "Invalid {} value: \"{}\" for {}",
                req.input_type,
                line,
                label(req)
            ));
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Whether a single token is acceptable for `input_type`.
pub fn is_valid_value(value: &str, input_type: InputType) -> bool {
    match input_type {
        InputType::Int => INT_VALUE.is_match(value),
        InputType::Float => FLOAT_VALUE.is_match(value) && value.parse::<f64>().is_ok(),
        InputType::Char => value.chars().count() == 1,
        InputType::String | InputType::Line => true,
    }
}

fn label(req: &InputRequirement) -> &str {
    match (&req.name, req.is_array) {
        (Some(name), _) => name.as_str(),
        (None, true) => "array",
        (None, false) => "variable",
    }
}
