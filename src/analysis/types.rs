//! Core types for inferred input formats.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of value a single read produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Int,
    Float,
    String,
    Char,
    Line,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Int => "int",
            InputType::Float => "float",
            InputType::String => "string",
            InputType::Char => "char",
            InputType::Line => "line",
        }
    }

    /// Map a scanf-style conversion character to a type.
    ///
    /// Unknown conversions fall back to `String`.
    pub fn from_conversion(conv: char) -> Self {
        match conv {
            'd' | 'i' | 'o' | 'u' | 'x' | 'X' => InputType::Int,
            'f' | 'F' | 'e' | 'E' | 'g' | 'G' | 'a' | 'A' => InputType::Float,
            'c' => InputType::Char,
            _ => InputType::String,
        }
    }

    /// Map a numeric/textual type name as it appears in source code
    /// (`int`, `i64`, `Double`, `float64`, ...) to a type.
    ///
    /// Unknown names fall back to `String`.
    pub fn from_type_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "int" | "long" | "short" | "byte" | "int16" | "int32" | "int64" | "i8" | "i16"
            | "i32" | "i64" | "i128" | "u8" | "u16" | "u32" | "u64" | "u128" | "usize"
            | "isize" | "uint" | "uint64" | "integer" => InputType::Int,
            "float" | "double" | "single" | "decimal" | "float32" | "float64" | "f32"
            | "f64" => InputType::Float,
            "char" => InputType::Char,
            _ => InputType::String,
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" => Ok(InputType::Int),
            "float" => Ok(InputType::Float),
            "string" => Ok(InputType::String),
            "char" => Ok(InputType::Char),
            "line" => Ok(InputType::Line),
            _ => Err(format!("unknown input type: {}", s)),
        }
    }
}

/// One inferred read from standard input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRequirement {
    #[serde(rename = "type")]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "isArray")]
    pub is_array: bool,
    pub description: String,
}

impl InputRequirement {
    /// A single value read into `name`.
    pub fn scalar(input_type: InputType, name: impl Into<String>, description: String) -> Self {
        Self {
            input_type,
            name: Some(name.into()),
            is_array: false,
            description,
        }
    }

    /// A whitespace-separated list of values read into `name`.
    pub fn array(input_type: InputType, name: impl Into<String>, description: String) -> Self {
        Self {
            input_type,
            name: Some(name.into()),
            is_array: true,
            description,
        }
    }

    /// Name used in diagnostics when the requirement is scalar.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("variable")
    }
}

/// The aggregate result of analyzing one source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputFormat {
    pub requirements: Vec<InputRequirement>,
    pub total_lines: usize,
    pub examples: Vec<String>,
    pub errors: Vec<String>,
    pub confidence: f64,
}

impl InputFormat {
    pub fn empty() -> Self {
        Self::default()
    }

    /// An empty format carrying a single diagnostic.
    pub fn with_error(error: &AnalysisError) -> Self {
        Self {
            errors: vec![error.to_string()],
            ..Self::default()
        }
    }

    pub fn has_requirements(&self) -> bool {
        !self.requirements.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Outcome of checking candidate input against an inferred format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

/// Conditions reported through `InputFormat::errors`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Language {0} not supported for input analysis")]
    UnsupportedLanguage(String),
    #[error("Error analyzing code: {0}")]
    Fault(String),
}
