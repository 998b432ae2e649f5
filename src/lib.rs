//! stdinfer - infer the standard-input format of a program.
//!
//! Given a source snippet and its language, stdinfer lists what the program
//! reads from stdin: one requirement per read, each with a type (`int`,
//! `float`, `string`, `char` or `line`), the variable it lands in, and
//! whether it is a whitespace-separated list. From that it can generate
//! example input, validate candidate input, and render hints.
//!
//! # Architecture
//!
//! - `analysis`: language set, per-language rule libraries and the dispatcher
//! - `generate`: random example input
//! - `validate`: line-by-line checking of candidate input
//! - `hints`: human-readable rendering of a format
//! - `debounce`: background reanalysis of changing source
//! - `config`: YAML configuration
//! - `report`: output formatting (pretty, JSON)
//!
//! ```
//! let format = stdinfer::analyze_code("n = int(input())", "python");
//! assert_eq!(format.requirements.len(), 1);
//! assert!(stdinfer::validate_input("42", &format).is_valid);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod generate;
pub mod hints;
pub mod report;
pub mod validate;

pub use analysis::{
    analyze_code, analyze_with, get_analyzer, AnalysisContext, AnalysisError, FileAnalysis,
    InputFormat, InputRequirement, InputType, Language, LanguageAnalyzer, ValidationResult,
};
pub use config::Config;
pub use debounce::{DebounceConfig, Debouncer, Snapshot};
pub use generate::{generate_examples, generate_sample_input};
pub use hints::generate_input_hints;
pub use validate::{is_valid_value, validate_input};

/// Compile every analyzer's rule library up front.
///
/// Optional: patterns are otherwise compiled on first use. Call this once at
/// startup to keep that cost out of the first analysis.
pub fn init() {
    for language in Language::ALL {
        let _ = get_analyzer(language).requirements("");
    }
}
