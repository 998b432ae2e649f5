//! Lexical input-format analysis.
//!
//! This module infers what a program expects on standard input by matching
//! per-language read idioms in its source text. No parsing is done: each
//! language owns a small library of regular-expression rules.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ source + tag  │────▶│ Dispatcher   │────▶│ LanguageAnalyzer │
//! └───────────────┘     │ (analyze_*)  │     │ (rule library)   │
//!                       └──────────────┘     └──────────────────┘
//!                              │                      │
//!                              ▼                      ▼
//!                       ┌──────────────┐     ┌──────────────────┐
//!                       │ InputFormat  │◀────│ RequirementSet   │
//!                       │ (+ examples) │     │ (claims, order)  │
//!                       └──────────────┘     └──────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Add a variant and its tags to `Language` in `language.rs`
//! 2. Create a module in `src/analysis/languages/`
//! 3. Implement the `LanguageAnalyzer` trait
//! 4. Add the analyzer to `get_analyzer` in `languages/mod.rs`
//!
//! See `languages/go.rs` for a reference implementation.

mod context;
mod dispatch;
mod language;
mod languages;
pub mod patterns;
mod traits;
mod types;

pub use context::{AnalysisContext, FileAnalysis};
pub use dispatch::{analyze_code, analyze_with};
pub use language::Language;
pub use languages::{
    get_analyzer, CAnalyzer, CSharpAnalyzer, CppAnalyzer, GoAnalyzer, JavaAnalyzer,
    JavaScriptAnalyzer, KotlinAnalyzer, PythonAnalyzer, RustAnalyzer,
};
pub use traits::{LanguageAnalyzer, LineEstimate};
pub use types::{AnalysisError, InputFormat, InputRequirement, InputType, ValidationResult};
