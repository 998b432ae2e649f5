//! Language-specific analyzer implementations.

mod c;
mod cpp;
mod csharp;
mod go;
mod java;
mod javascript;
mod kotlin;
mod python;
mod rust_lang;

pub use c::CAnalyzer;
pub use cpp::CppAnalyzer;
pub use csharp::CSharpAnalyzer;
pub use go::GoAnalyzer;
pub use java::JavaAnalyzer;
pub use javascript::JavaScriptAnalyzer;
pub use kotlin::KotlinAnalyzer;
pub use python::PythonAnalyzer;
pub use rust_lang::RustAnalyzer;

use once_cell::sync::OnceCell;

use super::{Language, LanguageAnalyzer};

static C_ANALYZER: OnceCell<CAnalyzer> = OnceCell::new();
static CPP_ANALYZER: OnceCell<CppAnalyzer> = OnceCell::new();
static CSHARP_ANALYZER: OnceCell<CSharpAnalyzer> = OnceCell::new();
static GO_ANALYZER: OnceCell<GoAnalyzer> = OnceCell::new();
static JAVA_ANALYZER: OnceCell<JavaAnalyzer> = OnceCell::new();
static JAVASCRIPT_ANALYZER: OnceCell<JavaScriptAnalyzer> = OnceCell::new();
static KOTLIN_ANALYZER: OnceCell<KotlinAnalyzer> = OnceCell::new();
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();
static RUST_ANALYZER: OnceCell<RustAnalyzer> = OnceCell::new();

/// Get the analyzer for a language.
///
/// The language set is closed, so every variant has an analyzer.
pub fn get_analyzer(language: Language) -> &'static dyn LanguageAnalyzer {
    match language {
        Language::C => C_ANALYZER.get_or_init(|| CAnalyzer),
        Language::Cpp => CPP_ANALYZER.get_or_init(|| CppAnalyzer),
        Language::Python => PYTHON_ANALYZER.get_or_init(|| PythonAnalyzer),
        Language::Java => JAVA_ANALYZER.get_or_init(|| JavaAnalyzer),
        Language::JavaScript => JAVASCRIPT_ANALYZER.get_or_init(|| JavaScriptAnalyzer),
        Language::Kotlin => KOTLIN_ANALYZER.get_or_init(|| KotlinAnalyzer),
        Language::CSharp => CSHARP_ANALYZER.get_or_init(|| CSharpAnalyzer),
        Language::Go => GO_ANALYZER.get_or_init(|| GoAnalyzer),
        Language::Rust => RUST_ANALYZER.get_or_init(|| RustAnalyzer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_its_analyzer() {
        for lang in Language::ALL {
            assert_eq!(get_analyzer(lang).language(), lang);
        }
    }

    #[test]
    fn test_empty_source_has_no_requirements() {
        for lang in Language::ALL {
            let reqs = get_analyzer(lang).requirements("").unwrap();
            assert!(reqs.is_empty(), "{} produced requirements", lang);
        }
    }
}
