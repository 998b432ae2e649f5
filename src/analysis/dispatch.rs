//! Entry points that turn a source text and a language tag into an
//! [`InputFormat`].

use std::panic::{self, AssertUnwindSafe};

use rand::thread_rng;

use super::languages::get_analyzer;
use super::{AnalysisError, InputFormat, Language};
use crate::config::Config;
use crate::generate::generate_examples;

/// Analyze `source` written in the language named by `tag`, with default settings.
pub fn analyze_code(source: &str, tag: &str) -> InputFormat {
    analyze_with(source, tag, &Config::default())
}

/// Analyze `source` with confidence weights and example count taken from `config`.
///
/// Never fails: an unknown tag or a fault inside an analyzer is reported
/// through `InputFormat::errors` with zero confidence.
pub fn analyze_with(source: &str, tag: &str, config: &Config) -> InputFormat {
    let Some(language) = Language::from_tag(tag) else {
        return InputFormat::with_error(&AnalysisError::UnsupportedLanguage(tag.to_string()));
    };

    let analyzer = get_analyzer(language);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| analyzer.requirements(source)));

    let fault = match outcome {
        Ok(Ok(requirements)) => {
            let examples =
                generate_examples(&requirements, config.example_count(), &mut thread_rng());
            return InputFormat {
                total_lines: analyzer.line_estimate().total_lines(requirements.len()),
                requirements,
                examples,
                errors: Vec::new(),
                confidence: config.confidence_for(language),
            };
        }
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    tracing::warn!(language = %language, error = %fault, "analysis failed");
    InputFormat::with_error(&AnalysisError::Fault(fault))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::InputType;

    #[test]
    fn test_unsupported_language() {
        let format = analyze_code("print('hi')", "COBOL");
        assert!(format.requirements.is_empty());
        assert!(format.examples.is_empty());
        assert_eq!(format.total_lines, 0);
        assert_eq!(format.confidence, 0.0);
        assert_eq!(
            format.errors,
            vec!["Language COBOL not supported for input analysis"]
        );
    }

    #[test]
    fn test_tags_are_case_insensitive() {
        let format = analyze_code("n = int(input())", "Python3");
        assert!(format.errors.is_empty());
        assert_eq!(format.requirements.len(), 1);
        assert_eq!(format.requirements[0].input_type, InputType::Int);
    }

    #[test]
    fn test_empty_source() {
        let format = analyze_code("", "python");
        assert!(format.requirements.is_empty());
        assert_eq!(format.total_lines, 1);
        assert_eq!(format.examples, vec![String::new()]);
        assert!(format.errors.is_empty());
        assert_eq!(format.confidence, 0.9);
    }

    #[test]
    fn test_config_overrides() {
        let mut config = Config {
            examples: 5,
            ..Config::default()
        };
        config.confidence.insert("golang".to_string(), 0.25);

        let format = analyze_with("var n int\nfmt.Scan(&n)", "go", &config);
        assert_eq!(format.confidence, 0.25);
        assert_eq!(format.examples.len(), 5);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "analyzer panicked");
    }
}
