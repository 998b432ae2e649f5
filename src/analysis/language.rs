//! The closed set of languages the analyzer understands.

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// A supported source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Python,
    Java,
    JavaScript,
    Kotlin,
    CSharp,
    Go,
    Rust,
}

/// Accepted language tags (lowercase) and their aliases.
static TAGS: phf::Map<&'static str, Language> = phf_map! {
    "c" => Language::C,
    "cpp" => Language::Cpp,
    "c++" => Language::Cpp,
    "cxx" => Language::Cpp,
    "cc" => Language::Cpp,
    "python" => Language::Python,
    "python3" => Language::Python,
    "py" => Language::Python,
    "java" => Language::Java,
    "javascript" => Language::JavaScript,
    "js" => Language::JavaScript,
    "node" => Language::JavaScript,
    "nodejs" => Language::JavaScript,
    "kotlin" => Language::Kotlin,
    "kt" => Language::Kotlin,
    "csharp" => Language::CSharp,
    "c#" => Language::CSharp,
    "cs" => Language::CSharp,
    "go" => Language::Go,
    "golang" => Language::Go,
    "rust" => Language::Rust,
    "rs" => Language::Rust,
};

impl Language {
    pub const ALL: [Language; 9] = [
        Language::C,
        Language::Cpp,
        Language::Python,
        Language::Java,
        Language::JavaScript,
        Language::Kotlin,
        Language::CSharp,
        Language::Go,
        Language::Rust,
    ];

    /// Resolve a user-supplied tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        TAGS.get(tag.trim().to_lowercase().as_str()).copied()
    }

    /// Resolve a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Language::Cpp),
            "py" => Some(Language::Python),
            "java" => Some(Language::Java),
            "js" | "mjs" | "cjs" => Some(Language::JavaScript),
            "kt" | "kts" => Some(Language::Kotlin),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    /// Canonical tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Kotlin => "kotlin",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
        }
    }

    /// How reliable this language's input idioms are to recognize.
    pub fn default_confidence(&self) -> f64 {
        match self {
            Language::C => 0.7,
            Language::Cpp => 0.8,
            Language::Python => 0.9,
            Language::Java => 0.8,
            Language::JavaScript => 0.7,
            Language::Kotlin => 0.8,
            Language::CSharp => 0.8,
            Language::Go => 0.7,
            Language::Rust => 0.8,
        }
    }

    /// All aliases accepted for this language, sorted.
    pub fn aliases(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = TAGS
            .entries()
            .filter(|(_, lang)| *lang == self)
            .map(|(tag, _)| *tag)
            .collect();
        tags.sort_unstable();
        tags
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_case_insensitive() {
        assert_eq!(Language::from_tag("Python"), Some(Language::Python));
        assert_eq!(Language::from_tag("PYTHON3"), Some(Language::Python));
        assert_eq!(Language::from_tag("C++"), Some(Language::Cpp));
        assert_eq!(Language::from_tag("c#"), Some(Language::CSharp));
        assert_eq!(Language::from_tag(" rust "), Some(Language::Rust));
        assert_eq!(Language::from_tag("COBOL"), None);
        assert_eq!(Language::from_tag(""), None);
    }

    #[test]
    fn test_canonical_tag_round_trips() {
        for lang in Language::ALL {
            assert_eq!(Language::from_tag(lang.as_str()), Some(lang));
            assert!(lang.aliases().contains(&lang.as_str()));
        }
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("hpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("kts"), Some(Language::Kotlin));
        assert_eq!(Language::from_extension("ts"), None);
    }

    #[test]
    fn test_confidence_in_range() {
        for lang in Language::ALL {
            let c = lang.default_confidence();
            assert!((0.0..=1.0).contains(&c));
        }
        assert_eq!(Language::Python.default_confidence(), 0.9);
    }
}
