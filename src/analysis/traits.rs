//! Core traits for language analysis.

use super::patterns::{CommentStyle, RequirementSet};
use super::{InputRequirement, Language};

/// How an analyzer turns its requirement count into a line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEstimate {
    /// Scalar reads in these languages commonly share a line
    /// (`scanf("%d %d")`, `cin >> a >> b`), so count two per line.
    Halved,
    /// One line per requirement.
    PerRequirement,
}

impl LineEstimate {
    /// Estimated number of stdin lines, never less than one.
    pub fn total_lines(&self, requirements: usize) -> usize {
        let lines = match self {
            LineEstimate::Halved => requirements.div_ceil(2),
            LineEstimate::PerRequirement => requirements,
        };
        lines.max(1)
    }
}

/// Language-specific analyzer trait.
///
/// Each supported language implements this trait with its own pattern
/// library. Analyzers are stateless; the compiled patterns live in
/// process-wide statics and are only ever read.
pub trait LanguageAnalyzer: Send + Sync {
    /// Which language this analyzer handles.
    fn language(&self) -> Language;

    /// Comment syntax stripped before matching.
    fn comment_style(&self) -> CommentStyle {
        CommentStyle::CStyle
    }

    /// Line count heuristic for this language's idioms.
    fn line_estimate(&self) -> LineEstimate;

    /// Apply the pattern library to comment-free source.
    ///
    /// Rules must run in precedence order: specific constructs before the
    /// catch-all rules that would otherwise claim the same variable.
    fn extract(&self, code: &str, found: &mut RequirementSet) -> anyhow::Result<()>;

    /// Strip comments, run the rules and return requirements in source order.
    fn requirements(&self, source: &str) -> anyhow::Result<Vec<InputRequirement>> {
        let clean = self.comment_style().strip(source);
        let mut found = RequirementSet::new();
        self.extract(&clean, &mut found)?;
        tracing::debug!(
            language = %self.language(),
            count = found.len(),
            "extracted input requirements"
        );
        Ok(found.into_requirements())
    }
}
