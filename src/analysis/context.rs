//! File-level analysis with caching.
//!
//! The AnalysisContext provides:
//! - Reading source files and inferring their language from the extension
//! - Caching of inferred formats, invalidated when file content changes
//! - Parallel analysis of many files

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use super::{analyze_with, AnalysisError, InputFormat, Language};
use crate::config::Config;

/// Analysis result for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    /// Path relative to the context's base directory.
    pub path: String,
    /// Language the file was analyzed as, if one could be determined.
    pub language: Option<Language>,
    pub format: InputFormat,
}

struct CacheEntry {
    content_hash: u64,
    language: Option<Language>,
    analysis: FileAnalysis,
}

/// Analysis context for a set of files.
pub struct AnalysisContext {
    /// Base directory for relative path resolution.
    base_dir: PathBuf,
    config: Config,
    /// Cached analyses, keyed by absolute path.
    cache: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl AnalysisContext {
    pub fn new<P: AsRef<Path>>(base_dir: P, config: Config) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a file, inferring its language from the extension.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<FileAnalysis> {
        self.analyze_file_as(path, None)
    }

    /// Analyze a file as `language`, or as its extension suggests when `None`.
    ///
    /// Returns the cached result when the file content is unchanged since
    /// the last analysis with the same language.
    pub fn analyze_file_as<P: AsRef<Path>>(
        &self,
        path: P,
        language: Option<Language>,
    ) -> anyhow::Result<FileAnalysis> {
        let abs_path = self.resolve(path.as_ref());
        let source = fs::read_to_string(&abs_path)?;
        let content_hash = hash_of(&source);

        if let Some(entry) = self.read_cache().get(&abs_path) {
            if entry.content_hash == content_hash && entry.language == language {
                tracing::debug!(path = %abs_path.display(), "analysis cache hit");
                return Ok(entry.analysis.clone());
            }
        }

        let rel_path = abs_path
            .strip_prefix(&self.base_dir)
            .unwrap_or(&abs_path)
            .to_string_lossy()
            .to_string();

        let ext = abs_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let resolved = language.or_else(|| Language::from_extension(ext));

        let format = match resolved {
            Some(lang) => analyze_with(&source, lang.as_str(), &self.config),
            None => {
                let tag = if ext.is_empty() { "unknown" } else { ext };
                InputFormat::with_error(&AnalysisError::UnsupportedLanguage(tag.to_string()))
            }
        };

        let analysis = FileAnalysis {
            path: rel_path,
            language: resolved,
            format,
        };

        self.write_cache().insert(
            abs_path,
            CacheEntry {
                content_hash,
                language,
                analysis: analysis.clone(),
            },
        );

        Ok(analysis)
    }

    /// Analyze multiple files in parallel.
    ///
    /// Unreadable files are logged and skipped. Results are sorted by path.
    pub fn analyze_files_parallel(&self, paths: &[PathBuf]) -> Vec<FileAnalysis> {
        use rayon::prelude::*;

        let results: Vec<_> = paths
            .par_iter()
            .map(|p| (p, self.analyze_file(p)))
            .collect();

        let mut analyses = Vec::new();
        for (path, result) in results {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to analyze file");
                }
            }
        }

        analyses.sort_by(|a, b| a.path.cmp(&b.path));
        analyses
    }

    /// Get the cached analysis for a file, if it has been analyzed.
    pub fn cached<P: AsRef<Path>>(&self, path: P) -> Option<FileAnalysis> {
        let abs_path = self.resolve(path.as_ref());
        self.read_cache()
            .get(&abs_path)
            .map(|entry| entry.analysis.clone())
    }

    /// Get all analyzed file paths.
    pub fn analyzed_files(&self) -> Vec<String> {
        let mut files: Vec<_> = self
            .read_cache()
            .values()
            .map(|entry| entry.analysis.path.clone())
            .collect();
        files.sort();
        files
    }

    pub fn clear_cache(&self) {
        self.write_cache().clear();
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn hash_of(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}
