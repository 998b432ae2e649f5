//! Configuration for stdinfer.
//!
//! A config file tunes the analyzer (per-language confidence weights,
//! number of generated examples) and the tools around it (debounce
//! interval, paths skipped during directory analysis).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::analysis::Language;

/// File names searched for in the working directory, in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["stdinfer.yaml", ".stdinfer.yaml"];

/// Starter config written by `stdinfer init`.
pub const TEMPLATE: &str = include_str!("templates/stdinfer.yaml");

/// Upper bound on generated examples per analysis.
pub const MAX_EXAMPLES: usize = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Confidence overrides keyed by language tag or alias.
    #[serde(default)]
    pub confidence: BTreeMap<String, f64>,
    /// Number of example input blocks to generate (1..=10, default 3).
    #[serde(default = "default_examples")]
    pub examples: usize,
    /// Quiet interval before a watched source is reanalyzed (default 500).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Glob patterns for paths to skip during directory analysis
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

fn default_examples() -> usize {
    3
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: String::new(),
            confidence: BTreeMap::new(),
            examples: default_examples(),
            debounce_ms: default_debounce_ms(),
            excluded_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config from `explicit`, or discover one, or fall back to defaults.
    ///
    /// Returns the path the config came from, if any. The loaded config is
    /// validated before it is returned.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(Path::new(".")),
        };

        let config = match &path {
            Some(p) => {
                let config = Self::parse_file(p)
                    .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", p.display(), e))?;
                validate(&config)?;
                tracing::debug!(path = %p.display(), "loaded config");
                config
            }
            None => Self::default(),
        };
        Ok((config, path))
    }

    /// Confidence weight for `language`, honoring overrides.
    ///
    /// Overrides are clamped to [0, 1], even on a config that skipped
    /// [`validate`]. NaN falls back to the language default.
    pub fn confidence_for(&self, language: Language) -> f64 {
        self.confidence
            .iter()
            .find(|(tag, _)| Language::from_tag(tag) == Some(language))
            .map(|(_, weight)| *weight)
            .filter(|weight| !weight.is_nan())
            .map(|weight| weight.clamp(0.0, 1.0))
            .unwrap_or_else(|| language.default_confidence())
    }

    /// Number of examples to generate, clamped to the supported range.
    pub fn example_count(&self) -> usize {
        self.examples.clamp(1, MAX_EXAMPLES)
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Compile `excluded_paths` into one matcher.
    pub fn excluded_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }
        match self.excluded_set() {
            Ok(set) => set.is_match(path),
            Err(_) => false,
        }
    }
}

/// Find a config file in `dir`, then in the user config directory.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    for name in DEFAULT_CONFIG_NAMES {
        let path = dir.join(name);
        if path.is_file() {
            return Some(path);
        }
    }

    ProjectDirs::from("", "", "stdinfer")
        .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_NAMES[0]))
        .filter(|path| path.is_file())
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    for (tag, weight) in &config.confidence {
        if Language::from_tag(tag).is_none() {
            anyhow::bail!("unknown language {:?} in confidence", tag);
        }
        if !(0.0..=1.0).contains(weight) {
            anyhow::bail!(
                "confidence for {:?} must be between 0 and 1, got {}",
                tag,
                weight
            );
        }
    }

    if !(1..=MAX_EXAMPLES).contains(&config.examples) {
        anyhow::bail!(
            "examples must be between 1 and {}, got {}",
            MAX_EXAMPLES,
            config.examples
        );
    }

    if config.debounce_ms == 0 {
        anyhow::bail!("debounce_ms must be greater than 0");
    }

    for pattern in &config.excluded_paths {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}
