//! Configuration for the normalization and classification pipeline.
//!
//! A [`PipelineConfig`] is usually read from a JSON file:
//!
//! ```json
//! {
//!   "artifacts": {
//!     "dictionary": "data/kata-dasar.txt",
//!     "vocabulary": "artifacts/vocabulary.json",
//!     "model": "artifacts/model.json"
//!   },
//!   "analysis": { "min_stem_chars": 3 },
//!   "cache_capacity": 50000
//! }
//! ```
//!
//! Missing fields take their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::stemming::StemmerOptions;

/// Locations of the startup artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Root word list, one word per line.
    pub dictionary: Option<PathBuf>,

    /// Stopword list, one word per line. The built-in Indonesian list is
    /// used when absent.
    pub stopwords: Option<PathBuf>,

    /// JSON affix rule table. The built-in table is used when absent.
    pub rules: Option<PathBuf>,

    /// JSON frozen vocabulary.
    pub vocabulary: Option<PathBuf>,

    /// JSON classifier model.
    pub model: Option<PathBuf>,
}

/// Text analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tokens with fewer characters are dropped before and after stemming.
    pub min_token_chars: usize,

    /// Tokens with fewer characters are never stemmed.
    pub min_stem_chars: usize,

    /// Maximum number of prefixes removed from one word.
    pub max_prefix_passes: usize,

    /// Remove digits before tokenization.
    pub strip_digits: bool,

    /// Replace literal escape sequences (`\n`, `\uXXXX`) before tokenization.
    pub strip_escapes: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_token_chars: 2,
            min_stem_chars: 3,
            max_prefix_passes: 3,
            strip_digits: true,
            strip_escapes: true,
        }
    }
}

impl AnalysisConfig {
    pub fn stemmer_options(&self) -> StemmerOptions {
        StemmerOptions {
            min_stem_chars: self.min_stem_chars,
            max_prefix_passes: self.max_prefix_passes,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub artifacts: ArtifactPaths,

    pub analysis: AnalysisConfig,

    /// Inputs larger than this are rejected.
    pub max_input_bytes: usize,

    /// Completed results kept in memory before the oldest are evicted.
    pub cache_capacity: usize,

    /// JSONL file backing the result cache across runs.
    pub cache_path: Option<PathBuf>,

    /// Thread pool size for batch execution.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifacts: ArtifactPaths::default(),
            analysis: AnalysisConfig::default(),
            max_input_bytes: 1024 * 1024, // 1MB
            cache_capacity: 100_000,
            cache_path: None,
            thread_pool_size: None,
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::config(format!("failed to read config {}: {e}", path.display()))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            AkarError::config(format!("malformed config {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Set the dictionary path.
    pub fn with_dictionary<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifacts.dictionary = Some(path.into());
        self
    }

    /// Set the stopword list path.
    pub fn with_stopwords<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifacts.stopwords = Some(path.into());
        self
    }

    /// Set the rule table path.
    pub fn with_rules<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifacts.rules = Some(path.into());
        self
    }

    /// Set the vocabulary path.
    pub fn with_vocabulary<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifacts.vocabulary = Some(path.into());
        self
    }

    /// Set the model path.
    pub fn with_model<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifacts.model = Some(path.into());
        self
    }

    /// Set the analysis settings.
    pub fn with_analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = analysis;
        self
    }

    /// Set the maximum input size in bytes.
    pub fn with_max_input_bytes(mut self, bytes: usize) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    /// Set the in-memory cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the JSONL cache file.
    pub fn with_cache_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Set the batch thread pool size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Effective batch thread count.
    pub fn threads(&self) -> usize {
        self.thread_pool_size.unwrap_or_else(num_cpus::get)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(AkarError::config("max_input_bytes must be greater than zero"));
        }
        if self.cache_capacity == 0 {
            return Err(AkarError::config("cache_capacity must be greater than zero"));
        }
        if self.thread_pool_size == Some(0) {
            return Err(AkarError::config("thread_pool_size must be greater than zero"));
        }
        if self.analysis.min_stem_chars == 0 {
            return Err(AkarError::config("min_stem_chars must be greater than zero"));
        }
        if self.analysis.max_prefix_passes == 0 {
            return Err(AkarError::config("max_prefix_passes must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_input_bytes, 1024 * 1024);
        assert_eq!(config.cache_capacity, 100_000);
        assert_eq!(config.analysis.min_token_chars, 2);
        assert_eq!(config.analysis.stemmer_options(), StemmerOptions::default());
        assert!(config.threads() > 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::default()
            .with_dictionary("data/kata-dasar.txt")
            .with_cache_capacity(10)
            .with_thread_pool_size(2);

        assert_eq!(
            config.artifacts.dictionary,
            Some(PathBuf::from("data/kata-dasar.txt"))
        );
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.threads(), 2);
    }

    #[test]
    fn test_validate_rejects_zero_bounds() {
        let config = PipelineConfig::default().with_cache_capacity(0);
        assert!(matches!(config.validate(), Err(AkarError::Config(_))));

        let config = PipelineConfig::default().with_thread_pool_size(0);
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.analysis.max_prefix_passes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"{"artifacts": {"dictionary": "kata.txt"}, "analysis": {"strip_digits": false}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.artifacts.dictionary, Some(PathBuf::from("kata.txt")));
        assert!(!config.analysis.strip_digits);
        assert_eq!(config.analysis.min_stem_chars, 3);
        assert_eq!(config.cache_capacity, 100_000);
    }

    #[test]
    fn test_from_file_errors() {
        assert!(PipelineConfig::from_file("/nonexistent/akar.json").is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{"cache_capacity": 0}"#).unwrap();
        assert!(matches!(
            PipelineConfig::from_file(file.path()),
            Err(AkarError::Config(_))
        ));
    }
}
