//! Error types for the Akar library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`AkarError`] enum. Stemming never fails: a word that cannot be reduced is
//! reported through [`crate::stemming::StemResult::success`] instead.
//!
//! # Examples
//!
//! ```
//! use akar::error::{AkarError, Result};
//!
//! fn check(text: &str) -> Result<()> {
//!     if text.trim().is_empty() {
//!         return Err(AkarError::invalid_input("empty text"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("   ").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Akar operations.
#[derive(Error, Debug)]
pub enum AkarError {
    /// I/O errors (artifact files, cache files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A startup artifact (dictionary, rules, vocabulary, model) is missing or malformed.
    ///
    /// This is fatal: a pipeline must not be built from broken artifacts.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// The caller supplied input that cannot be processed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The persistence collaborator for cached results is unreachable.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Vectorization or classification failed.
    #[error("Classification error: {0}")]
    Classification(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with AkarError.
pub type Result<T> = std::result::Result<T, AkarError>;

impl AkarError {
    /// Create a new artifact error.
    pub fn artifact<S: Into<String>>(msg: S) -> Self {
        AkarError::Artifact(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        AkarError::InvalidInput(msg.into())
    }

    /// Create a new cache unavailable error.
    pub fn cache_unavailable<S: Into<String>>(msg: S) -> Self {
        AkarError::CacheUnavailable(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        AkarError::Analysis(msg.into())
    }

    /// Create a new classification error.
    pub fn classification<S: Into<String>>(msg: S) -> Self {
        AkarError::Classification(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AkarError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        AkarError::Other(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::other(format!("Internal error: {}", msg.into()))
    }

    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AkarError::InvalidInput(_))
    }
}
