//! Analyzers combine char filters, a tokenizer and token filters.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that turn text into a token stream.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;
}

pub mod normalizer;
pub mod pipeline;

pub use normalizer::{NormalizationTrace, Normalizer};
pub use pipeline::PipelineAnalyzer;
