//! Tokenizer implementations for text analysis.
//!
//! Tokenizers are the first step of the analysis pipeline: they split text
//! into [`Token`](crate::analysis::token::Token)s. The returned stream is lazy
//! and owns everything it needs, so calling `tokenize` twice on the same text
//! yields two independent, identical streams.
//!
//! # Examples
//!
//! ```
//! use akar::analysis::tokenizer::Tokenizer;
//! use akar::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Mereka bermain-main di taman.").unwrap().collect();
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[1].text, "bermain-main");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so one tokenizer can serve concurrent
/// pipeline invocations.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod regex;

pub use regex::RegexTokenizer;
