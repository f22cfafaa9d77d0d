//! Token filter implementations for token transformation.
//!
//! Filters receive the token stream produced by a tokenizer and return a new
//! stream. All filters here are lazy: they wrap the incoming iterator and do
//! their work as tokens are pulled.
//!
//! # Available Filters
//!
//! - [`length::LengthFilter`] - Drops tokens shorter than a character bound
//! - [`stop::StopFilter`] - Removes Indonesian stopwords
//! - [`stem::StemFilter`] - Replaces each token by its dictionary root
//!
//! # Examples
//!
//! ```
//! use akar::analysis::token::{IntoTokenStream, Token};
//! use akar::analysis::token_filter::Filter;
//! use akar::analysis::token_filter::stop::StopFilter;
//!
//! let filter = StopFilter::new();
//! let tokens = vec![Token::new("mereka", 0), Token::new("taman", 1)];
//! let filtered: Vec<_> = filter.filter(tokens.into_token_stream())
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].text, "taman");
//! ```
//!
//! # Filter Chaining
//!
//! ```text
//! Tokenizer → Length → Stop Words → Stemmer → Length → Document
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and tracing).
    fn name(&self) -> &'static str;
}

pub mod length;
pub mod stem;
pub mod stop;

pub use length::LengthFilter;
pub use stem::StemFilter;
pub use stop::StopFilter;
