//! Token types for text analysis.
//!
//! A [`Token`] is an immutable span of the source text together with its
//! position in the token stream. Tokens are produced by a tokenizer, pass
//! through the token filters, and end up as the root tokens of a
//! [`crate::pipeline::Document`].
//!
//! # Examples
//!
//! ```
//! use akar::analysis::token::Token;
//!
//! let token = Token::with_offsets("taman", 3, 22, 27);
//! assert_eq!(token.text, "taman");
//! assert_eq!(token.position, 3);
//! assert_eq!(token.end_offset - token.start_offset, 5);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
///
/// # Fields
///
/// - `text` - The token's text content
/// - `position` - Position in the token stream (0-based)
/// - `start_offset` / `end_offset` - Byte offsets in the analyzed text
/// - `stopped` - Whether the token was marked as a stopword
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the analyzed text
    pub start_offset: usize,

    /// The byte offset where this token ends in the analyzed text
    pub end_offset: usize,

    /// Whether this token has been marked as stopped by a filter
    pub stopped: bool,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        let text = text.into();
        let end_offset = text.len();
        Token {
            text,
            position,
            start_offset: 0,
            end_offset,
            stopped: false,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
        }
    }

    /// Get the length of the token text in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Clone this token with updated text, keeping position and offsets.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from the analysis pipeline.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("rumah", 0);
        assert_eq!(token.text, "rumah");
        assert_eq!(token.position, 0);
        assert_eq!(token.start_offset, 0);
        assert_eq!(token.end_offset, 5);
        assert!(!token.stopped);
    }

    #[test]
    fn test_token_with_text_keeps_position() {
        let token = Token::with_offsets("bermain", 1, 7, 14).stop();
        let stemmed = token.with_text("main");

        assert_eq!(stemmed.text, "main");
        assert_eq!(stemmed.position, 1);
        assert_eq!(stemmed.start_offset, 7);
        assert!(stemmed.is_stopped());
    }

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(Token::new("café", 0).char_len(), 4);
    }

    #[test]
    fn test_token_stream() {
        let tokens = vec![Token::new("buku", 0), Token::new("taman", 1)];

        let collected: Vec<_> = tokens.into_token_stream().collect();

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].text, "buku");
        assert_eq!(collected[1].text, "taman");
    }
}
