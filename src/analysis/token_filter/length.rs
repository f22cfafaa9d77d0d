//! Length filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that drops tokens with fewer than `min_chars` characters.
///
/// Single letters left behind by punctuation and digit removal carry no
/// meaning in Indonesian text, so the normalizer runs this filter both before
/// stopword removal and after stemming.
#[derive(Clone, Copy, Debug)]
pub struct LengthFilter {
    min_chars: usize,
}

impl LengthFilter {
    /// Create a new length filter keeping tokens of at least `min_chars` characters.
    pub fn new(min_chars: usize) -> Self {
        LengthFilter { min_chars }
    }

    /// Get the minimum number of characters.
    pub fn min_chars(&self) -> usize {
        self.min_chars
    }
}

impl Default for LengthFilter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Filter for LengthFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let min_chars = self.min_chars;
        Ok(Box::new(
            tokens.filter(move |token| token.char_len() >= min_chars),
        ))
    }

    fn name(&self) -> &'static str {
        "length"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{IntoTokenStream, Token};

    #[test]
    fn test_length_filter() {
        let filter = LengthFilter::new(2);
        let tokens = vec![
            Token::new("a", 0),
            Token::new("di", 1),
            Token::new("x", 2),
            Token::new("taman", 3),
        ];

        let result: Vec<_> = filter.filter(tokens.into_token_stream()).unwrap().collect();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "di");
        assert_eq!(result[1].text, "taman");
        assert_eq!(result[1].position, 3);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let filter = LengthFilter::new(2);
        let tokens = vec![Token::new("é", 0)];

        let result: Vec<_> = filter.filter(tokens.into_token_stream()).unwrap().collect();

        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_name() {
        assert_eq!(LengthFilter::default().name(), "length");
        assert_eq!(LengthFilter::default().min_chars(), 2);
    }
}
