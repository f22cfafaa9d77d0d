//! Stemming token filter.

use std::fmt;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;
use crate::stemming::Stemmer;

/// A filter that replaces each token's text with its root form.
///
/// Tokens the stemmer cannot reduce keep their text, so a single unknown word
/// never aborts the stream. Stopped tokens are passed through untouched.
#[derive(Clone)]
pub struct StemFilter {
    stemmer: Arc<dyn Stemmer>,
}

impl fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a stem filter around a shared stemmer.
    pub fn new(stemmer: Arc<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }

    /// Get the wrapped stemmer.
    pub fn stemmer(&self) -> &Arc<dyn Stemmer> {
        &self.stemmer
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stemmer = Arc::clone(&self.stemmer);
        Ok(Box::new(tokens.map(move |token| {
            if token.is_stopped() {
                token
            } else {
                let result = stemmer.stem(&token.text);
                token.with_text(result.root)
            }
        })))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::{IntoTokenStream, Token};
    use crate::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer};

    fn filter() -> StemFilter {
        let dictionary = Dictionary::from_words(["main", "taman", "ajar"]);
        let stemmer = IndonesianStemmer::new(
            Arc::new(dictionary),
            Arc::new(AffixRuleSet::default_indonesian()),
        );
        StemFilter::new(Arc::new(stemmer))
    }

    #[test]
    fn test_stem_filter() {
        let tokens = vec![
            Token::new("bermain", 0),
            Token::new("xyzabc", 1),
            Token::new("pelajaran", 2).stop(),
        ];

        let result: Vec<Token> = filter()
            .filter(tokens.into_token_stream())
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "main");
        assert_eq!(result[1].text, "xyzabc");
        assert_eq!(result[2].text, "pelajaran"); // Stopped tokens are not processed
    }

    #[test]
    fn test_filter_name() {
        let filter = filter();
        assert_eq!(filter.name(), "stem");
        assert_eq!(filter.stemmer().name(), "indonesian");
    }
}
