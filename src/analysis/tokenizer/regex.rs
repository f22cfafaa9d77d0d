//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{AkarError, Result};

/// Word characters, optionally joined by single inner hyphens.
///
/// Keeps reduplicated forms such as `bermain-main` together while leading and
/// trailing punctuation never becomes part of a token.
pub const DEFAULT_PATTERN: &str = r"\w+(?:-\w+)*";

/// A regex-based tokenizer that extracts every match of a pattern as a token.
///
/// Tokens are lowercased by default.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
    /// Whether matched text is lowercased
    lowercase: bool,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with [`DEFAULT_PATTERN`].
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| AkarError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
            lowercase: true,
        })
    }

    /// Set whether tokens are lowercased.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new().expect("Default regex pattern should be valid")
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(RegexTokenIter {
            pattern: Arc::clone(&self.pattern),
            text: text.to_owned(),
            cursor: 0,
            position: 0,
            lowercase: self.lowercase,
        }))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

/// Lazily walks the matches of a pattern over an owned copy of the text.
struct RegexTokenIter {
    pattern: Arc<Regex>,
    text: String,
    cursor: usize,
    position: usize,
    lowercase: bool,
}

impl Iterator for RegexTokenIter {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.cursor <= self.text.len() {
            let mat = self.pattern.find_at(&self.text, self.cursor)?;

            if mat.start() == mat.end() {
                // Step over one character so an empty match cannot stall the scan.
                self.cursor = self.text[mat.end()..]
                    .chars()
                    .next()
                    .map_or(self.text.len() + 1, |c| mat.end() + c.len_utf8());
                continue;
            }

            self.cursor = mat.end();
            let text = if self.lowercase {
                mat.as_str().to_lowercase()
            } else {
                mat.as_str().to_string()
            };
            let token = Token::with_offsets(text, self.position, mat.start(), mat.end());
            self.position += 1;
            return Some(token);
        }
        None
    }
}
