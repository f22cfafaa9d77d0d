//! Root word dictionary.
//!
//! The dictionary is the oracle the stemmer validates every candidate against.
//! It is loaded once and never mutated while a pipeline is running.

use std::fs;
use std::path::Path;

use ahash::AHashSet;

use crate::error::{AkarError, Result};

/// An immutable set of lowercase root words.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    words: AHashSet<String>,
}

impl Dictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from a list of words.
    ///
    /// Words are trimmed and lowercased; blank entries are skipped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Dictionary { words }
    }

    /// Parse the one-word-per-line format. `#` starts a comment line.
    pub fn parse(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load a dictionary file.
    ///
    /// A missing, unreadable or empty file is an artifact error: a stemmer
    /// without roots would silently pass every word through.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::artifact(format!(
                "failed to read dictionary {}: {e}",
                path.display()
            ))
        })?;

        let dictionary = Self::parse(&content);
        if dictionary.is_empty() {
            return Err(AkarError::artifact(format!(
                "dictionary {} contains no words",
                path.display()
            )));
        }
        Ok(dictionary)
    }

    /// Check whether `word` is a known root.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of root words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate over the root words in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_words_normalizes() {
        let dictionary = Dictionary::from_words(["  Main ", "TAMAN", ""]);

        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.contains("main"));
        assert!(dictionary.contains("taman"));
        assert!(!dictionary.contains("Main"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let dictionary = Dictionary::parse("# kata dasar\nbuku\n\n  ajar\n#komentar\n");

        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.contains("buku"));
        assert!(dictionary.contains("ajar"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "makan\nminum").unwrap();

        let dictionary = Dictionary::load(file.path()).unwrap();
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn test_load_rejects_missing_and_empty() {
        let err = Dictionary::load("/nonexistent/kata-dasar.txt").unwrap_err();
        assert!(matches!(err, AkarError::Artifact(_)));

        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Dictionary::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("no words"));
    }
}
