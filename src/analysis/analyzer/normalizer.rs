//! Normalization of raw Indonesian text into root tokens.
//!
//! The normalizer is the analysis chain used by the pipeline:
//!
//! ```text
//! escapes → digits → tokenizer → length → stopwords → stemmer → length
//! ```
//!
//! A token that cannot be stemmed stays in the document as it was after
//! stopword removal.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::{EscapeCharFilter, PatternReplaceCharFilter};
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::{Filter, LengthFilter, StemFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::pipeline::document::Document;
use crate::pipeline::fingerprint::Fingerprint;
use crate::stemming::{StemResult, Stemmer};

/// Every intermediate step of one normalization, for diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct NormalizationTrace {
    /// Text after char filtering.
    pub cleaned: String,
    /// Tokens after the length filter, stopwords marked as stopped.
    pub tokens: Vec<Token>,
    /// One stemming result per token that survived stopword removal.
    pub stems: Vec<StemResult>,
    pub document: Document,
}

/// Turns raw text into a [`Document`] of root tokens.
#[derive(Clone)]
pub struct Normalizer {
    /// Char filters, tokenizer and leading length filter.
    tokens: PipelineAnalyzer,
    /// `tokens` followed by stopwords, stemming and trailing length filter.
    full: PipelineAnalyzer,
    stop_filter: StopFilter,
    length_filter: LengthFilter,
    stemmer: Arc<dyn Stemmer>,
}

impl Normalizer {
    /// Build the normalization chain.
    pub fn new(
        config: &AnalysisConfig,
        stemmer: Arc<dyn Stemmer>,
        stop_filter: StopFilter,
    ) -> Result<Self> {
        let length_filter = LengthFilter::new(config.min_token_chars);

        let mut tokens = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new()?));
        if config.strip_escapes {
            tokens = tokens.add_char_filter(Arc::new(EscapeCharFilter::new()));
        }
        if config.strip_digits {
            tokens = tokens.add_char_filter(Arc::new(PatternReplaceCharFilter::digits()?));
        }
        let tokens = tokens
            .add_filter(Arc::new(length_filter))
            .with_name("tokens");

        let full = tokens
            .clone()
            .add_filter(Arc::new(stop_filter.clone()))
            .add_filter(Arc::new(StemFilter::new(Arc::clone(&stemmer))))
            .add_filter(Arc::new(length_filter))
            .with_name("normalizer");

        Ok(Normalizer {
            tokens,
            full,
            stop_filter,
            length_filter,
            stemmer,
        })
    }

    pub fn stemmer(&self) -> &Arc<dyn Stemmer> {
        &self.stemmer
    }

    pub fn stop_filter(&self) -> &StopFilter {
        &self.stop_filter
    }

    /// Normalize `text` into its ordered root tokens.
    pub fn normalize(&self, text: &str) -> Result<Document> {
        let tokens = self.full.analyze(text)?.collect();
        Ok(Document::new(Fingerprint::of(text), tokens))
    }

    /// Normalize `text` and keep every intermediate step.
    ///
    /// The returned document is identical to [`Normalizer::normalize`].
    pub fn normalize_with_trace(&self, text: &str) -> Result<NormalizationTrace> {
        let cleaned = self.tokens.clean(text);
        let marking = self.stop_filter.clone().remove_stopped(false);
        let tokens: Vec<Token> = marking.filter(self.tokens.analyze(text)?)?.collect();

        let mut stems = Vec::new();
        let mut roots = Vec::new();
        for token in tokens.iter().filter(|t| !t.is_stopped()) {
            let result = self.stemmer.stem(&token.text);
            roots.push(token.with_text(result.root.clone()));
            stems.push(result);
        }
        let roots = self
            .length_filter
            .filter(Box::new(roots.into_iter()))?
            .collect();

        Ok(NormalizationTrace {
            cleaned,
            tokens,
            stems,
            document: Document::new(Fingerprint::of(text), roots),
        })
    }

    /// Normalize a description with its category repeated `category_weight`
    /// times, so the category carries more weight in the feature vector.
    pub fn normalize_fields(
        &self,
        description: &str,
        category: &str,
        category_weight: usize,
    ) -> Result<Document> {
        let mut combined = description.to_string();
        for _ in 0..category_weight.max(1) {
            combined.push(' ');
            combined.push_str(category);
        }
        self.normalize(&combined)
    }

    /// Normalize many texts in parallel. Output order matches input order.
    pub fn normalize_batch<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<Result<Document>> {
        texts
            .par_iter()
            .map(|text| self.normalize(text.as_ref()))
            .collect()
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("analyzer", &self.full)
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl Analyzer for Normalizer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.full.analyze(text)
    }

    fn name(&self) -> &'static str {
        "normalizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer};

    fn normalizer() -> Normalizer {
        let dictionary = Dictionary::from_words(["main", "taman", "ajar", "buku", "tani", "jual"]);
        let stemmer = IndonesianStemmer::new(
            Arc::new(dictionary),
            Arc::new(AffixRuleSet::default_indonesian()),
        );
        Normalizer::new(
            &AnalysisConfig::default(),
            Arc::new(stemmer),
            StopFilter::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_normalize_reduplication_example() {
        let document = normalizer().normalize("Mereka bermain-main di taman").unwrap();

        assert_eq!(document.roots(), vec!["main", "taman"]);
        assert_eq!(document.tokens[0].position, 1);
        assert_eq!(document.tokens[1].position, 3);
        assert_eq!(
            document.fingerprint,
            Fingerprint::of("Mereka bermain-main di taman")
        );
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        let document = normalizer().normalize("Pelajaran xyzabc").unwrap();
        assert_eq!(document.roots(), vec!["ajar", "xyzabc"]);
    }

    #[test]
    fn test_cleaning() {
        let document = normalizer()
            .normalize(r"Petani\n2024: menjual 10 buku, a b!")
            .unwrap();

        assert_eq!(document.roots(), vec!["tani", "jual", "buku"]);
    }

    #[test]
    fn test_empty_text_gives_empty_document() {
        let document = normalizer().normalize("  ...  ").unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let normalizer = normalizer();
        let text = "Mereka bermain-main di taman bersama petani";
        assert_eq!(
            normalizer.normalize(text).unwrap(),
            normalizer.normalize(text).unwrap()
        );
    }

    #[test]
    fn test_trace_matches_normalize() {
        let normalizer = normalizer();
        let text = "Mereka bermain-main di taman";
        let trace = normalizer.normalize_with_trace(text).unwrap();

        assert_eq!(trace.document, normalizer.normalize(text).unwrap());
        assert_eq!(trace.tokens.len(), 4);
        assert!(trace.tokens[0].is_stopped());
        assert_eq!(trace.stems.len(), 2);
        assert_eq!(trace.stems[0].original, "bermain-main");
        assert!(trace.stems[0].success);
    }

    #[test]
    fn test_normalize_fields_weights_category() {
        let normalizer = normalizer();

        let document = normalizer.normalize_fields("buku", "pertanian", 3).unwrap();
        assert_eq!(document.roots(), vec!["buku", "tani", "tani", "tani"]);

        let document = normalizer.normalize_fields("buku", "pertanian", 0).unwrap();
        assert_eq!(document.roots(), vec!["buku", "tani"]);
    }

    #[test]
    fn test_normalize_batch_preserves_order() {
        let documents = normalizer().normalize_batch(&["taman", "buku", "bermain"]);
        let roots: Vec<_> = documents
            .into_iter()
            .map(|d| d.unwrap().text())
            .collect();

        assert_eq!(roots, vec!["taman", "buku", "main"]);
    }
}
