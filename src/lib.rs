//! # akar
//!
//! Rule-based Indonesian stemming and text classification.
//!
//! ## Features
//!
//! - Dictionary-validated affix stripping with backtracking and recoding
//! - Lazy analysis chain: char filters, tokenizer, stopwords, stemming
//! - Frozen TF-IDF vocabulary with linear and centroid classifiers
//! - Single-flight result cache keyed by content fingerprint
//! - Order-preserving parallel batch classification
//!
//! ```
//! use std::sync::Arc;
//!
//! use akar::analysis::analyzer::Normalizer;
//! use akar::analysis::token_filter::StopFilter;
//! use akar::config::AnalysisConfig;
//! use akar::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer};
//!
//! let stemmer = IndonesianStemmer::new(
//!     Arc::new(Dictionary::from_words(["main", "taman"])),
//!     Arc::new(AffixRuleSet::default_indonesian()),
//! );
//! let normalizer =
//!     Normalizer::new(&AnalysisConfig::default(), Arc::new(stemmer), StopFilter::new()).unwrap();
//!
//! let document = normalizer.normalize("Mereka bermain-main di taman").unwrap();
//! assert_eq!(document.roots(), vec!["main", "taman"]);
//! ```

pub mod analysis;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod stemming;

pub mod prelude {
    pub use crate::analysis::analyzer::{Analyzer, Normalizer};
    pub use crate::artifacts::Artifacts;
    pub use crate::config::PipelineConfig;
    pub use crate::error::{AkarError, Result};
    pub use crate::ml::Classifier;
    pub use crate::pipeline::{ClassificationResult, Document, Fingerprint, Pipeline};
    pub use crate::stemming::{IndonesianStemmer, StemResult, Stemmer};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
