//! Rule-based Indonesian stemming.
//!
//! - [`Dictionary`] - the set of known root words
//! - [`AffixRuleSet`] - ordered suffix and prefix rules with recodes
//! - [`IndonesianStemmer`] - reduces a word to its dictionary root
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use akar::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer, Stemmer};
//!
//! let dictionary = Dictionary::from_words(["ajar", "main"]);
//! let stemmer = IndonesianStemmer::new(
//!     Arc::new(dictionary),
//!     Arc::new(AffixRuleSet::default_indonesian()),
//! );
//!
//! let result = stemmer.stem("pembelajaran");
//! assert!(result.success);
//! assert_eq!(result.root, "ajar");
//!
//! let result = stemmer.stem("xyzabc");
//! assert!(!result.success);
//! assert_eq!(result.root, "xyzabc");
//! ```

pub mod dictionary;
pub mod rules;
pub mod stemmer;

pub use dictionary::Dictionary;
pub use rules::{AffixCategory, AffixRuleSet, RuleTableSpec, SuffixGroup};
pub use stemmer::{AppliedRule, IndonesianStemmer, StemResult, Stemmer, StemmerOptions};
