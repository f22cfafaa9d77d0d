//! Normalized documents and classification results.

use serde::{Deserialize, Serialize};

use crate::analysis::token::Token;
use crate::pipeline::fingerprint::Fingerprint;

/// The root tokens of one input text, in source order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub fingerprint: Fingerprint,
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new(fingerprint: Fingerprint, tokens: Vec<Token>) -> Self {
        Document {
            fingerprint,
            tokens,
        }
    }

    /// Root token texts in order.
    pub fn roots(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Roots joined by single spaces.
    pub fn text(&self) -> String {
        self.roots().join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A label with its confidence for one input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    /// Normalized to `[0, 1]`.
    pub confidence: f32,
    pub fingerprint: Fingerprint,
}
