//! Dense feature vectors.

use serde::{Deserialize, Serialize};

use crate::pipeline::fingerprint::Fingerprint;

/// A fixed-length vector over the frozen vocabulary.
///
/// The fingerprint of the text it was computed from travels with it, so a
/// classification result can be traced back to its input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub fingerprint: Fingerprint,
    pub values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(fingerprint: Fingerprint, values: Vec<f32>) -> Self {
        FeatureVector {
            fingerprint,
            values,
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    pub fn is_zero(&self) -> bool {
        self.nnz() == 0
    }
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn l2_norm(a: &[f32]) -> f32 {
    dot(a, a).sqrt()
}

/// Cosine similarity; zero when either vector is zero or lengths differ.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let magnitude_a = l2_norm(a);
    let magnitude_b = l2_norm(b);
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        0.0
    } else {
        dot(a, b) / (magnitude_a * magnitude_b)
    }
}
