//! Nearest-centroid classifier with cosine scoring.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::features::{FeatureVector, cosine_similarity};

/// One prototype vector per label, scored by cosine similarity.
///
/// Confidence is the winning similarity divided by the sum of all positive
/// similarities, or `1 / labels` when nothing is similar at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentroidClassifier {
    labels: Vec<String>,
    centroids: Vec<Vec<f32>>,
}

impl CentroidClassifier {
    pub fn new(labels: Vec<String>, centroids: Vec<Vec<f32>>) -> Result<Self> {
        let classifier = CentroidClassifier { labels, centroids };
        classifier.validate()?;
        Ok(classifier)
    }

    /// Average the training vectors of each label. Labels are ordered lexically.
    pub fn fit(vectors: &[FeatureVector], labels: &[String]) -> Result<Self> {
        if vectors.is_empty() {
            return Err(AkarError::invalid_input("cannot fit a model on zero samples"));
        }
        if vectors.len() != labels.len() {
            return Err(AkarError::invalid_input(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }

        let dimension = vectors[0].dimension();
        let mut sums: BTreeMap<&str, (Vec<f32>, usize)> = BTreeMap::new();
        for (vector, label) in vectors.iter().zip(labels) {
            if vector.dimension() != dimension {
                return Err(AkarError::invalid_input(
                    "training vectors differ in dimension",
                ));
            }
            let (sum, count) = sums
                .entry(label.as_str())
                .or_insert_with(|| (vec![0.0; dimension], 0));
            for (s, v) in sum.iter_mut().zip(&vector.values) {
                *s += v;
            }
            *count += 1;
        }

        let (labels, centroids) = sums
            .into_iter()
            .map(|(label, (sum, count))| {
                let centroid: Vec<f32> = sum.into_iter().map(|s| s / count as f32).collect();
                (label.to_string(), centroid)
            })
            .unzip();

        Self::new(labels, centroids)
    }

    /// Check shapes and values.
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(AkarError::artifact("centroid model has no labels"));
        }
        if self.centroids.len() != self.labels.len() {
            return Err(AkarError::artifact(format!(
                "centroid model has {} labels but {} centroids",
                self.labels.len(),
                self.centroids.len()
            )));
        }
        let dimension = self.centroids[0].len();
        if self.centroids.iter().any(|c| c.len() != dimension) {
            return Err(AkarError::artifact("centroids differ in length"));
        }
        if self.centroids.iter().flatten().any(|v| !v.is_finite()) {
            return Err(AkarError::artifact("centroid model has non-finite values"));
        }
        Ok(())
    }
}

impl Classifier for CentroidClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn dimension(&self) -> usize {
        self.centroids.first().map_or(0, Vec::len)
    }

    fn scores(&self, values: &[f32]) -> Vec<f32> {
        self.centroids
            .iter()
            .map(|centroid| cosine_similarity(values, centroid))
            .collect()
    }

    fn confidence(&self, scores: &[f32], best: usize) -> f32 {
        let positive: f32 = scores.iter().filter(|s| **s > 0.0).sum();
        if positive > 0.0 {
            scores[best].max(0.0) / positive
        } else {
            1.0 / scores.len() as f32
        }
    }

    fn name(&self) -> &'static str {
        "centroid"
    }
}
