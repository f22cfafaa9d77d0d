//! Linear model with softmax confidence.

use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::features::dot;

/// `score = w · x + b` per label; confidence is the softmax probability of
/// the winning label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    labels: Vec<String>,
    /// One row of length `dimension` per label.
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl LinearClassifier {
    pub fn new(labels: Vec<String>, weights: Vec<Vec<f32>>, bias: Vec<f32>) -> Result<Self> {
        let classifier = LinearClassifier {
            labels,
            weights,
            bias,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    /// Check shapes and values.
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(AkarError::artifact("linear model has no labels"));
        }
        if self.weights.len() != self.labels.len() || self.bias.len() != self.labels.len() {
            return Err(AkarError::artifact(format!(
                "linear model has {} labels, {} weight rows and {} biases",
                self.labels.len(),
                self.weights.len(),
                self.bias.len()
            )));
        }
        let dimension = self.weights[0].len();
        if self.weights.iter().any(|row| row.len() != dimension) {
            return Err(AkarError::artifact("linear model weight rows differ in length"));
        }
        if self
            .weights
            .iter()
            .flatten()
            .chain(&self.bias)
            .any(|w| !w.is_finite())
        {
            return Err(AkarError::artifact("linear model has non-finite weights"));
        }
        Ok(())
    }
}

impl Classifier for LinearClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn dimension(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn scores(&self, values: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| dot(row, values) + b)
            .collect()
    }

    fn confidence(&self, scores: &[f32], best: usize) -> f32 {
        let max = scores[best];
        let sum: f32 = scores.iter().map(|s| (s - max).exp()).sum();
        1.0 / sum
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::features::FeatureVector;
    use crate::pipeline::fingerprint::Fingerprint;

    fn classifier() -> LinearClassifier {
        LinearClassifier::new(
            vec!["pertanian".into(), "pendidikan".into()],
            vec![vec![2.0, 0.0], vec![0.0, 2.0]],
            vec![0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_softmax_confidence() {
        let vector = FeatureVector::new(Fingerprint::of("tani"), vec![1.0, 0.0]);
        let result = classifier().classify(&vector).unwrap();

        assert_eq!(result.label, "pertanian");
        let expected = 1.0 / (1.0 + (-2.0f32).exp());
        assert!((result.confidence - expected).abs() < 1e-6);
        assert_eq!(result.fingerprint, Fingerprint::of("tani"));
    }

    #[test]
    fn test_zero_vector_ties_to_first_label() {
        let vector = FeatureVector::new(Fingerprint::of(""), vec![0.0, 0.0]);
        let result = classifier().classify(&vector).unwrap();

        assert_eq!(result.label, "pertanian");
        assert!((result.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let vector = FeatureVector::new(Fingerprint::of(""), vec![0.0; 3]);
        let err = classifier().classify(&vector).unwrap_err();
        assert!(matches!(err, AkarError::Classification(_)));
    }

    #[test]
    fn test_invalid_shapes() {
        assert!(LinearClassifier::new(vec![], vec![], vec![]).is_err());
        assert!(
            LinearClassifier::new(vec!["a".into()], vec![vec![1.0]], vec![0.0, 1.0]).is_err()
        );
        assert!(
            LinearClassifier::new(
                vec!["a".into(), "b".into()],
                vec![vec![1.0], vec![1.0, 2.0]],
                vec![0.0, 0.0]
            )
            .is_err()
        );
    }

    #[test]
    fn test_classify_batch_preserves_order() {
        let vectors: Vec<_> = (0..50)
            .map(|i| {
                let values = if i % 2 == 0 { vec![1.0, 0.0] } else { vec![0.0, 1.0] };
                FeatureVector::new(Fingerprint::of(&i.to_string()), values)
            })
            .collect();

        let results = classifier().classify_batch(&vectors).unwrap();

        assert_eq!(results.len(), 50);
        for (i, result) in results.iter().enumerate() {
            let expected = if i % 2 == 0 { "pertanian" } else { "pendidikan" };
            assert_eq!(result.label, expected);
            assert_eq!(result.fingerprint, Fingerprint::of(&i.to_string()));
        }
    }
}
