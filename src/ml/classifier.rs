//! Classifier trait definition.

use rayon::prelude::*;

use crate::error::{AkarError, Result};
use crate::ml::features::FeatureVector;
use crate::pipeline::document::ClassificationResult;

/// A pre-trained, read-only model mapping feature vectors to labels.
///
/// Implementations only provide raw scores and the confidence rule; argmax,
/// dimension checks and batching are shared.
pub trait Classifier: Send + Sync {
    /// Labels in model order.
    fn labels(&self) -> &[String];

    /// Expected feature vector length.
    fn dimension(&self) -> usize;

    /// One score per label.
    fn scores(&self, values: &[f32]) -> Vec<f32>;

    /// Confidence in `[0, 1]` of the label at `best`.
    fn confidence(&self, scores: &[f32], best: usize) -> f32;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &'static str;

    /// Classify one vector. Ties go to the label listed first.
    fn classify(&self, vector: &FeatureVector) -> Result<ClassificationResult> {
        if vector.dimension() != self.dimension() {
            return Err(AkarError::classification(format!(
                "feature vector has dimension {}, model expects {}",
                vector.dimension(),
                self.dimension()
            )));
        }

        let scores = self.scores(&vector.values);
        let best = argmax(&scores)
            .ok_or_else(|| AkarError::classification("model has no labels"))?;
        let confidence = self.confidence(&scores, best).clamp(0.0, 1.0);

        Ok(ClassificationResult {
            label: self.labels()[best].clone(),
            confidence,
            fingerprint: vector.fingerprint,
        })
    }

    /// Classify many vectors in parallel. Output order matches input order.
    fn classify_batch(&self, vectors: &[FeatureVector]) -> Result<Vec<ClassificationResult>> {
        vectors.par_iter().map(|v| self.classify(v)).collect()
    }
}

/// Index of the first maximum, or `None` for an empty slice.
pub(crate) fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_on_ties() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), Some(1));
        assert_eq!(argmax(&[0.0, 0.0]), Some(0));
        assert_eq!(argmax(&[-1.0, -0.5]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
