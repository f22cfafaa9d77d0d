//! Offline training of the vocabulary and centroid model.
//!
//! Never used at inference time; the `train` command writes the two
//! artifacts that the pipeline later loads read-only.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Normalizer;
use crate::ml::centroid::CentroidClassifier;
use crate::ml::classifier::Classifier;
use crate::ml::model::ModelArtifact;
use crate::ml::tfidf::{FitOptions, TfIdfVectorizer};

/// A labeled training text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub text: String,
    pub label: String,
}

/// Summary of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub vocabulary_size: usize,
    pub labels: Vec<String>,
    /// Fraction of training samples the fitted model labels correctly.
    pub accuracy: f32,
}

/// Read a JSON array of `{ "text": .., "label": .. }` samples.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> Result<Vec<TrainingSample>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read training data {}", path.display()))?;
    let samples: Vec<TrainingSample> = serde_json::from_str(&content)
        .with_context(|| format!("malformed training data {}", path.display()))?;
    Ok(samples)
}

/// Fit a vocabulary and a centroid model on `samples`.
pub fn train(
    samples: &[TrainingSample],
    normalizer: &Normalizer,
    options: &FitOptions,
) -> Result<(TfIdfVectorizer, ModelArtifact, TrainingReport)> {
    if samples.is_empty() {
        anyhow::bail!("Training samples cannot be empty");
    }

    let texts: Vec<&str> = samples.iter().map(|s| s.text.as_str()).collect();
    let documents = normalizer
        .normalize_batch(&texts)
        .into_iter()
        .collect::<crate::error::Result<Vec<_>>>()?;

    let vectorizer = TfIdfVectorizer::fit(&documents, options)?;
    let vectors: Vec<_> = documents.iter().map(|d| vectorizer.vectorize(d)).collect();
    let labels: Vec<String> = samples.iter().map(|s| s.label.clone()).collect();
    let model = CentroidClassifier::fit(&vectors, &labels)?;

    let predictions = model.classify_batch(&vectors)?;
    let correct = predictions
        .iter()
        .zip(&labels)
        .filter(|(prediction, label)| &prediction.label == *label)
        .count();

    let report = TrainingReport {
        samples: samples.len(),
        vocabulary_size: vectorizer.dimension(),
        labels: model.labels().to_vec(),
        accuracy: correct as f32 / samples.len() as f32,
    };
    info!(
        "Trained {} labels on {} samples: {} terms, accuracy {:.3}",
        report.labels.len(),
        report.samples,
        report.vocabulary_size,
        report.accuracy
    );

    Ok((vectorizer, ModelArtifact::Centroid(model), report))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::token_filter::StopFilter;
    use crate::config::AnalysisConfig;
    use crate::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer};

    fn normalizer() -> Normalizer {
        let dictionary = Dictionary::from_words(["tani", "tanam", "padi", "jual", "beli", "dagang"]);
        let stemmer = IndonesianStemmer::new(
            Arc::new(dictionary),
            Arc::new(AffixRuleSet::default_indonesian()),
        );
        Normalizer::new(&AnalysisConfig::default(), Arc::new(stemmer), StopFilter::new()).unwrap()
    }

    fn sample(text: &str, label: &str) -> TrainingSample {
        TrainingSample {
            text: text.to_string(),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_train_separates_labels() {
        let samples = vec![
            sample("petani menanam padi", "pertanian"),
            sample("tanaman padi petani", "pertanian"),
            sample("menjual barang dagangan", "perdagangan"),
            sample("pembeli barang penjual", "perdagangan"),
        ];
        let options = FitOptions {
            min_df: 1,
            max_df: 1.0,
            ..FitOptions::default()
        };

        let (vectorizer, model, report) = train(&samples, &normalizer(), &options).unwrap();

        assert_eq!(report.samples, 4);
        assert_eq!(report.labels, vec!["perdagangan", "pertanian"]);
        assert_eq!(report.vocabulary_size, vectorizer.dimension());
        assert_eq!(report.accuracy, 1.0);
        assert!(vectorizer.term_index("padi").is_some());

        let classifier = model.into_classifier();
        assert_eq!(classifier.dimension(), vectorizer.dimension());
    }

    #[test]
    fn test_train_rejects_empty() {
        assert!(train(&[], &normalizer(), &FitOptions::default()).is_err());
    }

    #[test]
    fn test_load_training_data() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"text": "petani menanam padi", "label": "pertanian"}]"#,
        )
        .unwrap();

        let samples = load_training_data(file.path()).unwrap();
        assert_eq!(samples, vec![sample("petani menanam padi", "pertanian")]);

        std::fs::write(file.path(), "not json").unwrap();
        assert!(load_training_data(file.path()).is_err());
    }
}
