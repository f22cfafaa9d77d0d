//! The serialized classifier model.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::ml::centroid::CentroidClassifier;
use crate::ml::classifier::Classifier;
use crate::ml::linear::LinearClassifier;

/// A trained model as stored on disk, tagged by kind:
///
/// ```json
/// { "type": "centroid", "labels": ["pertanian"], "centroids": [[0.5, 0.5]] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearClassifier),
    Centroid(CentroidClassifier),
}

impl ModelArtifact {
    /// Load and validate a model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AkarError::artifact(format!("failed to read model {}: {e}", path.display()))
        })?;
        let model: ModelArtifact = serde_json::from_str(&content).map_err(|e| {
            AkarError::artifact(format!("malformed model {}: {e}", path.display()))
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Write the model as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::Centroid(model) => model.validate(),
        }
    }

    /// The model as a shareable classifier.
    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            ModelArtifact::Linear(model) => Arc::new(model),
            ModelArtifact::Centroid(model) => Arc::new(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json() {
        let json = r#"{"type": "centroid", "labels": ["a", "b"], "centroids": [[1.0], [0.0]]}"#;
        let model: ModelArtifact = serde_json::from_str(json).unwrap();
        assert!(matches!(model, ModelArtifact::Centroid(_)));

        let classifier = model.into_classifier();
        assert_eq!(classifier.name(), "centroid");
        assert_eq!(classifier.dimension(), 1);
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        fs::write(
            &path,
            r#"{"type": "linear", "labels": ["a"], "weights": [[1.0, 2.0]], "bias": []}"#,
        )
        .unwrap();
        assert!(matches!(ModelArtifact::load(&path), Err(AkarError::Artifact(_))));

        fs::write(&path, r#"{"type": "forest"}"#).unwrap();
        assert!(matches!(ModelArtifact::load(&path), Err(AkarError::Artifact(_))));

        assert!(ModelArtifact::load(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = ModelArtifact::Linear(
            LinearClassifier::new(vec!["a".into()], vec![vec![0.5]], vec![0.1]).unwrap(),
        );

        model.save(&path).unwrap();
        assert_eq!(ModelArtifact::load(&path).unwrap(), model);
    }
}
