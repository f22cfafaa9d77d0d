//! Feature extraction and classification.
//!
//! - [`tfidf::TfIdfVectorizer`] - frozen vocabulary with TF-IDF weighting
//! - [`classifier::Classifier`] - scoring a feature vector against labels
//! - [`linear::LinearClassifier`] and [`centroid::CentroidClassifier`] - the
//!   two model kinds a [`model::ModelArtifact`] can hold
//! - [`training`] - offline fitting of vocabulary and centroid model

pub mod centroid;
pub mod classifier;
pub mod features;
pub mod linear;
pub mod model;
pub mod tfidf;
pub mod training;

pub use centroid::CentroidClassifier;
pub use classifier::Classifier;
pub use features::FeatureVector;
pub use linear::LinearClassifier;
pub use model::ModelArtifact;
pub use tfidf::{FitOptions, TfIdfVectorizer, TfScheme, VectorNorm};
pub use training::{TrainingReport, TrainingSample, load_training_data, train};
