//! Startup artifacts shared read-only by every pipeline call.
//!
//! All artifacts are loaded once, before any request is served. A missing or
//! malformed artifact is an [`AkarError::Artifact`] and the pipeline must not
//! start.

use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use log::info;
use parking_lot::Mutex;

use crate::analysis::token_filter::StopFilter;
use crate::config::PipelineConfig;
use crate::error::{AkarError, Result};
use crate::ml::classifier::Classifier;
use crate::ml::model::ModelArtifact;
use crate::ml::tfidf::TfIdfVectorizer;
use crate::pipeline::fingerprint::Fingerprint;
use crate::stemming::{AffixRuleSet, Dictionary, IndonesianStemmer};

static GLOBAL: OnceLock<Arc<Artifacts>> = OnceLock::new();
static GLOBAL_INIT: Mutex<()> = parking_lot::const_mutex(());

/// Dictionary, rules, stopwords, vocabulary and model.
pub struct Artifacts {
    stemmer: Arc<IndonesianStemmer>,
    stop_filter: StopFilter,
    vectorizer: TfIdfVectorizer,
    classifier: Arc<dyn Classifier>,
    revision: Fingerprint,
    loaded_at: DateTime<Utc>,
}

impl Artifacts {
    /// Load every artifact named by `config`.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        let stemmer = load_stemmer(config)?;

        let stop_filter = match &config.artifacts.stopwords {
            Some(path) => StopFilter::load(path)?,
            None => StopFilter::new(),
        };

        let vocabulary = config
            .artifacts
            .vocabulary
            .as_ref()
            .ok_or_else(|| AkarError::artifact("no vocabulary configured"))?;
        let vectorizer = TfIdfVectorizer::load(vocabulary)?;

        let model = config
            .artifacts
            .model
            .as_ref()
            .ok_or_else(|| AkarError::artifact("no model configured"))?;
        let model = ModelArtifact::load(model)?;
        let model_json = serde_json::to_vec(&model)?;

        let artifacts = Self::assemble(
            Arc::new(stemmer),
            stop_filter,
            vectorizer,
            model.into_classifier(),
            &model_json,
        )?;
        info!(
            "Loaded artifacts: {} root words, {} suffix rules, {} prefix rules, \
             {} stopwords, {} terms, {} labels ({} model), revision {}",
            artifacts.stemmer.dictionary().len(),
            artifacts.stemmer.rules().suffix_rule_count(),
            artifacts.stemmer.rules().prefix_rule_count(),
            artifacts.stop_filter.len(),
            artifacts.vectorizer.dimension(),
            artifacts.classifier.labels().len(),
            artifacts.classifier.name(),
            artifacts.revision
        );
        Ok(artifacts)
    }

    /// Assemble artifacts that are already in memory.
    ///
    /// Fails when the model was trained on a different vocabulary size.
    /// Without the serialized model, the revision covers the classifier's
    /// name, dimension and labels.
    pub fn from_parts(
        stemmer: Arc<IndonesianStemmer>,
        stop_filter: StopFilter,
        vectorizer: TfIdfVectorizer,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self> {
        let model = format!(
            "{}\t{}\t{}",
            classifier.name(),
            classifier.dimension(),
            classifier.labels().join("\t")
        );
        Self::assemble(stemmer, stop_filter, vectorizer, classifier, model.as_bytes())
    }

    fn assemble(
        stemmer: Arc<IndonesianStemmer>,
        stop_filter: StopFilter,
        vectorizer: TfIdfVectorizer,
        classifier: Arc<dyn Classifier>,
        model: &[u8],
    ) -> Result<Self> {
        if classifier.dimension() != vectorizer.dimension() {
            return Err(AkarError::artifact(format!(
                "model expects {} features but the vocabulary has {} terms",
                classifier.dimension(),
                vectorizer.dimension()
            )));
        }

        let roots = {
            let mut roots: Vec<&str> = stemmer.dictionary().iter().collect();
            roots.sort_unstable();
            roots.join("\n")
        };
        let vocabulary = serde_json::to_vec(&vectorizer)?;
        let revision =
            Fingerprint::of_parts([roots.as_bytes(), vocabulary.as_slice(), model]);

        Ok(Artifacts {
            stemmer,
            stop_filter,
            vectorizer,
            classifier,
            revision,
            loaded_at: Utc::now(),
        })
    }

    pub fn stemmer(&self) -> &Arc<IndonesianStemmer> {
        &self.stemmer
    }

    pub fn stop_filter(&self) -> &StopFilter {
        &self.stop_filter
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// Digest of the dictionary, vocabulary and model.
    ///
    /// Stored results are only valid for the revision that produced them.
    pub fn revision(&self) -> Fingerprint {
        self.revision
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("dictionary", &self.stemmer.dictionary().len())
            .field("stopwords", &self.stop_filter.len())
            .field("vocabulary", &self.vectorizer.dimension())
            .field("model", &self.classifier.name())
            .field("revision", &self.revision)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Build only the stemmer: dictionary plus rule table.
pub fn load_stemmer(config: &PipelineConfig) -> Result<IndonesianStemmer> {
    let dictionary = config
        .artifacts
        .dictionary
        .as_ref()
        .ok_or_else(|| AkarError::artifact("no dictionary configured"))?;
    let dictionary = Dictionary::load(dictionary)?;

    let rules = match &config.artifacts.rules {
        Some(path) => AffixRuleSet::load(path)?,
        None => AffixRuleSet::default_indonesian(),
    };

    Ok(IndonesianStemmer::with_options(
        Arc::new(dictionary),
        Arc::new(rules),
        config.analysis.stemmer_options(),
    ))
}

/// Load the process-wide artifacts, once.
///
/// Later calls return the instance loaded by the first successful call and
/// ignore their `config`. A failed load leaves the global unset.
pub fn init_global(config: &PipelineConfig) -> Result<Arc<Artifacts>> {
    if let Some(artifacts) = GLOBAL.get() {
        return Ok(Arc::clone(artifacts));
    }

    let _guard = GLOBAL_INIT.lock();
    if let Some(artifacts) = GLOBAL.get() {
        return Ok(Arc::clone(artifacts));
    }
    let artifacts = Arc::new(Artifacts::load(config)?);
    Ok(Arc::clone(GLOBAL.get_or_init(|| artifacts)))
}

/// The process-wide artifacts, if [`init_global`] has succeeded.
pub fn global() -> Option<Arc<Artifacts>> {
    GLOBAL.get().cloned()
}
