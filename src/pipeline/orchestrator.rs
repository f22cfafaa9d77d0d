//! End-to-end entry point: raw text in, label and confidence out.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use crate::analysis::analyzer::{NormalizationTrace, Normalizer};
use crate::artifacts::Artifacts;
use crate::config::PipelineConfig;
use crate::error::{AkarError, Result};
use crate::pipeline::cache::{CacheStats, ResultCache};
use crate::pipeline::document::{ClassificationResult, Document};
use crate::pipeline::fingerprint::Fingerprint;
use crate::pipeline::store::{JsonlResultStore, ResultStore};
use crate::stemming::{StemResult, Stemmer};

/// A snapshot of the loaded artifacts and pipeline activity.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub dictionary_words: usize,
    pub suffix_rules: usize,
    pub prefix_rules: usize,
    pub stopwords: usize,
    pub vocabulary_size: usize,
    pub model: &'static str,
    pub labels: Vec<String>,
    pub cache: CacheStats,
    /// Times the classifier actually ran.
    pub computations: u64,
    /// Store reads or writes that failed and were skipped.
    pub store_failures: u64,
    pub store: Option<&'static str>,
    pub loaded_at: DateTime<Utc>,
}

/// Normalize, vectorize and classify, with per-fingerprint caching.
pub struct Pipeline {
    artifacts: Arc<Artifacts>,
    normalizer: Normalizer,
    cache: ResultCache,
    store: Option<Arc<dyn ResultStore>>,
    thread_pool: ThreadPool,
    max_input_bytes: usize,
    computations: AtomicU64,
    store_failures: AtomicU64,
}

impl Pipeline {
    /// Build a pipeline over loaded artifacts.
    ///
    /// When `config.cache_path` is set the JSONL store is opened for the
    /// artifacts' revision and bounded by `cache_capacity`; if that fails the
    /// pipeline runs without a store.
    pub fn new(artifacts: Arc<Artifacts>, config: &PipelineConfig) -> Result<Self> {
        config.validate()?;

        let stemmer: Arc<dyn Stemmer> = artifacts.stemmer().clone();
        let normalizer = Normalizer::new(
            &config.analysis,
            stemmer,
            artifacts.stop_filter().clone(),
        )?;

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|i| format!("akar-batch-{i}"))
            .build()
            .map_err(|e| AkarError::internal(format!("Failed to create thread pool: {e}")))?;

        let store: Option<Arc<dyn ResultStore>> = match &config.cache_path {
            Some(path) => match JsonlResultStore::open(
                path,
                artifacts.revision(),
                config.cache_capacity,
            ) {
                Ok(store) => Some(Arc::new(store)),
                Err(e) => {
                    warn!("Result store disabled: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(Pipeline {
            artifacts,
            normalizer,
            cache: ResultCache::new(config.cache_capacity),
            store,
            thread_pool,
            max_input_bytes: config.max_input_bytes,
            computations: AtomicU64::new(0),
            store_failures: AtomicU64::new(0),
        })
    }

    /// Replace the persistence collaborator.
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn artifacts(&self) -> &Arc<Artifacts> {
        &self.artifacts
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Classify one text.
    ///
    /// Identical texts are computed at most once: concurrent callers share
    /// the in-flight computation and later callers get the cached result.
    pub fn run(&self, text: &str) -> Result<ClassificationResult> {
        self.check_input(text)?;
        let fingerprint = Fingerprint::of(text);
        self.cache
            .get_or_compute(fingerprint, || self.compute(fingerprint, text))
    }

    /// Classify raw bytes, which must be UTF-8 text.
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<ClassificationResult> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| AkarError::invalid_input(format!("input is not UTF-8 text: {e}")))?;
        self.run(text)
    }

    /// Classify many texts on the batch thread pool.
    ///
    /// Each item is cached like [`Pipeline::run`] and fails independently.
    /// Output order matches input order.
    pub fn run_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> Vec<Result<ClassificationResult>> {
        debug!(
            "Fanning out {} texts over {} threads",
            texts.len(),
            self.thread_pool.current_num_threads()
        );
        self.thread_pool
            .install(|| texts.par_iter().map(|text| self.run(text.as_ref())).collect())
    }

    /// Normalize without classifying.
    pub fn normalize(&self, text: &str) -> Result<Document> {
        self.check_input(text)?;
        self.normalizer.normalize(text)
    }

    /// Normalize and keep every intermediate step.
    pub fn trace(&self, text: &str) -> Result<NormalizationTrace> {
        self.check_input(text)?;
        self.normalizer.normalize_with_trace(text)
    }

    /// Stem a single word with the loaded dictionary and rules.
    pub fn stem(&self, word: &str) -> StemResult {
        self.artifacts.stemmer().stem(word)
    }

    pub fn stats(&self) -> PipelineStats {
        let stemmer = self.artifacts.stemmer();
        PipelineStats {
            dictionary_words: stemmer.dictionary().len(),
            suffix_rules: stemmer.rules().suffix_rule_count(),
            prefix_rules: stemmer.rules().prefix_rule_count(),
            stopwords: self.artifacts.stop_filter().len(),
            vocabulary_size: self.artifacts.vectorizer().dimension(),
            model: self.artifacts.classifier().name(),
            labels: self.artifacts.classifier().labels().to_vec(),
            cache: self.cache.stats(),
            computations: self.computations.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            store: self.store.as_ref().map(|s| s.name()),
            loaded_at: self.artifacts.loaded_at(),
        }
    }

    fn check_input(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(AkarError::invalid_input("input text is empty"));
        }
        if text.len() > self.max_input_bytes {
            return Err(AkarError::invalid_input(format!(
                "input is {} bytes, limit is {}",
                text.len(),
                self.max_input_bytes
            )));
        }
        Ok(())
    }

    fn compute(&self, fingerprint: Fingerprint, text: &str) -> Result<ClassificationResult> {
        if let Some(store) = &self.store {
            match store.get(&fingerprint) {
                Ok(Some(result)) => {
                    debug!("Store hit for {fingerprint}");
                    return Ok(result);
                }
                Ok(None) => {}
                Err(e) => self.degrade(store.as_ref(), e),
            }
        }

        let document = self.normalizer.normalize(text)?;
        let vector = self.artifacts.vectorizer().vectorize(&document);
        if vector.is_zero() {
            debug!("No vocabulary terms in {fingerprint}");
        }
        self.computations.fetch_add(1, Ordering::Relaxed);
        let result = self.artifacts.classifier().classify(&vector)?;

        if let Some(store) = &self.store {
            if let Err(e) = store.put(fingerprint, &result) {
                self.degrade(store.as_ref(), e);
            }
        }
        Ok(result)
    }

    fn degrade(&self, store: &dyn ResultStore, error: AkarError) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
        warn!("{} store unavailable, continuing without it: {error}", store.name());
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("artifacts", &self.artifacts)
            .field("cache", &self.cache.stats())
            .field("store", &self.store.as_ref().map(|s| s.name()))
            .field("max_input_bytes", &self.max_input_bytes)
            .finish()
    }
}
