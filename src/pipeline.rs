//! The inference pipeline and its cache.
//!
//! [`Pipeline::run`] fingerprints the raw text, answers from the cache when
//! it can and otherwise normalizes, vectorizes and classifies. Results are
//! kept in memory and, optionally, in a [`ResultStore`].

pub mod cache;
pub mod document;
pub mod fingerprint;
pub mod orchestrator;
pub mod store;

pub use cache::{CacheStats, ResultCache};
pub use document::{ClassificationResult, Document};
pub use fingerprint::Fingerprint;
pub use orchestrator::{Pipeline, PipelineStats};
pub use store::{JsonlResultStore, MemoryResultStore, ResultStore};
