//! Single-flight result cache keyed by fingerprint.
//!
//! Completed results live in a bounded map with FIFO eviction. Work in
//! progress is tracked in a separate registry of in-flight slots: the first
//! caller for a fingerprint becomes the leader and computes, every other
//! caller for the same fingerprint blocks on the leader's slot and receives
//! its outcome. At most one computation per fingerprint is ever running.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use log::debug;
use parking_lot::{Condvar, Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::error::{AkarError, Result};
use crate::pipeline::document::ClassificationResult;
use crate::pipeline::fingerprint::Fingerprint;

/// Counters of cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Requests answered from completed results.
    pub hits: u64,
    /// Requests that led a computation.
    pub misses: u64,
    /// Requests that waited on another caller's computation.
    pub waits: u64,
    /// Completed results currently held.
    pub entries: usize,
    pub capacity: usize,
}

#[derive(Debug)]
enum SlotState {
    Pending,
    Done(ClassificationResult),
    Failed(String),
}

/// Where waiters block until the leader publishes an outcome.
#[derive(Debug)]
struct InflightSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl InflightSlot {
    fn new() -> Self {
        InflightSlot {
            state: Mutex::new(SlotState::Pending),
            ready: Condvar::new(),
        }
    }

    fn publish(&self, outcome: SlotState) {
        *self.state.lock() = outcome;
        self.ready.notify_all();
    }

    fn wait(&self) -> Result<ClassificationResult> {
        let mut state = self.state.lock();
        while matches!(*state, SlotState::Pending) {
            self.ready.wait(&mut state);
        }
        match &*state {
            SlotState::Done(result) => Ok(result.clone()),
            SlotState::Failed(message) => Err(AkarError::classification(message.clone())),
            SlotState::Pending => Err(AkarError::internal("in-flight slot still pending")),
        }
    }
}

/// Results in insertion order, evicting the oldest beyond a capacity.
#[derive(Debug, Default)]
pub(crate) struct FifoResults {
    results: AHashMap<Fingerprint, ClassificationResult>,
    order: VecDeque<Fingerprint>,
}

impl FifoResults {
    pub(crate) fn get(&self, fingerprint: &Fingerprint) -> Option<&ClassificationResult> {
        self.results.get(fingerprint)
    }

    /// Insert or replace a result. Replacing keeps the original position.
    pub(crate) fn insert(&mut self, result: ClassificationResult, capacity: usize) {
        let fingerprint = result.fingerprint;
        if self.results.insert(fingerprint, result).is_none() {
            self.order.push_back(fingerprint);
        }
        while self.order.len() > capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.results.remove(&oldest);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.results.len()
    }

    /// Oldest first.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.order.iter().filter_map(|fingerprint| self.results.get(fingerprint))
    }
}

enum Role {
    Leader(Arc<InflightSlot>),
    Waiter(Arc<InflightSlot>),
}

/// Publishes a failure if the leader returns early or panics.
struct Leader<'a> {
    cache: &'a ResultCache,
    fingerprint: Fingerprint,
    slot: Arc<InflightSlot>,
    finished: bool,
}

impl Leader<'_> {
    fn finish(&mut self, outcome: &Result<ClassificationResult>) {
        let state = match outcome {
            Ok(result) => {
                self.cache.completed.write().insert(result.clone(), self.cache.capacity);
                SlotState::Done(result.clone())
            }
            Err(e) => SlotState::Failed(e.to_string()),
        };
        self.release(state);
    }

    fn release(&mut self, state: SlotState) {
        self.finished = true;
        self.slot.publish(state);

        let mut inflight = self.cache.inflight.lock();
        if inflight
            .get(&self.fingerprint)
            .is_some_and(|slot| Arc::ptr_eq(slot, &self.slot))
        {
            inflight.remove(&self.fingerprint);
        }
    }
}

impl Drop for Leader<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.release(SlotState::Failed(format!(
                "computation for {} was abandoned",
                self.fingerprint
            )));
        }
    }
}

/// Bounded cache of classification results with single-flight computation.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    completed: RwLock<FifoResults>,
    inflight: Mutex<AHashMap<Fingerprint, Arc<InflightSlot>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    waits: AtomicU64,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` completed results.
    pub fn new(capacity: usize) -> Self {
        ResultCache {
            capacity: capacity.max(1),
            completed: RwLock::new(FifoResults::default()),
            inflight: Mutex::new(AHashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            waits: AtomicU64::new(0),
        }
    }

    /// Look up a completed result.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<ClassificationResult> {
        self.completed.read().get(fingerprint).cloned()
    }

    /// Return the cached result for `fingerprint`, or run `compute` if no
    /// other caller is already computing it.
    ///
    /// Concurrent callers with the same fingerprint share one invocation of
    /// `compute`. A failed computation is not cached; its waiters receive a
    /// [`AkarError::Classification`] carrying the leader's message.
    pub fn get_or_compute<F>(
        &self,
        fingerprint: Fingerprint,
        compute: F,
    ) -> Result<ClassificationResult>
    where
        F: FnOnce() -> Result<ClassificationResult>,
    {
        if let Some(result) = self.get(&fingerprint) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for {fingerprint}");
            return Ok(result);
        }

        let role = {
            let mut inflight = self.inflight.lock();
            // A leader stores its result before leaving the registry.
            if let Some(result) = self.get(&fingerprint) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for {fingerprint}");
                return Ok(result);
            }
            match inflight.get(&fingerprint) {
                Some(slot) => Role::Waiter(Arc::clone(slot)),
                None => {
                    let slot = Arc::new(InflightSlot::new());
                    inflight.insert(fingerprint, Arc::clone(&slot));
                    Role::Leader(slot)
                }
            }
        };

        match role {
            Role::Leader(slot) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let mut leader = Leader {
                    cache: self,
                    fingerprint,
                    slot,
                    finished: false,
                };
                let outcome = compute();
                leader.finish(&outcome);
                outcome
            }
            Role::Waiter(slot) => {
                self.waits.fetch_add(1, Ordering::Relaxed);
                debug!("Waiting on in-flight computation for {fingerprint}");
                slot.wait()
            }
        }
    }

    /// Number of computations currently in flight.
    pub fn inflight(&self) -> usize {
        self.inflight.lock().len()
    }

    pub fn len(&self) -> usize {
        self.completed.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}
