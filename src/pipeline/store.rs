//! Persistence collaborators for classification results.
//!
//! The pipeline only needs `get` and `put` keyed by fingerprint. Any failure
//! is reported as [`AkarError::CacheUnavailable`] and the pipeline keeps
//! serving requests without the store.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use ahash::AHashMap;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};

use crate::error::{AkarError, Result};
use crate::pipeline::cache::FifoResults;
use crate::pipeline::document::ClassificationResult;
use crate::pipeline::fingerprint::Fingerprint;

/// External storage for completed results.
pub trait ResultStore: Send + Sync {
    /// Look up a stored result.
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<ClassificationResult>>;

    /// Store a result under its fingerprint.
    fn put(&self, fingerprint: Fingerprint, result: &ClassificationResult) -> Result<()>;

    /// Get the name of this store for debugging and logging.
    fn name(&self) -> &'static str;
}

/// A store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryResultStore {
    results: RwLock<AHashMap<Fingerprint, ClassificationResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }
}

impl ResultStore for MemoryResultStore {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<ClassificationResult>> {
        Ok(self.results.read().get(fingerprint).cloned())
    }

    fn put(&self, fingerprint: Fingerprint, result: &ClassificationResult) -> Result<()> {
        self.results.write().insert(fingerprint, result.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// First token of the header line.
const HEADER: &str = "#akar-results";

/// An append-only JSONL file of results written under one artifact revision.
///
/// The first line is `#akar-results\t<revision>`. Each following line is
/// `<crc32 hex>\t<result json>`; the checksum covers the JSON bytes. Lines
/// that fail the checksum or do not parse are skipped when the file is
/// opened. Later lines win over earlier ones for the same fingerprint.
///
/// A file written under another revision is discarded on open. At most
/// `capacity` results are kept in memory, oldest evicted first. The file is
/// rewritten with only those results on open and whenever it holds more
/// than twice `capacity` records.
#[derive(Debug)]
pub struct JsonlResultStore {
    path: PathBuf,
    revision: Fingerprint,
    capacity: usize,
    results: RwLock<FifoResults>,
    log: Mutex<Appender>,
}

/// Append handle that never leaves a partial record behind.
#[derive(Debug)]
struct Appender {
    file: File,
    /// File length up to the end of the last complete record.
    len: u64,
    /// Records in the file, header excluded.
    records: usize,
}

impl Appender {
    fn append(&mut self, line: &str) -> io::Result<()> {
        match self
            .file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
        {
            Ok(()) => {
                self.len += line.len() as u64;
                self.records += 1;
                Ok(())
            }
            Err(e) => {
                if let Err(truncate) = self.rollback() {
                    warn!("Failed to drop partial record: {truncate}");
                }
                Err(e)
            }
        }
    }

    /// Cut the file back to its last complete record.
    fn rollback(&mut self) -> io::Result<()> {
        self.file.set_len(self.len)
    }
}

impl JsonlResultStore {
    /// Open or create the store at `path` for results of `revision`.
    pub fn open<P: AsRef<Path>>(path: P, revision: Fingerprint, capacity: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let capacity = capacity.max(1);

        let results = if path.exists() {
            read_records(&path, revision, capacity)?
        } else {
            FifoResults::default()
        };
        let log = write_compacted(&path, revision, &results)?;

        Ok(JsonlResultStore {
            path,
            revision,
            capacity,
            results: RwLock::new(results),
            log: Mutex::new(log),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn revision(&self) -> Fingerprint {
        self.revision
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultStore for JsonlResultStore {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<ClassificationResult>> {
        Ok(self.results.read().get(fingerprint).cloned())
    }

    fn put(&self, fingerprint: Fingerprint, result: &ClassificationResult) -> Result<()> {
        debug_assert_eq!(fingerprint, result.fingerprint);
        let line = encode_record(result)?;

        let mut log = self.log.lock();
        log.append(&line)
            .map_err(|e| unavailable(&self.path, "append to", e))?;

        let mut results = self.results.write();
        results.insert(result.clone(), self.capacity);
        if log.records > self.capacity.saturating_mul(2) {
            debug!(
                "Compacting {} from {} to {} records",
                self.path.display(),
                log.records,
                results.len()
            );
            *log = write_compacted(&self.path, self.revision, &results)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "jsonl"
    }
}

fn unavailable(path: &Path, action: &str, error: io::Error) -> AkarError {
    AkarError::cache_unavailable(format!("cannot {action} {}: {error}", path.display()))
}

fn header_line(revision: Fingerprint) -> String {
    format!("{HEADER}\t{revision}\n")
}

fn parse_header(line: &str) -> Option<Fingerprint> {
    let (tag, revision) = line.split_once('\t')?;
    if tag != HEADER {
        return None;
    }
    revision.trim().parse().ok()
}

/// Valid records of `path`, or none if it belongs to another revision.
fn read_records(path: &Path, revision: Fingerprint, capacity: usize) -> Result<FifoResults> {
    let file = File::open(path).map_err(|e| unavailable(path, "open", e))?;
    let mut lines = BufReader::new(file).lines().enumerate();
    let mut results = FifoResults::default();

    let header = match lines.next() {
        Some((_, line)) => line.map_err(|e| unavailable(path, "read", e))?,
        None => return Ok(results),
    };
    match parse_header(&header) {
        Some(written) if written == revision => {}
        Some(written) => {
            info!(
                "Discarding results in {}: written for revision {written}, loaded {revision}",
                path.display()
            );
            return Ok(results);
        }
        None => {
            warn!("Discarding results in {}: missing header", path.display());
            return Ok(results);
        }
    }

    let mut skipped = 0usize;
    for (number, line) in lines {
        let line = line.map_err(|e| unavailable(path, "read", e))?;
        if line.trim().is_empty() {
            continue;
        }
        match decode_record(&line) {
            Some(result) => results.insert(result, capacity),
            None => {
                skipped += 1;
                warn!("Skipping corrupt record at {}:{}", path.display(), number + 1);
            }
        }
    }
    debug!(
        "Loaded {} results from {} ({} skipped)",
        results.len(),
        path.display(),
        skipped
    );
    Ok(results)
}

/// Replace `path` with a header and `results`, and return an append handle.
fn write_compacted(path: &Path, revision: Fingerprint, results: &FifoResults) -> Result<Appender> {
    let mut content = header_line(revision);
    for result in results.iter() {
        content.push_str(&encode_record(result)?);
    }

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, &content).map_err(|e| unavailable(&staging, "write", e))?;
    let file = OpenOptions::new()
        .append(true)
        .open(&staging)
        .map_err(|e| unavailable(&staging, "open", e))?;
    fs::rename(&staging, path).map_err(|e| unavailable(path, "replace", e))?;

    Ok(Appender {
        file,
        len: content.len() as u64,
        records: results.len(),
    })
}

fn encode_record(result: &ClassificationResult) -> Result<String> {
    let payload = serde_json::to_string(result)
        .map_err(|e| AkarError::cache_unavailable(format!("cannot encode result: {e}")))?;
    Ok(format!("{:08x}\t{payload}\n", crc32fast::hash(payload.as_bytes())))
}

fn decode_record(line: &str) -> Option<ClassificationResult> {
    let (checksum, payload) = line.split_once('\t')?;
    let checksum = u32::from_str_radix(checksum, 16).ok()?;
    if crc32fast::hash(payload.as_bytes()) != checksum {
        return None;
    }
    serde_json::from_str(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(text: &str, label: &str) -> ClassificationResult {
        ClassificationResult {
            label: label.to_string(),
            confidence: 0.75,
            fingerprint: Fingerprint::of(text),
        }
    }

    fn revision() -> Fingerprint {
        Fingerprint::of("vocabulary v1")
    }

    fn record_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryResultStore::new();
        let stored = result("petani", "pertanian");

        assert!(store.get(&stored.fingerprint).unwrap().is_none());
        store.put(stored.fingerprint, &stored).unwrap();
        assert_eq!(store.get(&stored.fingerprint).unwrap(), Some(stored));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_record_checksum() {
        let stored = result("petani", "pertanian");
        let line = encode_record(&stored).unwrap();

        assert!(line.ends_with('\n'));
        assert_eq!(decode_record(line.trim_end()), Some(stored));

        let tampered = line.trim_end().replace("pertanian", "perikanan");
        assert_eq!(decode_record(&tampered), None);
        assert_eq!(decode_record("not a record"), None);
    }

    #[test]
    fn test_header() {
        let line = header_line(revision());
        assert!(line.starts_with("#akar-results\t"));
        assert_eq!(parse_header(line.trim_end()), Some(revision()));
        assert_eq!(parse_header("#other\tabc"), None);
        assert_eq!(parse_header(&encode_record(&result("a", "b")).unwrap()), None);
    }

    #[test]
    fn test_jsonl_store_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let first = result("petani", "pertanian");
        let second = result("pedagang", "perdagangan");

        {
            let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
            assert!(store.is_empty());
            store.put(first.fingerprint, &first).unwrap();
            store.put(second.fingerprint, &second).unwrap();
        }

        let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&first.fingerprint).unwrap(), Some(first));
        assert_eq!(store.name(), "jsonl");
    }

    #[test]
    fn test_jsonl_store_discards_other_revision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let stored = result("petani", "pertanian");

        {
            let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
            store.put(stored.fingerprint, &stored).unwrap();
        }

        let retrained = Fingerprint::of("vocabulary v2");
        let store = JsonlResultStore::open(&path, retrained, 100).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.get(&stored.fingerprint).unwrap(), None);
        drop(store);

        // The file now belongs to the new revision.
        let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_jsonl_store_without_header_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        fs::write(&path, encode_record(&result("petani", "pertanian")).unwrap()).unwrap();

        let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_jsonl_store_skips_corrupt_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let good = result("petani", "pertanian");
        let later = result("nelayan", "perikanan");

        let mut content = header_line(revision());
        content.push_str(&encode_record(&good).unwrap());
        content.push_str("deadbeef\t{\"label\": \"broken\"}\n");
        content.push_str("garbage\n");
        // torn tail from an interrupted write
        content.push_str("1234abcd\t{\"label\":");
        fs::write(&path, content).unwrap();

        {
            let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
            assert_eq!(store.len(), 1);
            assert_eq!(store.get(&good.fingerprint).unwrap(), Some(good.clone()));
            store.put(later.fingerprint, &later).unwrap();
        }

        assert_eq!(record_lines(&path).len(), 2);
        let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&later.fingerprint).unwrap(), Some(later));
    }

    #[test]
    fn test_jsonl_store_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let store = JsonlResultStore::open(&path, revision(), 10).unwrap();

        for i in 0..1000 {
            let stored = result(&format!("teks {i}"), "pertanian");
            store.put(stored.fingerprint, &stored).unwrap();
            assert!(store.len() <= 10);
            assert!(record_lines(&path).len() <= 20);
        }

        assert_eq!(store.len(), 10);
        assert_eq!(store.get(&Fingerprint::of("teks 0")).unwrap(), None);
        assert!(store.get(&Fingerprint::of("teks 999")).unwrap().is_some());
        drop(store);

        let store = JsonlResultStore::open(&path, revision(), 10).unwrap();
        assert_eq!(store.len(), 10);
        assert!(store.get(&Fingerprint::of("teks 990")).unwrap().is_some());
        assert_eq!(record_lines(&path).len(), 10);
    }

    #[test]
    fn test_partial_append_is_rolled_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.jsonl");
        let first = result("petani", "pertanian");
        let second = result("nelayan", "perikanan");

        let store = JsonlResultStore::open(&path, revision(), 100).unwrap();
        store.put(first.fingerprint, &first).unwrap();
        {
            let mut log = store.log.lock();
            log.file.write_all(b"1234abcd\t{\"label\":").unwrap();
            log.rollback().unwrap();
        }
        store.put(second.fingerprint, &second).unwrap();

        let lines = record_lines(&path);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|line| decode_record(line).is_some()));
    }

    #[test]
    fn test_jsonl_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.jsonl");

        assert!(matches!(
            JsonlResultStore::open(&path, revision(), 100),
            Err(AkarError::CacheUnavailable(_))
        ));
    }
}
