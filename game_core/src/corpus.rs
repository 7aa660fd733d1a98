use crate::samples::{SampleParseError, TrainingSample};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corpus line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: SampleParseError,
    },
}

/// Where the corpus text lives between runs
pub trait CorpusStore {
    /// Full stored text, or `None` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>, CorpusError>;
    fn write(&mut self, contents: &str) -> Result<(), CorpusError>;
}

/// Newline-separated records in a single file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: io::Error) -> CorpusError {
        CorpusError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CorpusStore for FileStore {
    fn read(&self) -> Result<Option<String>, CorpusError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), CorpusError> {
        std::fs::write(&self.path, contents).map_err(|e| self.io_error(e))
    }
}

/// In-process store; clones share the same contents
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Rc<RefCell<Option<String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        let store = Self::default();
        *store.contents.borrow_mut() = Some(contents.into());
        store
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl CorpusStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, CorpusError> {
        Ok(self.contents())
    }

    fn write(&mut self, contents: &str) -> Result<(), CorpusError> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// Result of reloading a stored corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub duplicates: usize,
    pub skipped: usize, // Malformed records
}

/// Deduplicated, append-only training corpus
pub struct Corpus {
    samples: Vec<TrainingSample>,
    seen: HashSet<String>,
    store: Box<dyn CorpusStore>,
    persist_every: usize,
}

impl Corpus {
    pub fn new(store: Box<dyn CorpusStore>, persist_every: usize) -> Self {
        Self {
            samples: Vec::new(),
            seen: HashSet::new(),
            store,
            persist_every: persist_every.max(1),
        }
    }

    /// Corpus backed by a fresh `MemoryStore`
    pub fn in_memory(persist_every: usize) -> Self {
        Self::new(Box::new(MemoryStore::new()), persist_every)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    /// Insert unless an identical record exists. Returns true if inserted.
    ///
    /// Every `persist_every`-th unique sample writes the whole corpus out;
    /// a failed write is logged and the in-memory corpus kept.
    pub fn add(&mut self, sample: TrainingSample) -> bool {
        if !self.insert(sample) {
            return false;
        }
        if self.seen.len() % self.persist_every == 0 {
            match self.persist() {
                Ok(()) => log::info!("Persisted {} training samples", self.samples.len()),
                Err(e) => log::warn!("Could not persist training samples: {e}"),
            }
        }
        true
    }

    fn insert(&mut self, sample: TrainingSample) -> bool {
        if !self.seen.insert(sample.to_string()) {
            return false;
        }
        self.samples.push(sample);
        true
    }

    /// Write every sample as newline-joined canonical records
    pub fn persist(&mut self) -> Result<(), CorpusError> {
        let text = self
            .samples
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.store.write(&text)
    }

    /// Merge the stored corpus in without writing it back.
    ///
    /// A missing store is an empty one. Blank lines are ignored; malformed
    /// records are skipped with a warning.
    pub fn load(&mut self) -> Result<LoadReport, CorpusError> {
        let mut report = LoadReport::default();
        let Some(text) = self.store.read()? else {
            log::info!("No stored training samples, starting empty");
            return Ok(report);
        };

        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<TrainingSample>() {
                Ok(sample) => {
                    if self.insert(sample) {
                        report.loaded += 1;
                    } else {
                        report.duplicates += 1;
                    }
                }
                Err(source) => {
                    let err = CorpusError::Parse {
                        line: index + 1,
                        source,
                    };
                    log::warn!("Skipping stored sample: {err}");
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded {} training samples ({} duplicate, {} malformed)",
            report.loaded,
            report.duplicates,
            report.skipped
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::Features;

    fn sample(arrival_y: f32) -> TrainingSample {
        TrainingSample::new(
            Features {
                opponent_paddle_y: 300.0,
                ball_y: 290.0,
                ball_dx: -1.5,
                ball_dy: 0.5,
            },
            arrival_y,
        )
    }

    /// Store whose writes always fail, counting the attempts
    #[derive(Clone, Default)]
    struct FailingStore {
        attempts: Rc<RefCell<usize>>,
    }

    impl CorpusStore for FailingStore {
        fn read(&self) -> Result<Option<String>, CorpusError> {
            Ok(None)
        }

        fn write(&mut self, _contents: &str) -> Result<(), CorpusError> {
            *self.attempts.borrow_mut() += 1;
            Err(CorpusError::Io {
                path: PathBuf::from("read-only/pong.txt"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn test_failed_persist_keeps_samples() {
        let store = FailingStore::default();
        let mut corpus = Corpus::new(Box::new(store.clone()), 100);

        for i in 0..150 {
            assert!(corpus.add(sample(100.0 + i as f32)));
        }

        assert_eq!(corpus.len(), 150);
        assert_eq!(*store.attempts.borrow(), 1, "Write attempted at the 100th sample");
    }

    #[test]
    fn test_duplicate_sample_is_ignored() {
        let mut corpus = Corpus::in_memory(100);
        assert!(corpus.add(sample(150.0)));
        assert!(!corpus.add(sample(150.0)));
        assert_eq!(corpus.len(), 1, "Identical samples count once");
        assert!(corpus.add(sample(151.0)));
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_persists_on_every_hundredth_unique_sample() {
        let store = MemoryStore::new();
        let mut corpus = Corpus::new(Box::new(store.clone()), 100);

        for i in 0..99 {
            corpus.add(sample(100.0 + i as f32));
        }
        assert_eq!(store.write_count(), 0);

        corpus.add(sample(100.0)); // Duplicate does not count
        assert_eq!(store.write_count(), 0);

        corpus.add(sample(500.0));
        assert_eq!(store.write_count(), 1);
        let text = store.contents().unwrap();
        assert_eq!(text.lines().count(), 100);
        assert_eq!(text.lines().next(), Some("300,290,-1.5,0.5,100"));
        assert!(!text.ends_with('\n'));

        for i in 0..100 {
            corpus.add(sample(1000.0 + i as f32));
        }
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_load_missing_store_is_empty() {
        let mut corpus = Corpus::in_memory(100);
        assert_eq!(corpus.load().unwrap(), LoadReport::default());
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_load_does_not_write_back() {
        let text = (0..150)
            .map(|i| sample(i as f32).to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let store = MemoryStore::with_contents(text);
        let mut corpus = Corpus::new(Box::new(store.clone()), 100);

        let report = corpus.load().unwrap();

        assert_eq!(report.loaded, 150);
        assert_eq!(corpus.len(), 150);
        assert_eq!(store.write_count(), 0, "Loading must not re-persist");
    }

    #[test]
    fn test_load_skips_malformed_and_duplicate_lines() {
        let store = MemoryStore::with_contents(
            "300,290,-1.5,0.5,100\nnot,a,sample\n300,290,-1.5,0.5,100\n\n1,2,3,4,x\n1,2,3,4,5\n",
        );
        let mut corpus = Corpus::new(Box::new(store), 100);

        let report = corpus.load().unwrap();

        assert_eq!(
            report,
            LoadReport {
                loaded: 2,
                duplicates: 1,
                skipped: 2
            }
        );
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn test_load_merges_with_existing_samples() {
        let store = MemoryStore::with_contents("300,290,-1.5,0.5,100");
        let mut corpus = Corpus::new(Box::new(store), 100);
        corpus.add(sample(100.0));

        let report = corpus.load().unwrap();

        assert_eq!(report.duplicates, 1);
        assert_eq!(corpus.len(), 1);
    }
}
