use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::answers::AnswersRecord;

/// Fixed key the in-progress answers are stored under.
pub const DRAFT_KEY: &str = "privacy-policy-form-draft";

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft could not be encoded or decoded: {0}")]
    Json(#[from] serde_json::Error),
    #[error("draft could not be persisted: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Storage for a single draft record.
pub trait DraftStore {
    fn load(&self) -> Result<Option<AnswersRecord>, DraftError>;
    fn save(&mut self, answers: &AnswersRecord) -> Result<(), DraftError>;
    fn clear(&mut self) -> Result<(), DraftError>;
}

/// Stores the draft as `<dir>/privacy-policy-form-draft.json`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{DRAFT_KEY}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<AnswersRecord>, DraftError> {
        match fs::read_to_string(self.path()) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, answers: &AnswersRecord) -> Result<(), DraftError> {
        fs::create_dir_all(&self.dir)?;
        let mut file = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut file, answers)?;
        file.flush()?;
        file.persist(self.path())?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store, counting writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    pub record: Option<AnswersRecord>,
    pub writes: usize,
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Result<Option<AnswersRecord>, DraftError> {
        Ok(self.record.clone())
    }

    fn save(&mut self, answers: &AnswersRecord) -> Result<(), DraftError> {
        self.record = Some(answers.clone());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DraftError> {
        self.record = None;
        Ok(())
    }
}

/// Trailing debounce in front of a `DraftStore`.
///
/// Edits record a pending snapshot; the snapshot is written once no edit has
/// arrived for `interval`. Store failures are logged and dropped.
#[derive(Debug)]
pub struct Autosaver<S> {
    store: S,
    interval: Duration,
    pending: Option<AnswersRecord>,
    last_edit: Option<Instant>,
    last_saved: Option<SystemTime>,
}

impl<S: DraftStore> Autosaver<S> {
    pub fn new(store: S, interval: Duration) -> Self {
        Self {
            store,
            interval,
            pending: None,
            last_edit: None,
            last_saved: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Wall-clock time of the last successful write.
    pub fn last_saved(&self) -> Option<SystemTime> {
        self.last_saved
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Loads the stored draft; unreadable drafts are treated as absent.
    pub fn restore(&self) -> Option<AnswersRecord> {
        match self.store.load() {
            Ok(draft) => draft,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable draft");
                None
            }
        }
    }

    pub fn record(&mut self, answers: &AnswersRecord, now: Instant) {
        self.pending = Some(answers.clone());
        self.last_edit = Some(now);
    }

    /// Writes the pending snapshot if the quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .last_edit
            .is_some_and(|last| now.saturating_duration_since(last) >= self.interval);
        if due { self.flush() } else { false }
    }

    /// Writes the pending snapshot immediately.
    pub fn flush(&mut self) -> bool {
        let Some(snapshot) = self.pending.take() else {
            return false;
        };
        self.last_edit = None;
        match self.store.save(&snapshot) {
            Ok(()) => {
                self.last_saved = Some(SystemTime::now());
                debug!("draft saved");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to save draft");
                false
            }
        }
    }

    /// Drops any pending snapshot and removes the stored draft.
    pub fn clear(&mut self) {
        self.pending = None;
        self.last_edit = None;
        self.last_saved = None;
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear draft");
        }
    }
}
