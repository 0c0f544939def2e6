//! The persistence port the repository writes through.
//!
//! A store holds exactly one [`Snapshot`] and replaces it wholesale on every
//! save. Implementations must make a save appear atomic: a concurrent reader
//! sees either the previous snapshot or the new one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{LogEntry, Snapshot};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying storage failed.
    #[error("storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// A snapshot exists but cannot be decoded.
    #[error("stored snapshot is unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),
    /// The collection could not be serialized.
    #[error("failed to serialize snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result of a successful load.
///
/// Keeps "never written" apart from a snapshot that decoded to an empty
/// collection; a failed load is a [`StoreError`], never an empty outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No snapshot has been saved yet.
    Missing,
    /// The stored snapshot.
    Found(Snapshot),
}

impl LoadOutcome {
    /// The stored collection, empty if nothing was saved.
    pub fn into_logs(self) -> Vec<LogEntry> {
        match self {
            Self::Missing => Vec::new(),
            Self::Found(snapshot) => snapshot.logs,
        }
    }
}

/// Durable snapshot persistence.
pub trait LogStore {
    /// Reads the current snapshot.
    fn load(&self) -> Result<LoadOutcome, StoreError>;

    /// Replaces the snapshot with `logs`, stamped with `now`.
    fn save(&self, logs: &[LogEntry], now: DateTime<Utc>) -> Result<(), StoreError>;
}

impl<T: LogStore + ?Sized> LogStore for &T {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        (**self).load()
    }

    fn save(&self, logs: &[LogEntry], now: DateTime<Utc>) -> Result<(), StoreError> {
        (**self).save(logs, now)
    }
}

/// In-memory store holding the serialized snapshot text.
///
/// Goes through the same JSON encoding as a durable store, so it can be seeded
/// with arbitrary (including corrupt) text. Useful for testing.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    raw: Option<String>,
    fail_saves: bool,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `raw` as its snapshot text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                raw: Some(raw.into()),
                fail_saves: false,
            }),
        }
    }

    /// Makes subsequent saves fail with [`StoreError::Backend`].
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// The stored snapshot text, if any.
    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogStore for MemoryStore {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        match self.lock().raw.as_deref() {
            None => Ok(LoadOutcome::Missing),
            Some(raw) => Snapshot::decode(raw)
                .map(LoadOutcome::Found)
                .map_err(StoreError::Corrupt),
        }
    }

    fn save(&self, logs: &[LogEntry], now: DateTime<Utc>) -> Result<(), StoreError> {
        let raw = Snapshot::encode(logs, now).map_err(StoreError::Encode)?;
        let mut state = self.lock();
        if state.fail_saves {
            return Err(StoreError::Backend("memory store is read-only".into()));
        }
        state.raw = Some(raw);
        Ok(())
    }
}
