//! Create, read, update and delete operations over the log collection.
//!
//! Every mutation loads the full collection, changes it in memory and saves it
//! back. There is no lock around that sequence: two overlapping mutations from
//! separate processes race and the later save wins.

use chrono::{DateTime, Local, Timelike, Utc};
use thiserror::Error;

use crate::analytics::{self, AnalyticsReport};
use crate::snapshot::{self, ExportArtifact, FormatError};
use crate::store::{LogStore, StoreError};
use crate::{LogDraft, LogEntry, LogId, LogUpdate, ValidationError, suggest};

/// Repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The input was rejected before touching storage.
    #[error("invalid log entry: {0}")]
    Validation(#[from] ValidationError),
    /// Loading or saving the snapshot failed. Nothing was changed.
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
    /// No entry has the given id.
    #[error("no log entry with id {id}")]
    NotFound { id: LogId },
    /// An import file was rejected.
    #[error("import rejected: {0}")]
    Format(#[from] FormatError),
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Local hour of day, used for time-of-day suggestions.
    fn local_hour(&self) -> u32 {
        self.now().with_timezone(&Local).hour()
    }
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant and hour.
///
/// Test double: it pins the local hour independently of the instant so
/// time-of-day suggestions do not depend on the machine's timezone. Exported
/// for the tests of the storage and CLI crates; the binary uses [`SystemClock`].
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub hour: u32,
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_hour(&self) -> u32 {
        self.hour
    }
}

/// Facade over a [`LogStore`] that keeps the collection most recent first.
#[derive(Debug)]
pub struct LogRepository<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: LogStore> LogRepository<S> {
    /// Creates a repository that reads the system clock.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: LogStore, C: Clock> LogRepository<S, C> {
    pub const fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validates `draft`, attaches suggestions and prepends the new entry.
    pub fn submit_log(&self, draft: LogDraft) -> Result<LogEntry, RepositoryError> {
        let draft = draft.normalized()?;
        let mut logs = self.load()?;

        let suggestions = suggest::generate(
            &draft.task,
            draft.category,
            draft.priority,
            &logs,
            self.clock.local_hour(),
        );

        let mut id = LogId::generate();
        while logs.iter().any(|entry| entry.id == id) {
            id = LogId::generate();
        }

        let entry = LogEntry {
            id,
            task: draft.task,
            category: draft.category,
            priority: draft.priority,
            time_spent: draft.time_spent,
            tags: draft.tags,
            suggestions,
            timestamp: self.clock.now(),
            completed: false,
        };

        logs.insert(0, entry.clone());
        self.persist(&logs)?;
        tracing::info!(id = %entry.id, suggestions = entry.suggestions.len(), "log submitted");
        Ok(entry)
    }

    /// The full collection, most recent first.
    pub fn list_logs(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        self.load()
    }

    /// Merges `update` into the entry with `id`.
    pub fn update_log(&self, id: &LogId, update: LogUpdate) -> Result<LogEntry, RepositoryError> {
        let mut logs = self.load()?;
        let entry = logs
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })?;

        update.apply_to(entry)?;
        let updated = entry.clone();

        self.persist(&logs)?;
        tracing::info!(%id, "log updated");
        Ok(updated)
    }

    /// Removes the entry with `id` and returns the remaining collection.
    pub fn delete_log(&self, id: &LogId) -> Result<Vec<LogEntry>, RepositoryError> {
        let mut logs = self.load()?;
        let before = logs.len();
        logs.retain(|entry| &entry.id != id);
        if logs.len() == before {
            return Err(RepositoryError::NotFound { id: id.clone() });
        }

        self.persist(&logs)?;
        tracing::info!(%id, remaining = logs.len(), "log deleted");
        Ok(logs)
    }

    /// Metrics over the current collection.
    pub fn analytics(&self) -> Result<AnalyticsReport, RepositoryError> {
        let logs = self.load()?;
        Ok(analytics::compute(&logs, self.clock.now()))
    }

    /// A copy of the collection stamped with the export time.
    pub fn export_snapshot(&self) -> Result<ExportArtifact, RepositoryError> {
        let logs = self.load()?;
        Ok(ExportArtifact::new(logs, self.clock.now()))
    }

    /// Replaces the stored collection with the one in `raw`.
    ///
    /// A rejected file leaves the stored collection untouched.
    pub fn import_snapshot(&self, raw: &str) -> Result<Vec<LogEntry>, RepositoryError> {
        let logs = snapshot::parse_import(raw)?;
        self.persist(&logs)?;
        tracing::info!(count = logs.len(), "snapshot imported");
        Ok(logs)
    }

    fn load(&self) -> Result<Vec<LogEntry>, RepositoryError> {
        match self.store.load() {
            Ok(outcome) => {
                let logs = outcome.into_logs();
                tracing::debug!(entries = logs.len(), "loaded logs");
                Ok(logs)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load log snapshot");
                Err(err.into())
            }
        }
    }

    fn persist(&self, logs: &[LogEntry]) -> Result<(), RepositoryError> {
        self.store.save(logs, self.clock.now()).map_err(|err| {
            tracing::warn!(error = %err, "failed to save log snapshot");
            err.into()
        })
    }
}
