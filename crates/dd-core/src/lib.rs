//! Core domain logic for the DevDiary task log.
//!
//! This crate contains the fundamental types and logic for:
//! - Suggestions: rule-based advice attached to each new entry
//! - Analytics: rolling productivity metrics over the collection
//! - Snapshots: the persisted and exported JSON shapes
//! - Repository: create, read, update and delete through a [`LogStore`]

pub mod analytics;
mod category;
pub mod query;
pub mod repository;
pub mod snapshot;
pub mod store;
pub mod suggest;
mod types;

pub use analytics::{AnalyticsReport, DailyCount, Insight, InsightKind};
pub use category::{Category, UnknownCategory};
pub use query::{LogQuery, QueryParseError, SortOrder, StatusFilter};
pub use repository::{Clock, FixedClock, LogRepository, RepositoryError, SystemClock};
pub use snapshot::{
    ExportArtifact, FormatError, SCHEMA_VERSION, STORAGE_KEY, Snapshot, parse_import,
};
pub use store::{LoadOutcome, LogStore, MemoryStore, StoreError};
pub use suggest::{MAX_SUGGESTIONS, generate as generate_suggestions};
pub use types::{
    LogDraft, LogEntry, LogId, LogUpdate, MAX_TASK_CHARS, Priority, Suggestion, SuggestionKind,
    ValidationError, parse_tags, validate_task,
};
