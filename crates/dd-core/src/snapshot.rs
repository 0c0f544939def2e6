//! JSON shapes for the persisted snapshot and the export artifact.
//!
//! # Compatibility
//!
//! The `version` field is a schema tag, currently [`SCHEMA_VERSION`]. Loaders
//! never reject a snapshot on its version: missing fields take defaults and
//! unknown fields are ignored. Within an entry, a category or priority outside
//! the current set falls back to its default and suggestions of an unknown
//! type are dropped. A stored entry that still cannot be read (no `id` or
//! `task`) is skipped with a warning rather than failing the whole load.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Category, LogEntry, LogId, Priority, Suggestion};

/// Schema tag written into snapshots and exports.
pub const SCHEMA_VERSION: &str = "2.0";

/// The fixed key the snapshot is stored under.
pub const STORAGE_KEY: &str = "devdiary_logs";

/// The whole log collection as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub version: String,
}

/// Borrowed form used when writing, so saving never clones the collection.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    logs: &'a [LogEntry],
    last_updated: DateTime<Utc>,
    version: &'static str,
}

impl Snapshot {
    /// Serializes `logs` as a snapshot stamped with `now`.
    pub fn encode(logs: &[LogEntry], now: DateTime<Utc>) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SnapshotRef {
            logs,
            last_updated: now,
            version: SCHEMA_VERSION,
        })
    }

    /// Parses a stored snapshot.
    ///
    /// Only text that is not a JSON object fails; see the module docs for how
    /// individual entries are recovered.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let stored: StoredSnapshot = serde_json::from_str(raw)?;
        let logs = stored
            .logs
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match decode_entry(item) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(index, error = %err, "skipping unreadable log entry");
                    None
                }
            })
            .collect();

        Ok(Self {
            logs,
            last_updated: stored.last_updated.unwrap_or_default(),
            version: stored.version.unwrap_or_default(),
        })
    }
}

/// Snapshot as found in storage, before entries are recovered.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    #[serde(default)]
    logs: Option<Vec<Value>>,
    #[serde(default)]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    version: Option<String>,
}

fn decode_entry(item: Value) -> Result<LogEntry, serde_json::Error> {
    serde_json::from_value(recover_entry(item))
}

/// Rewrites an entry so values from other schema versions take defaults.
///
/// `id` and `task` are left alone: an entry without them is unreadable.
fn recover_entry(mut item: Value) -> Value {
    if let Some(fields) = item.as_object_mut() {
        fields.retain(|_, value| !value.is_null());
        drop_unreadable::<Category>(fields, "category");
        drop_unreadable::<Priority>(fields, "priority");
        drop_unreadable::<u32>(fields, "timeSpent");
        drop_unreadable::<Vec<String>>(fields, "tags");
        drop_unreadable::<DateTime<Utc>>(fields, "timestamp");
        drop_unreadable::<bool>(fields, "completed");

        if fields.get("suggestions").is_some_and(|value| !value.is_array()) {
            fields.remove("suggestions");
        }
        if let Some(Value::Array(suggestions)) = fields.get_mut("suggestions") {
            for suggestion in suggestions.iter_mut() {
                if let Some(suggestion) = suggestion.as_object_mut() {
                    drop_unreadable::<Priority>(suggestion, "priority");
                }
            }
            suggestions.retain(readable::<Suggestion>);
        }
    }
    item
}

fn drop_unreadable<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) {
    if fields.get(key).is_some_and(|value| !readable::<T>(value)) {
        fields.remove(key);
    }
}

fn readable<T: DeserializeOwned>(value: &Value) -> bool {
    T::deserialize(value).is_ok()
}

/// A downloadable copy of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    pub logs: Vec<LogEntry>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl ExportArtifact {
    pub fn new(logs: Vec<LogEntry>, export_date: DateTime<Utc>) -> Self {
        Self {
            logs,
            export_date,
            version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Suggested file name, e.g. `devdiary-export-2025-06-30.json`.
    pub fn file_name(&self) -> String {
        format!("devdiary-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }

    /// Pretty-printed JSON body.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Reasons an import is rejected.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input is not JSON.
    #[error("failed to parse file: {0}")]
    Parse(#[source] serde_json::Error),
    /// The input has no `logs` array.
    #[error("invalid file format: expected a `logs` array")]
    MissingLogs,
    /// One element of `logs` is not a valid entry.
    #[error("invalid log entry at index {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    /// Two entries share an id.
    #[error("duplicate log id: {id}")]
    DuplicateId { id: LogId },
}

/// Parses an import file into a log collection.
///
/// Accepts anything with a `logs` array, including older exports and raw
/// snapshots; other top-level fields are ignored.
pub fn parse_import(raw: &str) -> Result<Vec<LogEntry>, FormatError> {
    let value: Value = serde_json::from_str(raw).map_err(FormatError::Parse)?;
    let Some(Value::Array(items)) = value.get("logs") else {
        return Err(FormatError::MissingLogs);
    };

    let mut seen = HashSet::new();
    let mut logs = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let entry = decode_entry(item.clone())
            .map_err(|source| FormatError::InvalidEntry { index, source })?;
        if !seen.insert(entry.id.clone()) {
            return Err(FormatError::DuplicateId { id: entry.id });
        }
        logs.push(entry);
    }
    Ok(logs)
}
