//! Storage layer for the DevDiary task log.
//!
//! Persists the log snapshot using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization. Separate processes may open the same file; each save is a
//! single statement, so readers never see a half-written snapshot.
//!
//! # Schema
//!
//! One row per storage key in `snapshots`. The log collection lives under
//! [`STORAGE_KEY`]; `body` holds the snapshot JSON exactly as encoded by
//! [`Snapshot::encode`], while `version`, `updated_at` and `entries` are copied
//! out of it for cheap status queries.
//!
//! Timestamps are stored as TEXT in RFC 3339 format (e.g. `2025-01-15T10:30:00Z`).

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use dd_core::{LoadOutcome, LogEntry, LogStore, SCHEMA_VERSION, STORAGE_KEY, Snapshot, StoreError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failed to parse a stored timestamp.
    #[error("invalid snapshot timestamp: {timestamp}")]
    TimestampParse {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

/// Summary of the stored snapshot, read without decoding the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    pub entries: usize,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- snapshots: one whole-collection JSON document per key
            -- updated_at: RFC 3339 (e.g., '2025-01-15T10:30:00Z')
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                version TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                entries INTEGER NOT NULL DEFAULT 0
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the raw snapshot JSON, if one has been written.
    pub fn snapshot_body(&self) -> Result<Option<String>, DbError> {
        let body = self
            .conn
            .query_row(
                "SELECT body FROM snapshots WHERE key = ?",
                [STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    /// Returns version, timestamp and entry count of the stored snapshot.
    pub fn snapshot_meta(&self) -> Result<Option<SnapshotMeta>, DbError> {
        let row: Option<(String, String, i64)> = self
            .conn
            .query_row(
                "SELECT version, updated_at, entries FROM snapshots WHERE key = ?",
                [STORAGE_KEY],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((version, updated_at, entries)) = row else {
            return Ok(None);
        };
        Ok(Some(SnapshotMeta {
            version,
            last_updated: parse_timestamp(&updated_at)?,
            entries: usize::try_from(entries).unwrap_or(0),
        }))
    }

    /// Replaces the stored snapshot text in one statement.
    fn write_snapshot(
        &self,
        body: &str,
        updated_at: DateTime<Utc>,
        entries: usize,
    ) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO snapshots (key, body, version, updated_at, entries)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                body = excluded.body,
                version = excluded.version,
                updated_at = excluded.updated_at,
                entries = excluded.entries
            ",
            params![
                STORAGE_KEY,
                body,
                SCHEMA_VERSION,
                format_timestamp(updated_at),
                i64::try_from(entries).unwrap_or(i64::MAX),
            ],
        )?;
        Ok(())
    }

    /// Stores arbitrary snapshot text. Lets tests simulate damaged data.
    #[cfg(test)]
    fn write_raw(&self, body: &str) -> Result<(), DbError> {
        self.write_snapshot(body, Utc::now(), 0)
    }
}

impl LogStore for Database {
    fn load(&self) -> Result<LoadOutcome, StoreError> {
        let Some(body) = self.snapshot_body()? else {
            return Ok(LoadOutcome::Missing);
        };
        let snapshot = Snapshot::decode(&body).map_err(StoreError::Corrupt)?;
        tracing::debug!(
            entries = snapshot.logs.len(),
            version = %snapshot.version,
            "loaded snapshot"
        );
        Ok(LoadOutcome::Found(snapshot))
    }

    fn save(&self, logs: &[LogEntry], now: DateTime<Utc>) -> Result<(), StoreError> {
        let body = Snapshot::encode(logs, now).map_err(StoreError::Encode)?;
        self.write_snapshot(&body, now, logs.len())?;
        tracing::debug!(entries = logs.len(), bytes = body.len(), "saved snapshot");
        Ok(())
    }
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
