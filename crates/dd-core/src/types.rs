//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::Category;

/// Maximum task length, counted in characters after trimming.
pub const MAX_TASK_CHARS: usize = 500;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The provided value was longer than allowed.
    #[error("{field} must be at most {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Invalid priority value.
    #[error("invalid priority: {value}")]
    InvalidPriority { value: String },
}

/// Unique identifier of a log entry.
///
/// New ids are UUIDv7 strings, so they sort in creation order. Snapshots
/// written by earlier versions used numeric millisecond ids; those are
/// accepted and kept as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLogId {
    Text(String),
    Number(u64),
}

impl LogId {
    /// Creates an ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty { field: "id" });
        }
        Ok(Self(id))
    }

    /// Generates a fresh, time-ordered ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for LogId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LogId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = match RawLogId::deserialize(deserializer)? {
            RawLogId::Text(text) => text,
            RawLogId::Number(number) => number.to_string(),
        };
        Self::new(id).map_err(serde::de::Error::custom)
    }
}

impl From<LogId> for String {
    fn from(id: LogId) -> Self {
        id.0
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Urgency of a task or a suggestion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// String representation for storage and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::InvalidPriority {
                value: s.to_string(),
            }),
        }
    }
}

/// What kind of advice a suggestion carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// A tool worth reaching for.
    Tool,
    /// A working practice.
    Tip,
    /// An observation about the user's own history.
    Insight,
}

impl SuggestionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tool => "tool",
            Self::Tip => "tip",
            Self::Insight => "insight",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One piece of generated advice, attached to an entry when it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
}

/// A recorded task.
///
/// Every field except `id` and `task` falls back to a default when missing,
/// so snapshots from older schema versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: LogId,
    pub task: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    /// Minutes spent, if recorded.
    #[serde(default)]
    pub time_spent: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Fixed at creation, never regenerated.
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
}

/// User input for a new log entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDraft {
    pub task: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub time_spent: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LogDraft {
    /// Creates a draft with no time recorded and no tags.
    pub fn new(task: impl Into<String>, category: Category, priority: Priority) -> Self {
        Self {
            task: task.into(),
            category,
            priority,
            time_spent: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_time_spent(mut self, minutes: Option<u32>) -> Self {
        self.time_spent = minutes;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Validates the draft and returns it with the task trimmed and a zero
    /// `time_spent` cleared.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        Ok(Self {
            task: validate_task(&self.task)?,
            time_spent: self.time_spent.filter(|minutes| *minutes > 0),
            tags: normalize_tags(self.tags),
            ..self
        })
    }
}

/// A shallow partial update of a log entry.
///
/// `None` leaves a field untouched. Suggestions, `id` and `timestamp` are not
/// updatable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogUpdate {
    pub task: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the recorded time.
    pub time_spent: Option<Option<u32>>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
}

impl LogUpdate {
    /// An update that only flips the completion flag.
    #[must_use]
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns `true` if the update would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.time_spent.is_none()
            && self.tags.is_none()
            && self.completed.is_none()
    }

    /// Merges the update into `entry`.
    ///
    /// Validation happens before any field is written, so a rejected update
    /// leaves the entry untouched.
    pub fn apply_to(self, entry: &mut LogEntry) -> Result<(), ValidationError> {
        let task = self.task.as_deref().map(validate_task).transpose()?;

        if let Some(task) = task {
            entry.task = task;
        }
        if let Some(category) = self.category {
            entry.category = category;
        }
        if let Some(priority) = self.priority {
            entry.priority = priority;
        }
        if let Some(time_spent) = self.time_spent {
            entry.time_spent = time_spent.filter(|minutes| *minutes > 0);
        }
        if let Some(tags) = self.tags {
            entry.tags = normalize_tags(tags);
        }
        if let Some(completed) = self.completed {
            entry.completed = completed;
        }
        Ok(())
    }
}

/// Trims a task description and checks it is 1 to [`MAX_TASK_CHARS`] characters.
pub fn validate_task(task: &str) -> Result<String, ValidationError> {
    let trimmed = task.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "task" });
    }
    let actual = trimmed.chars().count();
    if actual > MAX_TASK_CHARS {
        return Err(ValidationError::TooLong {
            field: "task",
            max: MAX_TASK_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

/// Splits a comma-separated tag string, trimming each tag and dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(',').map(str::to_string).collect())
}

/// Trims tags and drops blank ones. Order and duplicates are kept.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}
