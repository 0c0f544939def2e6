//! Filtering, searching and ordering of the log list.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Category, LogEntry};

/// Errors parsing query options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryParseError {
    #[error("unknown filter: {0} (expected all, pending, completed or a category)")]
    Filter(String),
    #[error("unknown sort order: {0} (expected newest, oldest, priority or category)")]
    Sort(String),
}

/// Which entries to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Category(Category),
}

impl StatusFilter {
    fn matches(self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !entry.completed,
            Self::Completed => entry.completed,
            Self::Category(category) => entry.category == category,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => other
                .parse()
                .map(Self::Category)
                .map_err(|_| QueryParseError::Filter(s.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Category(category) => write!(f, "{category}"),
        }
    }
}

/// Display order of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// High priority first.
    Priority,
    /// Alphabetical by category name.
    Category,
}

impl FromStr for SortOrder {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "priority" => Ok(Self::Priority),
            "category" => Ok(Self::Category),
            _ => Err(QueryParseError::Sort(s.to_string())),
        }
    }
}

/// A list view over the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub filter: StatusFilter,
    /// Case-insensitive substring matched against task, category and tags.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl LogQuery {
    /// Returns the matching entries in the requested order.
    ///
    /// Sorting is stable, so entries that compare equal keep collection order.
    pub fn apply<'a>(&self, logs: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        let needle = self
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());

        let mut matches: Vec<&LogEntry> = logs
            .iter()
            .filter(|entry| self.filter.matches(entry))
            .filter(|entry| needle.as_deref().is_none_or(|term| mentions(entry, term)))
            .collect();

        match self.sort {
            SortOrder::Newest => matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Oldest => matches.sort_by_key(|entry| entry.timestamp),
            SortOrder::Priority => matches.sort_by(|a, b| b.priority.cmp(&a.priority)),
            SortOrder::Category => matches.sort_by_key(|entry| entry.category.as_str()),
        }
        matches
    }
}

fn mentions(entry: &LogEntry, term: &str) -> bool {
    entry.task.to_lowercase().contains(term)
        || entry.category.as_str().contains(term)
        || entry
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(term))
}
