//! Task category enum as the single source of truth for category strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of categories a log entry can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Category {
    #[default]
    Development,
    Debugging,
    Testing,
    Planning,
    Learning,
    Meeting,
    Research,
    Documentation,
    Deployment,
    Refactoring,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Self; 10] = [
        Self::Development,
        Self::Debugging,
        Self::Testing,
        Self::Planning,
        Self::Learning,
        Self::Meeting,
        Self::Research,
        Self::Documentation,
        Self::Deployment,
        Self::Refactoring,
    ];

    /// Canonical lowercase name, as stored in snapshots.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Debugging => "debugging",
            Self::Testing => "testing",
            Self::Planning => "planning",
            Self::Learning => "learning",
            Self::Meeting => "meeting",
            Self::Research => "research",
            Self::Documentation => "documentation",
            Self::Deployment => "deployment",
            Self::Refactoring => "refactoring",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown category strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}
