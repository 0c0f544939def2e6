//! Productivity metrics derived from the log collection.
//!
//! Reports are recomputed from the full collection on every request and are
//! never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Category, LogEntry, Priority};

/// Length of the trailing activity window, in days.
pub const ACTIVITY_WINDOW_DAYS: i64 = 30;

/// High-priority completion above this percentage counts as a success.
const HIGH_PRIORITY_SUCCESS_PERCENT: f64 = 70.0;

/// Aggregate metrics over the log collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Entries in the trailing window divided by the window length.
    pub average_tasks_per_day: f64,
    /// Entries created in the trailing window.
    pub recent_activity: usize,
    pub category_distribution: BTreeMap<Category, usize>,
    pub priority_distribution: BTreeMap<Priority, usize>,
    /// Entries per UTC calendar day, oldest first.
    pub daily_activity: Vec<DailyCount>,
    pub insights: Vec<Insight>,
}

/// Number of entries created on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub tasks: usize,
}

/// Whether an insight reports something good or something to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
}

impl InsightKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

/// A derived observation about the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
    pub priority: Priority,
}

/// Computes the report for `logs` as of `now`.
///
/// The activity window covers `[now - 30 days, now]`.
#[expect(
    clippy::cast_precision_loss,
    reason = "task counts are far below f64 precision limits"
)]
pub fn compute(logs: &[LogEntry], now: DateTime<Utc>) -> AnalyticsReport {
    let window_start = now - Duration::days(ACTIVITY_WINDOW_DAYS);
    let recent_activity = logs
        .iter()
        .filter(|log| log.timestamp >= window_start && log.timestamp <= now)
        .count();

    let mut category_distribution = BTreeMap::new();
    let mut priority_distribution = BTreeMap::new();
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for log in logs {
        *category_distribution.entry(log.category).or_insert(0) += 1;
        *priority_distribution.entry(log.priority).or_insert(0) += 1;
        *per_day.entry(log.timestamp.date_naive()).or_insert(0) += 1;
    }

    AnalyticsReport {
        total_tasks: logs.len(),
        completed_tasks: logs.iter().filter(|log| log.completed).count(),
        average_tasks_per_day: recent_activity as f64 / ACTIVITY_WINDOW_DAYS as f64,
        recent_activity,
        category_distribution,
        priority_distribution,
        daily_activity: per_day
            .into_iter()
            .map(|(date, tasks)| DailyCount { date, tasks })
            .collect(),
        insights: high_priority_insight(logs).into_iter().collect(),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "task counts are far below f64 precision limits"
)]
fn high_priority_insight(logs: &[LogEntry]) -> Option<Insight> {
    let (total, completed) = logs
        .iter()
        .filter(|log| log.priority == Priority::High)
        .fold((0_usize, 0_usize), |(total, completed), log| {
            (total + 1, completed + usize::from(log.completed))
        });
    if total == 0 {
        return None;
    }

    let percent = completed as f64 / total as f64 * 100.0;
    let kind = if percent > HIGH_PRIORITY_SUCCESS_PERCENT {
        InsightKind::Success
    } else {
        InsightKind::Warning
    };
    Some(Insight {
        kind,
        title: "High Priority Completion".to_string(),
        content: format!("You've completed {percent:.1}% of high-priority tasks."),
        priority: Priority::High,
    })
}
