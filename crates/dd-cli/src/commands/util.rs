//! Shared utilities for CLI commands.

use anyhow::bail;

use dd_core::{LogEntry, LogId, Suggestion};

/// Resolves a user-typed id or unique id prefix against the collection.
///
/// An input matching nothing is passed through unchanged so the repository
/// reports it as not found.
pub fn resolve_id(logs: &[LogEntry], input: &str) -> anyhow::Result<LogId> {
    let input = input.trim();
    if input.is_empty() {
        bail!("log id cannot be empty");
    }
    if let Some(entry) = logs.iter().find(|entry| entry.id.as_str() == input) {
        return Ok(entry.id.clone());
    }

    let matches: Vec<&LogEntry> = logs
        .iter()
        .filter(|entry| entry.id.as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [] => Ok(LogId::new(input)?),
        [entry] => Ok(entry.id.clone()),
        many => bail!(
            "id prefix {input:?} is ambiguous: matches {} entries",
            many.len()
        ),
    }
}

/// One-line summary of an entry.
pub fn entry_line(entry: &LogEntry) -> String {
    let mark = if entry.completed { "[x]" } else { "[ ]" };
    let time = entry
        .time_spent
        .map(|minutes| format!(" ({minutes}m)"))
        .unwrap_or_default();
    let tags = if entry.tags.is_empty() {
        String::new()
    } else {
        format!("  #{}", entry.tags.join(" #"))
    };
    format!(
        "{mark} {}  {}  {:<13} {:<6}  {}{time}{tags}",
        entry.id,
        entry.timestamp.format("%Y-%m-%d %H:%M UTC"),
        entry.category.as_str(),
        entry.priority.as_str(),
        entry.task,
    )
}

/// One-line rendering of a suggestion.
pub fn suggestion_line(suggestion: &Suggestion) -> String {
    format!(
        "[{}/{}] {}: {}",
        suggestion.kind, suggestion.priority, suggestion.title, suggestion.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dd_core::{Category, Priority, SuggestionKind};

    fn entry(id: &str) -> LogEntry {
        LogEntry {
            id: LogId::new(id).unwrap(),
            task: "Write API tests".to_string(),
            category: Category::Testing,
            priority: Priority::High,
            time_spent: Some(30),
            tags: vec!["api".to_string(), "ci".to_string()],
            suggestions: Vec::new(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 30, 11, 0, 0).unwrap(),
            completed: false,
        }
    }

    #[test]
    fn entry_line_shows_all_fields() {
        assert_eq!(
            entry_line(&entry("log-2")),
            "[ ] log-2  2025-06-30 11:00 UTC  testing       high    Write API tests (30m)  #api #ci"
        );
    }

    #[test]
    fn suggestion_line_shows_kind_and_priority() {
        let suggestion = Suggestion {
            kind: SuggestionKind::Tip,
            title: "Focus".to_string(),
            content: "One thing at a time.".to_string(),
            priority: Priority::Low,
        };
        assert_eq!(
            suggestion_line(&suggestion),
            "[tip/low] Focus: One thing at a time."
        );
    }

    #[test]
    fn resolve_exact_and_prefix() {
        let logs = vec![entry("abc-1"), entry("abd-2")];
        assert_eq!(resolve_id(&logs, "abc-1").unwrap().as_str(), "abc-1");
        assert_eq!(resolve_id(&logs, "abd").unwrap().as_str(), "abd-2");
    }

    #[test]
    fn resolve_ambiguous_prefix_fails() {
        let logs = vec![entry("abc-1"), entry("abd-2")];
        let err = resolve_id(&logs, "ab").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn resolve_unknown_passes_through() {
        let logs = vec![entry("abc-1")];
        assert_eq!(resolve_id(&logs, "zzz").unwrap().as_str(), "zzz");
    }
}
