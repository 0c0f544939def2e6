//! Edit command for changing fields of a recorded task.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;

use dd_core::{Category, Clock, LogEntry, LogRepository, LogStore, LogUpdate, Priority, parse_tags};

use super::util::{entry_line, resolve_id};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id or unique id prefix.
    pub id: String,

    /// New task text.
    #[arg(long)]
    pub task: Option<String>,

    /// New category.
    #[arg(long)]
    pub category: Option<Category>,

    /// New priority.
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// New time spent, in minutes.
    #[arg(short = 't', long = "time", conflicts_with = "clear_time")]
    pub time_spent: Option<u32>,

    /// Remove the recorded time spent.
    #[arg(long)]
    pub clear_time: bool,

    /// Replace the tags with this comma-separated list.
    #[arg(long)]
    pub tags: Option<String>,
}

impl EditArgs {
    fn to_update(&self) -> LogUpdate {
        let time_spent = if self.clear_time {
            Some(None)
        } else {
            self.time_spent.map(Some)
        };
        LogUpdate {
            task: self.task.clone(),
            category: self.category,
            priority: self.priority,
            time_spent,
            tags: self.tags.as_deref().map(parse_tags),
            completed: None,
        }
    }
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &EditArgs) -> Result<LogEntry>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let update = args.to_update();
    if update.is_empty() {
        bail!("nothing to change: pass at least one of --task, --category, --priority, --time, --clear-time or --tags");
    }

    let logs = repo.list_logs().context("failed to load tasks")?;
    let id = resolve_id(&logs, &args.id)?;
    let entry = repo
        .update_log(&id, update)
        .with_context(|| format!("failed to update task {id}"))?;

    writeln!(writer, "Updated {}", entry.id)?;
    writeln!(writer, "{}", entry_line(&entry))?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dd_core::{FixedClock, MemoryStore, RepositoryError};

    const SEED: &str = r#"{"logs":[
        {"id":"log-1","task":"Write API tests","category":"testing","priority":"high",
         "timeSpent":30,"tags":["api"],"timestamp":"2025-06-30T11:00:00Z","completed":false,
         "suggestions":[{"type":"tool","title":"Testing Strategy","content":"Use the pyramid.","priority":"high"}]}
    ]}"#;

    fn repo() -> LogRepository<MemoryStore, FixedClock> {
        LogRepository::with_clock(
            MemoryStore::with_raw(SEED),
            FixedClock {
                now: Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap(),
                hour: 14,
            },
        )
    }

    fn args() -> EditArgs {
        EditArgs {
            id: "log-1".to_string(),
            task: None,
            category: None,
            priority: None,
            time_spent: None,
            clear_time: false,
            tags: None,
        }
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let repo = repo();
        let entry = run(
            &mut Vec::new(),
            &repo,
            &EditArgs {
                priority: Some(Priority::Low),
                tags: Some("api, Contract ,".to_string()),
                ..args()
            },
        )
        .unwrap();

        assert_eq!(entry.priority, Priority::Low);
        assert_eq!(entry.tags, vec!["api".to_string(), "Contract".to_string()]);
        assert_eq!(entry.task, "Write API tests");
        assert_eq!(entry.time_spent, Some(30));
        assert_eq!(entry.suggestions.len(), 1);
        assert_eq!(repo.list_logs().unwrap()[0], entry);
    }

    #[test]
    fn edit_clears_time_spent() {
        let repo = repo();
        let entry = run(
            &mut Vec::new(),
            &repo,
            &EditArgs {
                clear_time: true,
                ..args()
            },
        )
        .unwrap();
        assert_eq!(entry.time_spent, None);
    }

    #[test]
    fn edit_without_changes_fails() {
        let err = run(&mut Vec::new(), &repo(), &args()).unwrap_err();
        assert!(err.to_string().contains("nothing to change"));
    }

    #[test]
    fn edit_rejects_blank_task_and_keeps_entry() {
        let repo = repo();
        let err = run(
            &mut Vec::new(),
            &repo,
            &EditArgs {
                task: Some("   ".to_string()),
                ..args()
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::Validation(_))
        ));
        assert_eq!(repo.list_logs().unwrap()[0].task, "Write API tests");
    }
}
