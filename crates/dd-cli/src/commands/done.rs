//! Done command for toggling a task's completion flag.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Clock, LogEntry, LogRepository, LogStore, LogUpdate};

use super::util::{entry_line, resolve_id};

#[derive(Debug, Args)]
pub struct DoneArgs {
    /// Task id or unique id prefix.
    pub id: String,

    /// Mark the task as pending again.
    #[arg(long)]
    pub undo: bool,
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &DoneArgs) -> Result<LogEntry>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let logs = repo.list_logs().context("failed to load tasks")?;
    let id = resolve_id(&logs, &args.id)?;

    let entry = repo
        .update_log(&id, LogUpdate::completed(!args.undo))
        .with_context(|| format!("failed to update task {id}"))?;

    let verb = if args.undo { "Reopened" } else { "Completed" };
    writeln!(writer, "{verb} {}", entry.id)?;
    writeln!(writer, "{}", entry_line(&entry))?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use dd_core::{FixedClock, MemoryStore, RepositoryError};

    const SEED: &str = r#"{"logs":[
        {"id":"0190a1b2-aaaa","task":"Fix login bug","category":"debugging","priority":"low",
         "timestamp":"2025-06-29T09:15:00Z","completed":false}
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

    #[test]
    fn done_marks_task_completed_by_prefix() {
        let repo = repo();
        let mut output = Vec::new();
        let entry = run(
            &mut output,
            &repo,
            &DoneArgs {
                id: "0190a1".to_string(),
                undo: false,
            },
        )
        .unwrap();

        assert!(entry.completed);
        assert!(repo.list_logs().unwrap()[0].completed);
        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Completed 0190a1b2-aaaa\n[x] "));
    }

    #[test]
    fn done_undo_reopens_task() {
        let repo = repo();
        let args = |undo| DoneArgs {
            id: "0190a1b2-aaaa".to_string(),
            undo,
        };
        run(&mut Vec::new(), &repo, &args(false)).unwrap();
        let entry = run(&mut Vec::new(), &repo, &args(true)).unwrap();
        assert!(!entry.completed);
    }

    #[test]
    fn done_unknown_id_is_not_found() {
        let repo = repo();
        let err = run(
            &mut Vec::new(),
            &repo,
            &DoneArgs {
                id: "missing".to_string(),
                undo: false,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::NotFound { .. })
        ));
    }
}
