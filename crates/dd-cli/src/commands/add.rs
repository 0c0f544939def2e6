//! Add command for recording a new task.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Category, Clock, LogDraft, LogEntry, LogRepository, LogStore, Priority, parse_tags};

use super::util::{entry_line, suggestion_line};
use crate::Config;

#[derive(Debug, Args)]
pub struct AddArgs {
    /// What you worked on (1-500 characters).
    pub task: String,

    /// Task category (defaults to the configured category).
    #[arg(long)]
    pub category: Option<Category>,

    /// Task priority: low, medium or high.
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Minutes spent on the task.
    #[arg(short = 't', long = "time")]
    pub time_spent: Option<u32>,

    /// Comma-separated tags.
    #[arg(long)]
    pub tags: Option<String>,

    /// Print the created entry as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W, S, C>(
    writer: &mut W,
    repo: &LogRepository<S, C>,
    args: AddArgs,
    config: &Config,
) -> Result<LogEntry>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let draft = LogDraft::new(
        args.task,
        args.category.unwrap_or(config.default_category),
        args.priority.unwrap_or(config.default_priority),
    )
    .with_time_spent(args.time_spent)
    .with_tags(args.tags.as_deref().map(parse_tags).unwrap_or_default());

    let entry = repo.submit_log(draft).context("failed to record task")?;

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &entry).context("failed to serialize entry")?;
        writeln!(writer)?;
        return Ok(entry);
    }

    writeln!(writer, "Logged {}", entry.id)?;
    writeln!(writer, "{}", entry_line(&entry))?;
    writeln!(writer, "Suggestions:")?;
    for suggestion in &entry.suggestions {
        writeln!(writer, "  - {}", suggestion_line(suggestion))?;
    }
    Ok(entry)
}
