//! List command for browsing recorded tasks.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Clock, LogQuery, LogRepository, LogStore, SortOrder, StatusFilter};

use super::util::{entry_line, suggestion_line};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Which tasks to show: all, pending, completed or a category name.
    #[arg(long, default_value = "all")]
    pub filter: StatusFilter,

    /// Only show tasks whose text, category or tags contain this term.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Order: newest, oldest, priority or category.
    #[arg(long, default_value = "newest")]
    pub sort: SortOrder,

    /// Also print each task's suggestions.
    #[arg(long)]
    pub suggestions: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &ListArgs) -> Result<()>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let logs = repo.list_logs().context("failed to load tasks")?;
    let query = LogQuery {
        filter: args.filter,
        search: args.search.clone(),
        sort: args.sort,
    };
    let shown = query.apply(&logs);

    if args.json {
        serde_json::to_writer_pretty(&mut *writer, &shown).context("failed to serialize tasks")?;
        writeln!(writer)?;
        return Ok(());
    }

    if logs.is_empty() {
        writeln!(writer, "No tasks recorded yet.")?;
        return Ok(());
    }

    for entry in &shown {
        writeln!(writer, "{}", entry_line(entry))?;
        if args.suggestions {
            for suggestion in &entry.suggestions {
                writeln!(writer, "      {}", suggestion_line(suggestion))?;
            }
        }
    }
    writeln!(writer, "{} of {} tasks", shown.len(), logs.len())?;
    Ok(())
}
