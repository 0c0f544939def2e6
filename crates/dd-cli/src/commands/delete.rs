//! Delete command.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Clock, LogRepository, LogStore};

use super::util::resolve_id;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Task id or unique id prefix.
    pub id: String,
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &DeleteArgs) -> Result<()>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let logs = repo.list_logs().context("failed to load tasks")?;
    let id = resolve_id(&logs, &args.id)?;
    let remaining = repo
        .delete_log(&id)
        .with_context(|| format!("failed to delete task {id}"))?;

    writeln!(writer, "Deleted {id} ({} tasks remaining)", remaining.len())?;
    Ok(())
}
