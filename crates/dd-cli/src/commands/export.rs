//! Export command for writing the collection to a JSON file.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Clock, LogRepository, LogStore};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output path (defaults to devdiary-export-<date>.json in the current directory).
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the export to stdout instead of a file.
    #[arg(long)]
    pub stdout: bool,
}

/// Returns the path written to, or `None` when the export went to `writer`.
pub fn run<W, S, C>(
    writer: &mut W,
    repo: &LogRepository<S, C>,
    args: &ExportArgs,
) -> Result<Option<PathBuf>>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let artifact = repo.export_snapshot().context("failed to load tasks")?;
    let json = artifact
        .to_json_pretty()
        .context("failed to serialize export")?;

    if args.stdout {
        writeln!(writer, "{json}")?;
        return Ok(None);
    }

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(artifact.file_name()));
    fs::write(&path, format!("{json}\n"))
        .with_context(|| format!("failed to write {}", path.display()))?;

    writeln!(
        writer,
        "Exported {} tasks to {}",
        artifact.logs.len(),
        path.display()
    )?;
    Ok(Some(path))
}
