//! Import command for replacing the collection with an export file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use dd_core::{Clock, LogRepository, LogStore};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Export file to import, or `-` to read from stdin.
    pub path: PathBuf,
}

pub fn run<W, S, C>(writer: &mut W, repo: &LogRepository<S, C>, args: &ImportArgs) -> Result<usize>
where
    W: Write,
    S: LogStore,
    C: Clock,
{
    let raw = read_input(&args.path)?;
    let logs = repo
        .import_snapshot(&raw)
        .with_context(|| format!("failed to import {}", args.path.display()))?;

    writeln!(writer, "Imported {} tasks", logs.len())?;
    Ok(logs.len())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
