//! Status command for showing where and what is stored.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use dd_db::Database;

pub fn run<W: Write>(writer: &mut W, db: &Database, path: &Path) -> Result<()> {
    let meta = db
        .snapshot_meta()
        .with_context(|| format!("failed to read {}", path.display()))?;

    writeln!(writer, "DevDiary status")?;
    writeln!(writer, "Database: {}", path.display())?;

    let Some(meta) = meta else {
        writeln!(writer, "No tasks recorded.")?;
        return Ok(());
    };

    writeln!(writer, "Schema version: {}", meta.version)?;
    writeln!(writer, "Tasks: {}", meta.entries)?;
    writeln!(
        writer,
        "Last updated: {}",
        meta.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    Ok(())
}
