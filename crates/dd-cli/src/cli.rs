//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{
    add::AddArgs, delete::DeleteArgs, done::DoneArgs, edit::EditArgs, export::ExportArgs,
    import::ImportArgs, list::ListArgs, stats::StatsArgs,
};

/// Developer task diary.
///
/// Records short task-log entries and annotates each one with suggestions
/// drawn from its text, category, priority and your recent history.
#[derive(Debug, Parser)]
#[command(name = "dd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a new task and show its suggestions.
    Add(AddArgs),

    /// List recorded tasks.
    List(ListArgs),

    /// Mark a task as completed.
    Done(DoneArgs),

    /// Change fields of a recorded task.
    Edit(EditArgs),

    /// Delete a task.
    Delete(DeleteArgs),

    /// Show productivity metrics.
    Stats(StatsArgs),

    /// Write all tasks to a JSON export file.
    Export(ExportArgs),

    /// Replace all tasks with the contents of an export file.
    Import(ImportArgs),

    /// Show storage status.
    Status,
}
