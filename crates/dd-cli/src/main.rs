use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dd_cli::commands::{add, delete, done, edit, export, import, list, stats, status};
use dd_cli::{Cli, Commands, Config};
use dd_core::LogRepository;
use dd_db::Database;

/// Open the configured database, ensuring its parent directory exists.
fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init so tests that already installed a subscriber don't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let repo = LogRepository::new(open_database(&config)?);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Add(args) => {
            add::run(&mut out, &repo, args, &config)?;
        }
        Commands::List(args) => list::run(&mut out, &repo, &args)?,
        Commands::Done(args) => {
            done::run(&mut out, &repo, &args)?;
        }
        Commands::Edit(args) => {
            edit::run(&mut out, &repo, &args)?;
        }
        Commands::Delete(args) => delete::run(&mut out, &repo, &args)?,
        Commands::Stats(args) => stats::run(&mut out, &repo, &args)?,
        Commands::Export(args) => {
            export::run(&mut out, &repo, &args)?;
        }
        Commands::Import(args) => {
            import::run(&mut out, &repo, &args)?;
        }
        Commands::Status => status::run(&mut out, repo.store(), &config.database_path)?,
    }

    out.flush()?;
    Ok(())
}
