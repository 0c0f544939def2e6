//! CLI subcommand implementations.

pub mod add;
pub mod delete;
pub mod done;
pub mod edit;
pub mod export;
pub mod import;
pub mod list;
pub mod stats;
pub mod status;
mod util;
