//! Command-line interface for the carpool engine.
//!
//! Each subcommand resolves its options from flags, configuration files and
//! `CARPOOL_*` environment variables before touching the SQLite store.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod assign;
mod error;
mod export;
mod import;
pub mod logging;
mod relocate;
mod stats;
mod store;

use assign::{AssignArgs, run_assign_with};
use export::{ExportArgs, run_export_with};
use import::{ImportArgs, run_import_with};
use relocate::{MoveArgs, run_move_with};
use stats::{StatsArgs, run_stats_with};
use store::{SqliteStoreOpener, StoreOpener};

pub use error::CliError;

const ARG_DATABASE: &str = "database";
const ARG_SIGNUPS: &str = "signups";
const ARG_WEEK: &str = "week";
const ARG_LOCALITY: &str = "locality";
const ARG_SAVE: &str = "save";
const ARG_CREATED_BY: &str = "created-by";
const ARG_RIDER: &str = "rider";
const ARG_TO: &str = "to";
const ARG_KIND: &str = "kind";
const ARG_OUTPUT: &str = "output";

const ENV_IMPORT_SIGNUPS: &str = "CARPOOL_CMDS_IMPORT_SIGNUPS";
const ENV_ASSIGN_WEEK: &str = "CARPOOL_CMDS_ASSIGN_WEEK";
const ENV_STATS_WEEK: &str = "CARPOOL_CMDS_STATS_WEEK";
const ENV_MOVE_WEEK: &str = "CARPOOL_CMDS_MOVE_WEEK";
const ENV_MOVE_RIDER: &str = "CARPOOL_CMDS_MOVE_RIDER";
const ENV_MOVE_TO: &str = "CARPOOL_CMDS_MOVE_TO";
const ENV_EXPORT_WEEK: &str = "CARPOOL_CMDS_EXPORT_WEEK";
const ENV_EXPORT_KIND: &str = "CARPOOL_CMDS_EXPORT_KIND";

/// Store location used when `--database` is not configured.
const DEFAULT_DATABASE: &str = "carpool.db";
/// Author recorded on saved assignments when none is configured.
const DEFAULT_AUTHOR: &str = "carpool";

/// Run the carpool CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli, &SqliteStoreOpener, &mut stdout)
}

fn run_with(cli: Cli, opener: &dyn StoreOpener, writer: &mut dyn Write) -> Result<(), CliError> {
    match cli.command {
        Command::Import(args) => run_import_with(args, opener, writer),
        Command::Assign(args) => run_assign_with(args, opener, writer),
        Command::Stats(args) => run_stats_with(args, opener, writer),
        Command::Move(args) => run_move_with(args, opener, writer),
        Command::Export(args) => run_export_with(args, opener, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "carpool",
    about = "Weekly carpool assignment for event signups",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load signup records from a JSON file into the store.
    Import(ImportArgs),
    /// Compute the assignment for a week.
    Assign(AssignArgs),
    /// Summarise the saved assignment for a week.
    Stats(StatsArgs),
    /// Move one rider within the saved assignment for a week.
    Move(MoveArgs),
    /// Write signups or the saved assignment as CSV.
    Export(ExportArgs),
}

#[cfg(test)]
mod tests;
