//! Import command implementation for the carpool CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use carpool_core::Signup;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{StoreOpener, database_or_default, read_json};
use crate::{ARG_DATABASE, ARG_SIGNUPS, CliError, ENV_IMPORT_SIGNUPS};

/// CLI arguments for the `import` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "import",
    long_about = "Load signup records from a JSON array into the store. \
                 Records are keyed by id, so importing the same file twice \
                 replaces rather than duplicates.",
    about = "Load signups from JSON"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct ImportArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Path to a JSON array of signup records.
    #[arg(long = ARG_SIGNUPS, value_name = "path")]
    #[serde(default)]
    pub(crate) signups: Option<Utf8PathBuf>,
}

impl ImportArgs {
    fn into_config(self) -> Result<ImportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ImportConfig::try_from(merged)
    }
}

/// Resolved `import` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) signups: Utf8PathBuf,
}

impl TryFrom<ImportArgs> for ImportConfig {
    type Error = CliError;

    fn try_from(args: ImportArgs) -> Result<Self, Self::Error> {
        let signups = args.signups.ok_or(CliError::MissingArgument {
            field: ARG_SIGNUPS,
            env: ENV_IMPORT_SIGNUPS,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            signups,
        })
    }
}

pub(crate) fn run_import_with(
    args: ImportArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let signups: Vec<Signup> = read_json(&config.signups, ARG_SIGNUPS)?;
    let store = opener.open(&config.database)?;
    let count = store.import_signups(&signups)?;
    log::info!("imported {count} signups from {}", config.signups);
    writeln!(writer, "imported {count} signups into {}", config.database)
        .map_err(CliError::WriteOutput)
}
