//! Stats command implementation for the carpool CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use carpool_core::{AssignmentStats, WeekId, stats};
use chrono::{DateTime, Utc};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{StoreOpener, database_or_default, load_saved, write_json};
use crate::{ARG_DATABASE, ARG_WEEK, CliError, ENV_STATS_WEEK};

/// CLI arguments for the `stats` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "stats", about = "Summarise the saved assignment for a week")]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct StatsArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Week label, e.g. "Fall Week 1".
    #[arg(long = ARG_WEEK, value_name = "week")]
    #[serde(default)]
    pub(crate) week: Option<String>,
}

impl StatsArgs {
    fn into_config(self) -> Result<StatsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        StatsConfig::try_from(merged)
    }
}

/// Resolved `stats` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatsConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) week: WeekId,
}

impl TryFrom<StatsArgs> for StatsConfig {
    type Error = CliError;

    fn try_from(args: StatsArgs) -> Result<Self, Self::Error> {
        let week = args.week.ok_or(CliError::MissingArgument {
            field: ARG_WEEK,
            env: ENV_STATS_WEEK,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            week: WeekId::new(week),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    week: WeekId,
    created_by: String,
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    stats: AssignmentStats,
}

pub(crate) fn run_stats_with(
    args: StatsArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = opener.open(&config.database)?;
    let document = load_saved(&*store, &config.week)?;
    let report = StatsReport {
        stats: stats(&document.assignments),
        week: document.week,
        created_by: document.created_by,
        updated_at: document.updated_at,
    };
    write_json(writer, &report)
}
