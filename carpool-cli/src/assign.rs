//! Assign command implementation for the carpool CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use carpool_core::{
    Assigner, AssignmentResult, AssignmentStats, GreedyAssigner, LocalityTable, WeekId,
    save_result, stats,
};
use chrono::Utc;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{StoreOpener, database_or_default, read_json, write_json};
use crate::{
    ARG_CREATED_BY, ARG_DATABASE, ARG_LOCALITY, ARG_SAVE, ARG_WEEK, CliError, DEFAULT_AUTHOR,
    ENV_ASSIGN_WEEK,
};

/// CLI arguments for the `assign` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "assign",
    long_about = "Match the week's riders to its drivers and print the result \
                 with summary statistics as JSON. Pass --save to persist the \
                 result, replacing any manual edits already saved for the week.",
    about = "Compute the assignment for a week"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct AssignArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Week label, e.g. "Fall Week 1".
    #[arg(long = ARG_WEEK, value_name = "week")]
    #[serde(default)]
    pub(crate) week: Option<String>,
    /// JSON file mapping group names to locations, replacing the built-in table.
    #[arg(long = ARG_LOCALITY, value_name = "path")]
    #[serde(default)]
    pub(crate) locality: Option<Utf8PathBuf>,
    /// Persist the computed assignment.
    #[arg(long = ARG_SAVE)]
    #[serde(default)]
    pub(crate) save: bool,
    /// Name recorded as the author of a newly saved assignment.
    #[arg(long = ARG_CREATED_BY, value_name = "name")]
    #[serde(default)]
    pub(crate) created_by: Option<String>,
}

impl AssignArgs {
    fn into_config(self) -> Result<AssignConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        AssignConfig::try_from(merged)
    }
}

/// Resolved `assign` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssignConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) week: WeekId,
    pub(crate) locality: Option<Utf8PathBuf>,
    pub(crate) save: bool,
    pub(crate) created_by: String,
}

impl AssignConfig {
    fn assigner(&self) -> Result<GreedyAssigner, CliError> {
        let Some(path) = &self.locality else {
            return Ok(GreedyAssigner::default());
        };
        let table: LocalityTable = read_json(path, ARG_LOCALITY)?;
        log::debug!("loaded {} locations from {path}", table.len());
        Ok(GreedyAssigner::new(table))
    }
}

impl TryFrom<AssignArgs> for AssignConfig {
    type Error = CliError;

    fn try_from(args: AssignArgs) -> Result<Self, Self::Error> {
        let week = args.week.ok_or(CliError::MissingArgument {
            field: ARG_WEEK,
            env: ENV_ASSIGN_WEEK,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            week: WeekId::new(week),
            locality: args.locality,
            save: args.save,
            created_by: args
                .created_by
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        })
    }
}

/// JSON printed by `carpool assign`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignReport {
    week: WeekId,
    saved: bool,
    assignments: AssignmentResult,
    stats: AssignmentStats,
}

pub(crate) fn run_assign_with(
    args: AssignArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let assigner = config.assigner()?;
    let store = opener.open(&config.database)?;
    let signups = store.signups_for_week(&config.week)?;
    let result = assigner.assign(&signups, &config.week);

    if config.save {
        save_result(
            &*store,
            &config.week,
            &result,
            &config.created_by,
            Utc::now(),
        )?;
    }

    let report = AssignReport {
        week: config.week,
        saved: config.save,
        stats: stats(&result),
        assignments: result,
    };
    write_json(writer, &report)
}
