//! Move command implementation for the carpool CLI.
//!
//! One invocation applies one manual override to the saved assignment. The
//! edit is saved only when it changed something; a move that leaves the
//! result untouched is reported and the document is left alone.

use std::io::Write;

use camino::Utf8PathBuf;
use carpool_core::{AssignmentResult, Destination, Draft, SignupId, WeekId, save_result};
use chrono::Utc;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{StoreOpener, database_or_default, load_saved, write_json};
use crate::{
    ARG_CREATED_BY, ARG_DATABASE, ARG_RIDER, ARG_TO, ARG_WEEK, CliError, DEFAULT_AUTHOR,
    ENV_MOVE_RIDER, ENV_MOVE_TO, ENV_MOVE_WEEK,
};

/// CLI arguments for the `move` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "move",
    long_about = "Move one rider within the saved assignment. The destination \
                 is `car:N` (zero-based), `unassigned`, or `rider:ID` to join \
                 whichever car that person is in. A full car sends the rider \
                 to the unassigned pool instead.",
    about = "Move a rider in the saved assignment"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct MoveArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Week label, e.g. "Fall Week 1".
    #[arg(long = ARG_WEEK, value_name = "week")]
    #[serde(default)]
    pub(crate) week: Option<String>,
    /// Signup id of the rider to move.
    #[arg(long = ARG_RIDER, value_name = "id")]
    #[serde(default)]
    pub(crate) rider: Option<String>,
    /// Destination: `car:N`, `unassigned` or `rider:ID`.
    #[arg(long = ARG_TO, value_name = "destination")]
    #[serde(default)]
    pub(crate) to: Option<String>,
    /// Name recorded if the move creates the week's first saved assignment.
    #[arg(long = ARG_CREATED_BY, value_name = "name")]
    #[serde(default)]
    pub(crate) created_by: Option<String>,
}

impl MoveArgs {
    fn into_config(self) -> Result<MoveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MoveConfig::try_from(merged)
    }
}

/// Resolved `move` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MoveConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) week: WeekId,
    pub(crate) rider: SignupId,
    pub(crate) to: Destination,
    pub(crate) created_by: String,
}

impl TryFrom<MoveArgs> for MoveConfig {
    type Error = CliError;

    fn try_from(args: MoveArgs) -> Result<Self, Self::Error> {
        let week = args.week.ok_or(CliError::MissingArgument {
            field: ARG_WEEK,
            env: ENV_MOVE_WEEK,
        })?;
        let rider = args.rider.ok_or(CliError::MissingArgument {
            field: ARG_RIDER,
            env: ENV_MOVE_RIDER,
        })?;
        let raw_to = args.to.ok_or(CliError::MissingArgument {
            field: ARG_TO,
            env: ENV_MOVE_TO,
        })?;
        let to = raw_to
            .parse::<Destination>()
            .map_err(|source| CliError::InvalidDestination {
                value: raw_to.clone(),
                source,
            })?;
        Ok(Self {
            database: database_or_default(args.database),
            week: WeekId::new(week),
            rider: SignupId::new(rider),
            to,
            created_by: args
                .created_by
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveReport {
    week: WeekId,
    rider: SignupId,
    destination: String,
    outcome: String,
    saved: bool,
    assignments: AssignmentResult,
}

pub(crate) fn run_move_with(
    args: MoveArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = opener.open(&config.database)?;
    let document = load_saved(&*store, &config.week)?;

    let mut draft = Draft::new(config.week.clone(), document.assignments);
    let outcome = draft.apply(&config.rider, &config.to);
    log::info!("move {} to {}: {outcome}", config.rider, config.to);

    let saved = draft.is_dirty();
    if saved {
        save_result(
            &*store,
            draft.week(),
            draft.current(),
            &config.created_by,
            Utc::now(),
        )?;
    }

    let report = MoveReport {
        week: config.week,
        rider: config.rider,
        destination: config.to.to_string(),
        outcome: outcome.to_string(),
        saved,
        assignments: draft.current().clone(),
    };
    write_json(writer, &report)
}
