//! Export command implementation for the carpool CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::WeekId;
use carpool_export::{ExportKind, assignments_csv, export_file_name, signups_csv};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::store::{
    CarpoolStore, StoreOpener, database_or_default, load_saved,
};
use crate::{
    ARG_DATABASE, ARG_KIND, ARG_OUTPUT, ARG_WEEK, CliError, ENV_EXPORT_KIND, ENV_EXPORT_WEEK,
};

/// CLI arguments for the `export` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "export",
    long_about = "Write the week's signups or its saved assignment as CSV. \
                 Without --output the CSV goes to stdout. When --output names \
                 a directory the file inside it is named after the export \
                 kind and week.",
    about = "Export signups or assignments as CSV"
)]
#[ortho_config(prefix = "CARPOOL")]
pub(crate) struct ExportArgs {
    /// Path to the SQLite database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Week label, e.g. "Fall Week 1".
    #[arg(long = ARG_WEEK, value_name = "week")]
    #[serde(default)]
    pub(crate) week: Option<String>,
    /// What to export: `signups` or `assignments`.
    #[arg(long = ARG_KIND, value_name = "kind")]
    #[serde(default)]
    pub(crate) kind: Option<String>,
    /// Output file or directory.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExportArgs {
    fn into_config(self) -> Result<ExportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ExportConfig::try_from(merged)
    }
}

/// Resolved `export` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) week: WeekId,
    pub(crate) kind: ExportKind,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl ExportConfig {
    /// Final file path for the export, if it is not going to stdout.
    fn target(&self) -> Result<Option<Utf8PathBuf>, CliError> {
        let Some(output) = &self.output else {
            return Ok(None);
        };
        let is_dir = carpool_fs::is_dir(output).map_err(|source| CliError::WriteFile {
            path: output.clone(),
            source,
        })?;
        if is_dir {
            Ok(Some(output.join(export_file_name(self.kind, &self.week))))
        } else {
            Ok(Some(output.clone()))
        }
    }
}

impl TryFrom<ExportArgs> for ExportConfig {
    type Error = CliError;

    fn try_from(args: ExportArgs) -> Result<Self, Self::Error> {
        let week = args.week.ok_or(CliError::MissingArgument {
            field: ARG_WEEK,
            env: ENV_EXPORT_WEEK,
        })?;
        let kind = args.kind.ok_or(CliError::MissingArgument {
            field: ARG_KIND,
            env: ENV_EXPORT_KIND,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            week: WeekId::new(week),
            kind: kind.parse()?,
            output: args.output,
        })
    }
}

pub(crate) fn run_export_with(
    args: ExportArgs,
    opener: &dyn StoreOpener,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let store = opener.open(&config.database)?;
    let csv = render(&*store, config.kind, &config.week)?;

    match config.target()? {
        Some(path) => write_file(&path, &csv, writer),
        None => writer.write_all(csv.as_bytes()).map_err(CliError::WriteOutput),
    }
}

fn render(store: &dyn CarpoolStore, kind: ExportKind, week: &WeekId) -> Result<String, CliError> {
    let csv = match kind {
        ExportKind::Signups => signups_csv(&store.signups_for_week(week)?)?,
        ExportKind::Assignments => assignments_csv(&load_saved(store, week)?.assignments)?,
    };
    Ok(csv)
}

fn write_file(path: &Utf8Path, csv: &str, writer: &mut dyn Write) -> Result<(), CliError> {
    carpool_fs::write_string(path, csv).map_err(|source| CliError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} bytes to {path}", csv.len());
    writeln!(writer, "{path}").map_err(CliError::WriteOutput)
}
