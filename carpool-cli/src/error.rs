//! Error types emitted by the carpool CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use carpool_core::{DestinationParseError, StoreError, WeekId};
use carpool_data::SqliteStoreError;
use carpool_export::{ExportError, ExportKindParseError};
use thiserror::Error;

/// Errors emitted by the carpool CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected or read.
    #[error("failed to read {field} at {path:?}: {source}")]
    ReadInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A JSON input file could not be decoded.
    #[error("failed to parse {field} JSON at {path:?}: {source}")]
    ParseInput {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The `--to` value does not name a destination.
    #[error("invalid --to value {value:?}: {source}")]
    InvalidDestination {
        value: String,
        #[source]
        source: DestinationParseError,
    },
    /// The `--kind` value does not name an export.
    #[error("invalid --kind value: {0}")]
    InvalidExportKind(#[from] ExportKindParseError),
    /// Opening the SQLite store failed.
    #[error("failed to open store at {path:?}: {source}")]
    OpenStore {
        path: Utf8PathBuf,
        #[source]
        source: SqliteStoreError,
    },
    /// A store read or write failed; the command can be retried.
    #[error("store request failed: {0}")]
    Store(#[from] StoreError),
    /// No assignment has been saved for the week yet.
    #[error("no saved assignment for {week}; run `carpool assign --save` first")]
    NoSavedAssignment { week: WeekId },
    /// Building a CSV payload failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Writing an export file failed.
    #[error("failed to write {path:?}: {source}")]
    WriteFile {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Serializing a command report failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing to standard output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Installing the log subscriber failed.
    #[error("failed to initialise logging: {message}")]
    Logging { message: String },
}
