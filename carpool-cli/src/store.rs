//! Store access shared by the subcommands.

use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::{AssignmentDocument, AssignmentStore, Signup, SignupSource, StoreError, WeekId};
use carpool_data::SqliteStore;
use serde::Serialize;

use crate::CliError;

/// Everything a subcommand needs from persistence.
pub(crate) trait CarpoolStore: SignupSource + AssignmentStore {
    /// Insert or replace signup records, returning how many were written.
    fn import_signups(&self, signups: &[Signup]) -> Result<usize, StoreError>;
}

impl CarpoolStore for SqliteStore {
    fn import_signups(&self, signups: &[Signup]) -> Result<usize, StoreError> {
        self.insert_signups(signups).map_err(StoreError::from)
    }
}

/// Opens the store for the current invocation.
pub(crate) trait StoreOpener {
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn CarpoolStore>, CliError>;
}

/// Opens (and creates when missing) the SQLite database at the given path.
pub(crate) struct SqliteStoreOpener;

impl StoreOpener for SqliteStoreOpener {
    fn open(&self, database: &Utf8Path) -> Result<Box<dyn CarpoolStore>, CliError> {
        let store = SqliteStore::open(database).map_err(|source| CliError::OpenStore {
            path: database.to_path_buf(),
            source,
        })?;
        Ok(Box::new(store))
    }
}

/// Load the saved assignment for `week`, failing when none exists.
pub(crate) fn load_saved(
    store: &dyn CarpoolStore,
    week: &WeekId,
) -> Result<AssignmentDocument, CliError> {
    store
        .load(week)?
        .ok_or_else(|| CliError::NoSavedAssignment { week: week.clone() })
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match carpool_fs::is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == ErrorKind::NotFound => Err(CliError::MissingSourceFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) => Err(CliError::ReadInput {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and decode a JSON input file.
pub(crate) fn read_json<T>(path: &Utf8Path, field: &'static str) -> Result<T, CliError>
where
    T: serde::de::DeserializeOwned,
{
    require_existing(path, field)?;
    let text = carpool_fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        field,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::ParseInput {
        field,
        path: path.to_path_buf(),
        source,
    })
}

/// Write `report` to `writer` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, report: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeOutput)?;
    writeln!(writer, "{payload}").map_err(CliError::WriteOutput)
}

/// Resolve the configured database path.
pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(crate::DEFAULT_DATABASE))
}
