//! Errors raised by the SQLite store.

use camino::Utf8PathBuf;
use carpool_core::StoreError;
use rusqlite::Error as SqliteError;
use thiserror::Error;

/// Failure while reading or writing the SQLite database.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Creating the parent directory for the database failed.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Location of the SQLite database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Creating the tables failed.
    #[error("failed to initialise carpool schema")]
    Schema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Serialising a record to JSON failed.
    #[error("failed to encode {what} {key}")]
    Encode {
        /// Kind of record.
        what: &'static str,
        /// Record key.
        key: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored JSON payload could not be decoded.
    #[error("failed to decode {what} {key}")]
    Decode {
        /// Kind of record.
        what: &'static str,
        /// Record key.
        key: String,
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A stored timestamp was not RFC 3339.
    #[error("invalid timestamp {value:?} on {what} {key}")]
    Timestamp {
        /// Kind of record.
        what: &'static str,
        /// Record key.
        key: String,
        /// Stored text.
        value: String,
        /// Parser error.
        #[source]
        source: chrono::ParseError,
    },
    /// Generic SQLite error while querying or writing rows.
    #[error("database error: {source}")]
    Database {
        /// Source error raised by the SQLite driver.
        #[from]
        source: SqliteError,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(err: SqliteStoreError) -> Self {
        match err {
            SqliteStoreError::CreateDirectory { .. } | SqliteStoreError::Open { .. } => {
                Self::Unavailable {
                    reason: error_chain(&err),
                }
            }
            SqliteStoreError::Decode { what, .. } | SqliteStoreError::Timestamp { what, .. } => {
                Self::Corrupt {
                    what,
                    message: error_chain(&err),
                }
            }
            SqliteStoreError::Database {
                source: SqliteError::SqliteFailure(ref failure, _),
            } if matches!(
                failure.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) =>
            {
                Self::Unavailable {
                    reason: error_chain(&err),
                }
            }
            other => Self::Backend(Box::new(other)),
        }
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn decode_errors_become_corrupt() {
        let source = serde_json::from_str::<u8>("nope").expect_err("invalid json");
        let err = StoreError::from(SqliteStoreError::Decode {
            what: "signup",
            key: "s1".into(),
            source,
        });
        let StoreError::Corrupt { what, message } = err else {
            panic!("expected a corrupt-record error, got {err:?}");
        };
        assert_eq!(what, "signup");
        assert!(message.starts_with("failed to decode signup s1: "), "{message}");
    }

    #[rstest]
    fn busy_database_is_retryable() {
        let busy = SqliteError::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err = StoreError::from(SqliteStoreError::from(busy));
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }
}
