//! Table definitions.

use rusqlite::Connection;

use crate::SqliteStoreError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS signups (
    id TEXT PRIMARY KEY,
    week TEXT NOT NULL,
    submitted_at TEXT NOT NULL,
    payload TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS signups_by_week ON signups (week, submitted_at);
CREATE TABLE IF NOT EXISTS assignments (
    week TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    created_by TEXT NOT NULL,
    payload TEXT NOT NULL
);
";

pub(crate) fn create(connection: &Connection) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(SCHEMA)
        .map_err(|source| SqliteStoreError::Schema { source })
}
