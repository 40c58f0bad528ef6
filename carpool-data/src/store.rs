//! [`SqliteStore`] and its trait implementations.

use camino::Utf8Path;
use carpool_core::{
    AssignmentDocument, AssignmentResult, AssignmentStore, Signup, SignupId, SignupSource,
    StoreError, WeekId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::{SqliteStoreError, schema};

/// Signups and assignment documents in one SQLite database.
///
/// Saving an assignment is an upsert keyed by week: the first save fixes
/// `createdAt` and `createdBy`, later saves replace the payload and bump
/// `updatedAt`.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`, creating parent directories.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] if the directory, file or schema cannot be
    /// created.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        carpool_fs::ensure_parent_dir(path).map_err(|source| {
            SqliteStoreError::CreateDirectory {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("opened carpool database at {path}");
        Self::with_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection = Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
            path: ":memory:".into(),
            source,
        })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqliteStoreError> {
        schema::create(&connection)?;
        Ok(Self { connection })
    }

    /// Insert or replace signups by id. Returns the number written.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] if a signup cannot be encoded or written;
    /// nothing is written in that case.
    pub fn insert_signups(&self, signups: &[Signup]) -> Result<usize, SqliteStoreError> {
        let transaction = self.connection.unchecked_transaction()?;
        {
            let mut statement = transaction.prepare(
                "INSERT OR REPLACE INTO signups (id, week, submitted_at, payload)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for signup in signups {
                let payload =
                    serde_json::to_string(signup).map_err(|source| SqliteStoreError::Encode {
                        what: "signup",
                        key: signup.id.to_string(),
                        source,
                    })?;
                statement.execute(params![
                    signup.id.as_str(),
                    signup.afterevent_week.as_str(),
                    timestamp(signup.submitted_at),
                    payload,
                ])?;
            }
        }
        transaction.commit()?;
        log::info!("stored {} signups", signups.len());
        Ok(signups.len())
    }

    /// Remove a signup. Returns whether it existed.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] if the delete fails.
    pub fn delete_signup(&self, id: &SignupId) -> Result<bool, SqliteStoreError> {
        let removed = self
            .connection
            .execute("DELETE FROM signups WHERE id = ?1", params![id.as_str()])?;
        Ok(removed > 0)
    }

    /// Weeks with a saved assignment, in lexical order.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] if the query fails.
    pub fn saved_weeks(&self) -> Result<Vec<WeekId>, SqliteStoreError> {
        let mut statement = self
            .connection
            .prepare("SELECT week FROM assignments ORDER BY week")?;
        let weeks = statement
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|week| week.map(WeekId::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(weeks)
    }

    fn read_signups(&self, week: Option<&WeekId>) -> Result<Vec<Signup>, SqliteStoreError> {
        let mut statement = self.connection.prepare(
            "SELECT id, payload FROM signups
             WHERE ?1 IS NULL OR week = ?1
             ORDER BY submitted_at, rowid",
        )?;
        let rows = statement
            .query_map(params![week.map(WeekId::as_str)], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(id, payload)| {
                serde_json::from_str(&payload).map_err(|source| SqliteStoreError::Decode {
                    what: "signup",
                    key: id,
                    source,
                })
            })
            .collect()
    }

    fn read_document(&self, week: &WeekId) -> Result<Option<AssignmentDocument>, SqliteStoreError> {
        let row = self
            .connection
            .query_row(
                "SELECT created_at, updated_at, created_by, payload
                 FROM assignments WHERE week = ?1",
                params![week.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;
        let Some((created_at, updated_at, created_by, payload)) = row else {
            return Ok(None);
        };
        let assignments: AssignmentResult =
            serde_json::from_str(&payload).map_err(|source| SqliteStoreError::Decode {
                what: "assignment",
                key: week.to_string(),
                source,
            })?;
        Ok(Some(AssignmentDocument {
            week: week.clone(),
            assignments,
            created_at: parse_timestamp(week, &created_at)?,
            updated_at: parse_timestamp(week, &updated_at)?,
            created_by,
        }))
    }

    fn write_document(
        &self,
        document: &AssignmentDocument,
    ) -> Result<AssignmentDocument, SqliteStoreError> {
        let payload = serde_json::to_string(&document.assignments).map_err(|source| {
            SqliteStoreError::Encode {
                what: "assignment",
                key: document.week.to_string(),
                source,
            }
        })?;
        let transaction = self.connection.unchecked_transaction()?;
        transaction.execute(
            "INSERT INTO assignments (week, created_at, updated_at, created_by, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(week) DO UPDATE SET
                 updated_at = excluded.updated_at,
                 payload = excluded.payload",
            params![
                document.week.as_str(),
                timestamp(document.created_at),
                timestamp(document.updated_at),
                document.created_by,
                payload,
            ],
        )?;
        let stored = self.read_document(&document.week)?;
        transaction.commit()?;
        Ok(stored.unwrap_or_else(|| document.clone()))
    }
}

impl SignupSource for SqliteStore {
    fn signups(&self) -> Result<Vec<Signup>, StoreError> {
        Ok(self.read_signups(None)?)
    }

    fn signups_for_week(&self, week: &WeekId) -> Result<Vec<Signup>, StoreError> {
        Ok(self.read_signups(Some(week))?)
    }
}

impl AssignmentStore for SqliteStore {
    fn load(&self, week: &WeekId) -> Result<Option<AssignmentDocument>, StoreError> {
        Ok(self.read_document(week)?)
    }

    fn save(&self, document: AssignmentDocument) -> Result<AssignmentDocument, StoreError> {
        Ok(self.write_document(&document)?)
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(week: &WeekId, value: &str) -> Result<DateTime<Utc>, SqliteStoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|source| SqliteStoreError::Timestamp {
            what: "assignment",
            key: week.to_string(),
            value: value.to_owned(),
            source,
        })
}
