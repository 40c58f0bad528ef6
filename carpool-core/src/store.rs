//! Persistence traits for signups and saved assignments.
//!
//! The engine never talks to a database directly. Callers supply a
//! [`SignupSource`] to read raw signups and an [`AssignmentStore`] to load
//! and save one [`AssignmentDocument`] per week. Saving is last write wins.

use std::error::Error as StdError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AssignmentResult, Signup, WeekId};

/// Persisted shape of a week's assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDocument {
    /// Week the assignment belongs to; the document key.
    pub week: WeekId,
    /// The saved assignment.
    pub assignments: AssignmentResult,
    /// When the document was first saved.
    pub created_at: DateTime<Utc>,
    /// When the document was last saved.
    pub updated_at: DateTime<Utc>,
    /// Who first saved the document.
    pub created_by: String,
}

impl AssignmentDocument {
    /// Build a fresh document stamped with `now`.
    pub fn new(
        week: WeekId,
        assignments: AssignmentResult,
        author: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            week,
            assignments,
            created_at: now,
            updated_at: now,
            created_by: author.into(),
        }
    }

    /// Combine with the stored document for the same week.
    ///
    /// Creation metadata comes from `existing`; the payload and update time
    /// come from `self`.
    #[must_use]
    pub fn merged_with(self, existing: Option<&Self>) -> Self {
        match existing {
            Some(stored) => Self {
                created_at: stored.created_at,
                created_by: stored.created_by.clone(),
                ..self
            },
            None => self,
        }
    }
}

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached; the operation may be retried.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// A stored record could not be decoded.
    #[error("stored {what} is corrupt: {message}")]
    Corrupt {
        /// Kind of record, e.g. `"signup"`.
        what: &'static str,
        /// Decoder message.
        message: String,
    },
    /// Any other backend failure.
    #[error("store backend failed: {0}")]
    Backend(#[source] Box<dyn StdError + Send + Sync>),
}

/// Read access to raw signups.
pub trait SignupSource {
    /// Every stored signup, in submission order.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn signups(&self) -> Result<Vec<Signup>, StoreError>;

    /// Signups for a single week.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn signups_for_week(&self, week: &WeekId) -> Result<Vec<Signup>, StoreError> {
        let mut signups = self.signups()?;
        signups.retain(|signup| signup.afterevent_week == *week);
        Ok(signups)
    }
}

/// Load and save one assignment document per week.
pub trait AssignmentStore {
    /// Fetch the saved document for `week`, if any.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be read.
    fn load(&self, week: &WeekId) -> Result<Option<AssignmentDocument>, StoreError>;

    /// Upsert `document`, keeping the creation metadata of any existing
    /// document for the same week. Returns what was stored.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the backend cannot be written.
    fn save(&self, document: AssignmentDocument) -> Result<AssignmentDocument, StoreError>;
}

/// Persist `result` as the assignment for `week`.
///
/// # Errors
/// Propagates the store's error; the caller still owns `result` and may
/// retry.
pub fn save_result(
    store: &dyn AssignmentStore,
    week: &WeekId,
    result: &AssignmentResult,
    author: &str,
    now: DateTime<Utc>,
) -> Result<AssignmentDocument, StoreError> {
    let document = AssignmentDocument::new(week.clone(), result.clone(), author, now);
    let saved = store.save(document)?;
    log::info!("saved assignment for week {week}");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryStore, TEST_WEEK, driver, rider, submitted};
    use crate::assign;
    use rstest::{fixture, rstest};

    #[fixture]
    fn week() -> WeekId {
        WeekId::new(TEST_WEEK)
    }

    #[rstest]
    fn upsert_keeps_creation_metadata(week: WeekId) {
        let store = MemoryStore::default();
        let first = save_result(&store, &week, &AssignmentResult::empty(), "alice", submitted(0))
            .expect("first save");
        let signups = vec![driver("d1", "Tower A", 2, 0), rider("r1", "Tower A", 1)];
        let result = assign(&signups, &week);
        let second =
            save_result(&store, &week, &result, "bob", submitted(30)).expect("second save");

        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.created_by, "alice");
        assert_eq!(second.updated_at, submitted(30));
        assert_eq!(second.assignments, result);
        assert_eq!(store.load(&week).expect("load"), Some(second));
    }

    #[rstest]
    fn unavailable_store_reports_and_recovers(week: WeekId) {
        let store = MemoryStore::default();
        store.set_available(false);
        let result = AssignmentResult::empty();
        let err = save_result(&store, &week, &result, "ops", submitted(0))
            .expect_err("store is down");
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(store.load(&week).is_err());

        store.set_available(true);
        assert!(store.load(&week).expect("load").is_none());
        save_result(&store, &week, &result, "ops", submitted(1)).expect("retry");
        assert!(store.load(&week).expect("load").is_some());
    }

    #[rstest]
    fn signups_are_filtered_by_week(week: WeekId) {
        let mut other = rider("r2", "Plaza", 2);
        other.afterevent_week = WeekId::new("Fall Week 2");
        let store = MemoryStore::with_signups(vec![rider("r1", "Plaza", 1), other]);
        let weekly = store.signups_for_week(&week).expect("signups");
        assert_eq!(weekly.len(), 1);
        assert_eq!(store.signups().expect("signups").len(), 2);
    }

    #[rstest]
    fn document_serialises_in_camel_case(week: WeekId) {
        let doc = AssignmentDocument::new(week, AssignmentResult::empty(), "ops", submitted(0));
        let json = serde_json::to_value(&doc).expect("serialise");
        assert_eq!(json["createdBy"], "ops");
        assert_eq!(json["week"], TEST_WEEK);
        assert!(json["assignments"]["unassignedRiders"].is_array());
        let back: AssignmentDocument = serde_json::from_value(json).expect("deserialise");
        assert_eq!(back, doc);
    }
}
