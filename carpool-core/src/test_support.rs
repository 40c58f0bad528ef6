//! Builders and an in-memory store used by unit and behaviour tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::{
    AssignmentDocument, AssignmentStore, DriveOption, RawCapacity, Signup, SignupSource,
    StoreError, WeekId,
};

/// Week label shared by test fixtures.
pub const TEST_WEEK: &str = "Fall Week 1";

/// Fixed submission time `minute` minutes after a reference instant.
#[must_use]
pub fn submitted(minute: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + minute * 60, 0).unwrap_or_default()
}

/// A driver for [`TEST_WEEK`] offering `seats` including themselves.
#[must_use]
pub fn driver(id: &str, location: &str, seats: u32, minute: i64) -> Signup {
    Signup::new(id, id, DriveOption::Yes, TEST_WEEK, submitted(minute))
        .with_location(location)
        .with_capacity(RawCapacity::from(seats))
}

/// A rider for [`TEST_WEEK`].
#[must_use]
pub fn rider(id: &str, location: &str, minute: i64) -> Signup {
    Signup::new(id, id, DriveOption::No, TEST_WEEK, submitted(minute)).with_location(location)
}

/// Someone driving only themselves in [`TEST_WEEK`].
#[must_use]
pub fn self_driver(id: &str, location: &str, minute: i64) -> Signup {
    Signup::new(id, id, DriveOption::SelfDrive, TEST_WEEK, submitted(minute))
        .with_location(location)
}

/// In-memory [`SignupSource`] and [`AssignmentStore`].
///
/// [`MemoryStore::set_available`] simulates an outage: while unavailable,
/// every call fails with [`StoreError::Unavailable`].
#[derive(Debug)]
pub struct MemoryStore {
    signups: Mutex<Vec<Signup>>,
    documents: Mutex<BTreeMap<WeekId, AssignmentDocument>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_signups(Vec::new())
    }
}

impl MemoryStore {
    /// Create a store holding `signups`.
    #[must_use]
    pub fn with_signups(signups: Vec<Signup>) -> Self {
        Self {
            signups: Mutex::new(signups),
            documents: Mutex::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle the simulated outage.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert or replace signups by id, returning how many were written.
    #[must_use]
    pub fn insert_signups(&self, incoming: &[Signup]) -> usize {
        let mut signups = self.signups.lock().unwrap_or_else(PoisonError::into_inner);
        for signup in incoming {
            match signups.iter_mut().find(|existing| existing.id == signup.id) {
                Some(existing) => existing.clone_from(signup),
                None => signups.push(signup.clone()),
            }
        }
        incoming.len()
    }

    /// Number of saved documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable {
                reason: "memory store is offline".to_owned(),
            })
        }
    }
}

impl SignupSource for MemoryStore {
    fn signups(&self) -> Result<Vec<Signup>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .signups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

impl AssignmentStore for MemoryStore {
    fn load(&self, week: &WeekId) -> Result<Option<AssignmentDocument>, StoreError> {
        self.ensure_available()?;
        Ok(self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(week)
            .cloned())
    }

    fn save(&self, document: AssignmentDocument) -> Result<AssignmentDocument, StoreError> {
        self.ensure_available()?;
        let mut documents = self.documents.lock().unwrap_or_else(PoisonError::into_inner);
        let existing = documents.get(&document.week).cloned();
        let stored = document.merged_with(existing.as_ref());
        documents.insert(stored.week.clone(), stored.clone());
        Ok(stored)
    }
}
