//! Temporary workspaces and stores shared by CLI tests.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use carpool_core::test_support::{MemoryStore, TEST_WEEK, driver, rider};
use carpool_core::{AssignmentDocument, AssignmentStore, Signup, SignupSource, StoreError, WeekId};
use tempfile::TempDir;

use crate::store::{CarpoolStore, StoreOpener};
use crate::{ARG_DATABASE, ARG_WEEK, CliError};

/// Two cars and four riders.
///
/// With the built-in localities d1 (Tower A, 3 seats) takes r1 and r2 and d2
/// (Plaza, 2 seats) takes r3, leaving r4 unassigned. A signup for another
/// week must be ignored.
pub(super) fn week_signups() -> Vec<Signup> {
    let mut other_week = rider("x1", "Tower A", 0);
    other_week.afterevent_week = WeekId::new("Fall Week 2");
    vec![
        driver("d1", "Tower A", 3, 0),
        driver("d2", "Plaza", 2, 1),
        rider("r1", "Tower A", 2),
        rider("r2", "Tower B", 3),
        rider("r3", "Plaza", 4),
        rider("r4", "Village", 5),
        other_week,
    ]
}

/// A temporary directory holding the database and any input files.
#[derive(Debug)]
pub(super) struct Workspace {
    _tmp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self { _tmp: tmp, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("data/carpool.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        carpool_fs::write_string(&path, contents).expect("write fixture file");
        path
    }

    pub(super) fn write_signups(&self, signups: &[Signup]) -> Utf8PathBuf {
        let payload = serde_json::to_string_pretty(signups).expect("serialize signups");
        self.write("signups.json", &payload)
    }

    /// Common `--database` and `--week` flags.
    pub(super) fn base_args(&self, command: &str) -> Vec<String> {
        vec![
            "carpool".to_owned(),
            command.to_owned(),
            format!("--{ARG_DATABASE}"),
            self.database().into_string(),
            format!("--{ARG_WEEK}"),
            TEST_WEEK.to_owned(),
        ]
    }
}

/// Hands out one shared [`MemoryStore`] so tests can simulate outages.
#[derive(Debug, Default)]
pub(super) struct MemoryOpener {
    pub(super) store: Arc<MemoryStore>,
}

impl StoreOpener for MemoryOpener {
    fn open(&self, _database: &Utf8Path) -> Result<Box<dyn CarpoolStore>, CliError> {
        Ok(Box::new(SharedMemoryStore(Arc::clone(&self.store))))
    }
}

struct SharedMemoryStore(Arc<MemoryStore>);

impl SignupSource for SharedMemoryStore {
    fn signups(&self) -> Result<Vec<Signup>, StoreError> {
        self.0.signups()
    }
}

impl AssignmentStore for SharedMemoryStore {
    fn load(&self, week: &WeekId) -> Result<Option<AssignmentDocument>, StoreError> {
        self.0.load(week)
    }

    fn save(&self, document: AssignmentDocument) -> Result<AssignmentDocument, StoreError> {
        self.0.save(document)
    }
}

impl CarpoolStore for SharedMemoryStore {
    fn import_signups(&self, signups: &[Signup]) -> Result<usize, StoreError> {
        self.0.signups()?;
        Ok(self.0.insert_signups(signups))
    }
}
