//! Facade crate for the carpool engine.
//!
//! This crate re-exports the core domain types and CSV exports, and exposes
//! the SQLite store behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use carpool_core::{
    Assigner, AssignmentDocument, AssignmentError, AssignmentResult, AssignmentStats,
    AssignmentStore, CarpoolAssignment, Destination, DestinationParseError, DriveOption, Draft,
    GreedyAssigner, LocalityTable, LocationGroup, MoveOutcome, Percentage, RawCapacity, Signup,
    SignupId, SignupSource, Slot, StoreError, Unchanged, WeekId, apply_move,
    apply_move_with_outcome, assign, compatible, group_of, save_result, stats,
};
pub use carpool_export::{
    ExportError, ExportKind, ExportKindParseError, assignments_csv, export_file_name, signups_csv,
};

#[cfg(feature = "store-sqlite")]
pub use carpool_data::{SqliteStore, SqliteStoreError};
