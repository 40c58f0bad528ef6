//! SQLite persistence for carpool signups and saved assignments.
//!
//! [`SqliteStore`] implements both [`carpool_core::SignupSource`] and
//! [`carpool_core::AssignmentStore`]. Records are stored as JSON payloads
//! next to the columns used for keys and ordering.
#![forbid(unsafe_code)]

mod error;
mod schema;
mod store;

pub use error::SqliteStoreError;
pub use store::SqliteStore;
