//! Core domain types and algorithms for the carpool engine.
//!
//! Signups go in, an [`AssignmentResult`] comes out. Everything here is
//! synchronous and side-effect free apart from logging through the `log`
//! facade; persistence is reached only through the [`SignupSource`] and
//! [`AssignmentStore`] traits.
//!
//! # Examples
//! ```
//! use chrono::{DateTime, Utc};
//! use carpool_core::{DriveOption, RawCapacity, Signup, WeekId, assign, stats};
//!
//! let at = DateTime::<Utc>::UNIX_EPOCH;
//! let signups = vec![
//!     Signup::new("d1", "Dana", DriveOption::Yes, "Fall Week 1", at)
//!         .with_location("North Quad")
//!         .with_capacity(RawCapacity::from(2)),
//!     Signup::new("r1", "Rui", DriveOption::No, "Fall Week 1", at).with_location("South Quad"),
//! ];
//! let result = assign(&signups, &WeekId::new("Fall Week 1"));
//! assert_eq!(stats(&result).assignment_rate.to_string(), "100.0");
//! ```

#![forbid(unsafe_code)]

pub mod assignment;
pub mod engine;
pub mod locality;
pub mod overrides;
pub mod signup;
pub mod stats;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use assignment::{AssignmentError, AssignmentResult, CarpoolAssignment, Slot};
pub use engine::{Assigner, GreedyAssigner, assign};
pub use locality::{LocalityTable, LocationGroup, compatible, group_of};
pub use overrides::{
    Destination, DestinationParseError, Draft, MoveOutcome, Unchanged, apply_move,
    apply_move_with_outcome,
};
pub use signup::{DriveOption, RawCapacity, Signup, SignupId, WeekId};
pub use stats::{AssignmentStats, Percentage, stats};
pub use store::{AssignmentDocument, AssignmentStore, SignupSource, StoreError, save_result};
