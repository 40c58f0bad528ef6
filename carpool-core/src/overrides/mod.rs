//! Manual relocation of riders between cars and the unassigned pool.
//!
//! Each move takes the current [`AssignmentResult`] and returns a new one;
//! the input is never mutated. Moves are all-or-nothing: a rider is removed
//! from their container only once the destination is known to exist.
//! Dropping a rider onto a full car seats them in the unassigned pool rather
//! than rejecting the move.

mod destination;
mod draft;

pub use destination::{Destination, DestinationParseError};
pub use draft::Draft;

use std::fmt;

use crate::{AssignmentResult, SignupId, Slot};

/// Why a move left the result untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unchanged {
    /// The rider is in no car and not in the unassigned pool.
    RiderNotFound,
    /// The destination car or rider does not exist.
    DestinationNotFound,
    /// The rider already sits in the destination container.
    SameContainer,
}

/// What happened to the rider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The rider now sits in the requested container.
    Placed(Slot),
    /// The requested car was full; the rider went to the unassigned pool.
    Redirected {
        /// Index of the full car.
        requested: usize,
    },
    /// Nothing changed.
    Unchanged(Unchanged),
}

impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placed(Slot::Car(index)) => write!(f, "placed in car {index}"),
            Self::Placed(Slot::Unassigned) => f.write_str("placed in the unassigned pool"),
            Self::Redirected { requested } => {
                write!(f, "car {requested} is full; placed in the unassigned pool")
            }
            Self::Unchanged(Unchanged::RiderNotFound) => f.write_str("unchanged: rider not found"),
            Self::Unchanged(Unchanged::DestinationNotFound) => {
                f.write_str("unchanged: destination not found")
            }
            Self::Unchanged(Unchanged::SameContainer) => {
                f.write_str("unchanged: rider is already there")
            }
        }
    }
}

/// Move `rider` to `destination`, returning the new result.
///
/// A move into the container the rider already occupies, whether named
/// directly or by dropping onto a rider in it, changes nothing. The rider
/// keeps their position in the roster rather than moving to its end.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use carpool_core::{Destination, DriveOption, RawCapacity, Signup, WeekId, apply_move, assign};
///
/// let epoch = DateTime::<Utc>::UNIX_EPOCH;
/// let signups = vec![
///     Signup::new("d1", "Dana", DriveOption::Yes, "Week 1", epoch)
///         .with_capacity(RawCapacity::from(3)),
///     Signup::new("r1", "Rui", DriveOption::No, "Week 1", epoch),
/// ];
/// let result = assign(&signups, &WeekId::new("Week 1"));
///
/// let moved = apply_move(&result, &"r1".into(), &Destination::Unassigned);
/// assert_eq!(moved.unassigned_riders().len(), 1);
/// assert!(moved.assignments()[0].riders().is_empty());
/// ```
#[must_use]
pub fn apply_move(
    result: &AssignmentResult,
    rider: &SignupId,
    destination: &Destination,
) -> AssignmentResult {
    apply_move_with_outcome(result, rider, destination).0
}

/// Move `rider` to `destination`, also reporting where the rider landed.
#[must_use]
pub fn apply_move_with_outcome(
    result: &AssignmentResult,
    rider: &SignupId,
    destination: &Destination,
) -> (AssignmentResult, MoveOutcome) {
    let unchanged = |reason| (result.clone(), MoveOutcome::Unchanged(reason));

    let Some(source) = result.locate_rider(rider) else {
        log::debug!("move ignored: rider {rider} not found");
        return unchanged(Unchanged::RiderNotFound);
    };
    let Some(target) = resolve(result, destination) else {
        log::debug!("move ignored: destination {destination} not found");
        return unchanged(Unchanged::DestinationNotFound);
    };
    if source == target {
        return unchanged(Unchanged::SameContainer);
    }

    let mut next = result.clone();
    let Some(signup) = next.take_rider(rider, source) else {
        return unchanged(Unchanged::RiderNotFound);
    };
    let outcome = match target {
        Slot::Car(index) => match next.seat_in_car(index, signup) {
            Ok(()) => MoveOutcome::Placed(target),
            Err(returned) => {
                log::debug!("car {index} is full; rider {rider} moved to unassigned");
                next.push_unassigned(returned);
                MoveOutcome::Redirected { requested: index }
            }
        },
        Slot::Unassigned => {
            next.push_unassigned(signup);
            MoveOutcome::Placed(target)
        }
    };
    (next, outcome)
}

fn resolve(result: &AssignmentResult, destination: &Destination) -> Option<Slot> {
    match destination {
        Destination::Car(index) => result.car(*index).map(|_| Slot::Car(*index)),
        Destination::Unassigned => Some(Slot::Unassigned),
        Destination::Rider(other) => result.locate(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TEST_WEEK, driver, rider};
    use crate::{Signup, WeekId, assign};
    use rstest::{fixture, rstest};

    /// Two cars: d1 (3 seats) full with r1, r2; d2 (3 seats) holding r3.
    /// r4 waits unassigned.
    #[fixture]
    fn result() -> AssignmentResult {
        let signups = vec![
            driver("d1", "Tower A", 3, 0),
            driver("d2", "Plaza", 3, 1),
            rider("r1", "Tower A", 1),
            rider("r2", "Tower A", 2),
            rider("r3", "Plaza", 3),
            rider("r4", "Village", 4),
        ];
        let assigned = assign(&signups, &WeekId::new(TEST_WEEK));
        apply_move(&assigned, &"r4".into(), &Destination::Unassigned)
    }

    fn ids(signups: &[Signup]) -> Vec<&str> {
        signups.iter().map(|signup| signup.id.as_str()).collect()
    }

    fn roster(result: &AssignmentResult, index: usize) -> Vec<&str> {
        result.car(index).map_or_else(Vec::new, |car| ids(car.riders()))
    }

    #[rstest]
    fn fixture_layout(result: AssignmentResult) {
        assert_eq!(roster(&result, 0), ["r1", "r2"]);
        assert_eq!(roster(&result, 1), ["r3"]);
        assert_eq!(ids(result.unassigned_riders()), ["r4"]);
    }

    #[rstest]
    fn moves_between_cars(result: AssignmentResult) {
        let (moved, outcome) =
            apply_move_with_outcome(&result, &"r3".into(), &Destination::Car(0));
        assert_eq!(outcome, MoveOutcome::Redirected { requested: 0 });
        assert_eq!(roster(&moved, 0), ["r1", "r2"]);
        assert_eq!(ids(moved.unassigned_riders()), ["r4", "r3"]);

        let (back, outcome) = apply_move_with_outcome(&moved, &"r1".into(), &Destination::Car(1));
        assert_eq!(outcome, MoveOutcome::Placed(Slot::Car(1)));
        assert_eq!(roster(&back, 0), ["r2"]);
        assert_eq!(roster(&back, 1), ["r1"]);
    }

    #[rstest]
    fn full_car_redirects_to_unassigned(result: AssignmentResult) {
        let (moved, outcome) =
            apply_move_with_outcome(&result, &"r4".into(), &Destination::Car(0));
        assert_eq!(outcome, MoveOutcome::Redirected { requested: 0 });
        assert_eq!(roster(&moved, 0), ["r1", "r2"]);
        assert_eq!(ids(moved.unassigned_riders()), ["r4"]);
    }

    #[rstest]
    fn drop_on_rider_resolves_to_their_car(result: AssignmentResult) {
        let (moved, outcome) =
            apply_move_with_outcome(&result, &"r4".into(), &Destination::Rider("r3".into()));
        assert_eq!(outcome, MoveOutcome::Placed(Slot::Car(1)));
        assert_eq!(roster(&moved, 1), ["r3", "r4"]);
        assert!(moved.unassigned_riders().is_empty());
    }

    #[rstest]
    fn drop_on_driver_resolves_to_their_car(result: AssignmentResult) {
        let (moved, outcome) =
            apply_move_with_outcome(&result, &"r3".into(), &Destination::Rider("d1".into()));
        assert_eq!(outcome, MoveOutcome::Redirected { requested: 0 });
        assert_eq!(ids(moved.unassigned_riders()), ["r4", "r3"]);
        assert!(roster(&moved, 1).is_empty());
    }

    #[rstest]
    fn drop_on_unassigned_rider_resolves_to_pool(result: AssignmentResult) {
        let (moved, outcome) =
            apply_move_with_outcome(&result, &"r1".into(), &Destination::Rider("r4".into()));
        assert_eq!(outcome, MoveOutcome::Placed(Slot::Unassigned));
        assert_eq!(ids(moved.unassigned_riders()), ["r4", "r1"]);
        assert_eq!(roster(&moved, 0), ["r2"]);
    }

    #[rstest]
    #[case::unknown_rider("ghost", Destination::Unassigned, Unchanged::RiderNotFound)]
    #[case::driver_is_not_a_rider("d1", Destination::Unassigned, Unchanged::RiderNotFound)]
    #[case::missing_car("r1", Destination::Car(9), Unchanged::DestinationNotFound)]
    #[case::missing_target_rider(
        "r1",
        Destination::Rider("ghost".into()),
        Unchanged::DestinationNotFound
    )]
    #[case::same_car("r1", Destination::Car(0), Unchanged::SameContainer)]
    #[case::onto_self("r1", Destination::Rider("r1".into()), Unchanged::SameContainer)]
    fn no_op_moves_leave_input_untouched(
        result: AssignmentResult,
        #[case] rider: &str,
        #[case] destination: Destination,
        #[case] reason: Unchanged,
    ) {
        let (moved, outcome) = apply_move_with_outcome(&result, &rider.into(), &destination);
        assert_eq!(outcome, MoveOutcome::Unchanged(reason));
        assert_eq!(moved, result);
    }

    #[rstest]
    #[case::same_car("r1", Destination::Car(0), 0)]
    #[case::onto_car_mate("r1", Destination::Rider("r2".into()), 0)]
    #[case::onto_own_driver("r3", Destination::Rider("d2".into()), 1)]
    fn moving_within_a_car_keeps_roster_order(
        result: AssignmentResult,
        #[case] rider: &str,
        #[case] destination: Destination,
        #[case] car: usize,
    ) {
        let before = roster(&result, car);
        let moved = apply_move(&result, &rider.into(), &destination);
        assert_eq!(roster(&moved, car), before);
    }

    #[rstest]
    fn moving_within_the_pool_keeps_its_order() {
        let signups = vec![
            rider("r1", "Tower A", 1),
            rider("r2", "Tower A", 2),
        ];
        let result = assign(&signups, &WeekId::new(TEST_WEEK));
        let moved = apply_move(&result, &"r1".into(), &Destination::Unassigned);
        assert_eq!(ids(moved.unassigned_riders()), ["r1", "r2"]);
    }

    #[rstest]
    fn round_trip_restores_roster(result: AssignmentResult) {
        let out = apply_move(&result, &"r2".into(), &Destination::Unassigned);
        let back = apply_move(&out, &"r2".into(), &Destination::Car(0));
        let mut before = roster(&result, 0);
        let mut after = roster(&back, 0);
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[rstest]
    #[case::car(MoveOutcome::Placed(Slot::Car(1)), "placed in car 1")]
    #[case::redirected(
        MoveOutcome::Redirected { requested: 0 },
        "car 0 is full; placed in the unassigned pool"
    )]
    #[case::missing(MoveOutcome::Unchanged(Unchanged::RiderNotFound), "unchanged: rider not found")]
    fn outcomes_describe_themselves(#[case] outcome: MoveOutcome, #[case] expected: &str) {
        assert_eq!(outcome.to_string(), expected);
    }
}
