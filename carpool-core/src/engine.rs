//! Greedy carpool matching.
//!
//! The [`Assigner`] trait is the seam between callers and matching
//! strategies. [`GreedyAssigner`] fills the largest cars first and, for each
//! car, takes riders from the same building, then the same
//! [`LocationGroup`](crate::LocationGroup), then anyone still waiting. Riders
//! are served first come, first served.

use crate::{AssignmentResult, CarpoolAssignment, DriveOption, LocalityTable, Signup, WeekId};

/// Produce an assignment for one week from the raw signups.
///
/// Implementations must be deterministic for identical input and must never
/// fail: malformed records are skipped rather than reported.
pub trait Assigner: Send + Sync {
    /// Match the `week`'s riders to its drivers.
    fn assign(&self, signups: &[Signup], week: &WeekId) -> AssignmentResult;
}

/// First-fit matcher with locality preferences.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use carpool_core::{Assigner, DriveOption, GreedyAssigner, RawCapacity, Signup, WeekId};
///
/// let epoch = DateTime::<Utc>::UNIX_EPOCH;
/// let signups = vec![
///     Signup::new("d1", "Dana", DriveOption::Yes, "Week 1", epoch)
///         .with_location("Tower A")
///         .with_capacity(RawCapacity::from(2)),
///     Signup::new("r1", "Rui", DriveOption::No, "Week 1", epoch).with_location("Tower B"),
/// ];
///
/// let result = GreedyAssigner::default().assign(&signups, &WeekId::new("Week 1"));
/// assert_eq!(result.assignments().len(), 1);
/// assert!(result.unassigned_riders().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyAssigner {
    locality: LocalityTable,
}

impl GreedyAssigner {
    /// Construct a matcher using a custom locality table.
    #[must_use]
    pub const fn new(locality: LocalityTable) -> Self {
        Self { locality }
    }

    fn fill_car(&self, car: &mut CarpoolAssignment, pool: &mut Vec<&Signup>) {
        let home = car.driver().location.clone();
        take_matching(car, pool, |rider| rider.location == home);
        take_matching(car, pool, |rider| {
            self.locality.compatible(&rider.location, &home)
        });
        take_matching(car, pool, |_| true);
    }
}

impl Assigner for GreedyAssigner {
    fn assign(&self, signups: &[Signup], week: &WeekId) -> AssignmentResult {
        let weekly: Vec<&Signup> = signups
            .iter()
            .filter(|signup| signup.afterevent_week == *week)
            .collect();

        let mut drivers: Vec<(u32, &Signup)> = weekly
            .iter()
            .filter(|signup| signup.can_drive == DriveOption::Yes)
            .filter_map(|signup| match signup.seats() {
                Some(seats) => Some((seats, *signup)),
                None => {
                    log::debug!(
                        "skipping driver {} ({}): no usable capacity",
                        signup.id,
                        signup.name
                    );
                    None
                }
            })
            .collect();
        // Stable sorts keep submission order among equals.
        drivers.sort_by(|(lhs, _), (rhs, _)| rhs.cmp(lhs));

        let mut pool: Vec<&Signup> = weekly
            .iter()
            .copied()
            .filter(|signup| signup.is_rider())
            .collect();
        pool.sort_by_key(|rider| rider.submitted_at);

        let mut cars = Vec::with_capacity(drivers.len());
        for (_, driver) in drivers {
            let Some(mut car) = CarpoolAssignment::new(driver.clone()) else {
                continue;
            };
            self.fill_car(&mut car, &mut pool);
            cars.push(car);
        }

        let unassigned: Vec<Signup> = pool.into_iter().cloned().collect();
        let overflow_message = overflow_message(&cars, unassigned.len());
        if let Some(message) = &overflow_message {
            log::info!("week {week}: {message}");
        }
        AssignmentResult::from_valid_parts(cars, unassigned, overflow_message)
    }
}

/// Assign riders for `week` using the built-in locality table.
///
/// # Examples
/// ```
/// use carpool_core::{WeekId, assign};
///
/// let result = assign(&[], &WeekId::new("Fall Week 1"));
/// assert!(result.assignments().is_empty());
/// ```
#[must_use]
pub fn assign(signups: &[Signup], week: &WeekId) -> AssignmentResult {
    GreedyAssigner::default().assign(signups, week)
}

/// Move riders accepted by `accept` from the pool into the car, in pool
/// order, until the car is full.
fn take_matching<F>(car: &mut CarpoolAssignment, pool: &mut Vec<&Signup>, accept: F)
where
    F: Fn(&Signup) -> bool,
{
    let mut index = 0;
    while car.has_space() {
        let Some(rider) = pool.get(index).copied() else {
            break;
        };
        if !accept(rider) {
            index += 1;
            continue;
        }
        if car.push_rider(rider.clone()).is_err() {
            break;
        }
        pool.remove(index);
    }
}

fn overflow_message(cars: &[CarpoolAssignment], unmet: usize) -> Option<String> {
    if unmet == 0 {
        return None;
    }
    let riders = if unmet == 1 { "rider" } else { "riders" };
    if cars.is_empty() {
        return Some(format!(
            "{unmet} {riders} could not be placed because no drivers signed up; \
             find drivers for this week."
        ));
    }
    let names = cars
        .iter()
        .map(|car| car.driver().name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "{unmet} {riders} could not be placed with the current drivers ({names}); \
         find more capacity."
    ))
}
