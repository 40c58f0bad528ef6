//! Cars, rosters and the per-week assignment aggregate.
//!
//! [`CarpoolAssignment`] derives its used capacity from the roster length, so
//! the seat count can never drift from the riders actually in the car.
//! [`AssignmentResult`] keeps its containers private and only exposes
//! mutations that preserve the capacity and uniqueness invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Signup, SignupId};

/// Errors raised when assembling assignments from untrusted parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    /// The driver offers no usable seats.
    #[error("driver {driver} has no usable capacity")]
    DriverWithoutSeats {
        /// Offending driver.
        driver: SignupId,
    },
    /// A car holds more people than its capacity.
    #[error("car of driver {driver} holds {used} people but has {total} seats")]
    OverCapacity {
        /// Driver of the overfull car.
        driver: SignupId,
        /// People in the car, driver included.
        used: usize,
        /// Seats offered by the driver.
        total: u32,
    },
    /// The same signup appears in more than one place.
    #[error("signup {id} appears more than once")]
    Duplicate {
        /// Repeated signup.
        id: SignupId,
    },
}

/// Where a rider currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The car at this index in [`AssignmentResult::assignments`].
    Car(usize),
    /// The unassigned pool.
    Unassigned,
}

/// One driver together with the riders placed in their car.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use carpool_core::{CarpoolAssignment, DriveOption, RawCapacity, Signup};
///
/// let driver = Signup::new("d1", "Dana", DriveOption::Yes, "Fall Week 1", DateTime::<Utc>::UNIX_EPOCH)
///     .with_capacity(RawCapacity::from(3));
/// let car = CarpoolAssignment::new(driver).expect("driver has seats");
///
/// assert_eq!(car.total_capacity(), 3);
/// assert_eq!(car.used_capacity(), 1);
/// assert!(car.has_space());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CarRecord", into = "CarRecord")]
pub struct CarpoolAssignment {
    driver: Signup,
    riders: Vec<Signup>,
    total_capacity: u32,
}

impl CarpoolAssignment {
    /// Open an empty car for `driver`.
    ///
    /// Returns `None` when the driver offers no usable seats.
    #[must_use]
    pub fn new(driver: Signup) -> Option<Self> {
        let total_capacity = driver.seats()?;
        Some(Self {
            driver,
            riders: Vec::new(),
            total_capacity,
        })
    }

    /// The driver of this car.
    #[must_use]
    pub const fn driver(&self) -> &Signup {
        &self.driver
    }

    /// Riders in pickup insertion order.
    #[must_use]
    pub fn riders(&self) -> &[Signup] {
        &self.riders
    }

    /// Seats offered by the driver, including their own.
    #[must_use]
    pub const fn total_capacity(&self) -> u32 {
        self.total_capacity
    }

    /// Occupied seats: the driver plus every rider.
    #[must_use]
    pub fn used_capacity(&self) -> usize {
        self.riders.len() + 1
    }

    /// Whether another rider fits.
    #[must_use]
    pub fn has_space(&self) -> bool {
        u32::try_from(self.used_capacity()).is_ok_and(|used| used < self.total_capacity)
    }

    /// Whether `id` is the driver or one of the riders.
    #[must_use]
    pub fn carries(&self, id: &SignupId) -> bool {
        self.driver.id == *id || self.position_of(id).is_some()
    }

    /// Add a rider, handing it back when the car is full.
    pub(crate) fn push_rider(&mut self, rider: Signup) -> Result<(), Signup> {
        if self.has_space() {
            self.riders.push(rider);
            Ok(())
        } else {
            Err(rider)
        }
    }

    pub(crate) fn remove_rider(&mut self, id: &SignupId) -> Option<Signup> {
        self.position_of(id).map(|index| self.riders.remove(index))
    }

    fn position_of(&self, id: &SignupId) -> Option<usize> {
        self.riders.iter().position(|rider| rider.id == *id)
    }
}

/// Stored shape of a car; `usedCapacity` is written for readers and ignored
/// on the way back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CarRecord {
    driver: Signup,
    #[serde(default)]
    riders: Vec<Signup>,
    #[serde(default)]
    total_capacity: u32,
    #[serde(default)]
    used_capacity: usize,
}

impl From<CarpoolAssignment> for CarRecord {
    fn from(car: CarpoolAssignment) -> Self {
        let used_capacity = car.used_capacity();
        Self {
            driver: car.driver,
            riders: car.riders,
            total_capacity: car.total_capacity,
            used_capacity,
        }
    }
}

impl TryFrom<CarRecord> for CarpoolAssignment {
    type Error = AssignmentError;

    fn try_from(record: CarRecord) -> Result<Self, Self::Error> {
        let driver_id = record.driver.id.clone();
        let mut car = Self::new(record.driver)
            .ok_or(AssignmentError::DriverWithoutSeats { driver: driver_id })?;
        let total = car.total_capacity;
        let used = record.riders.len() + 1;
        for rider in record.riders {
            car.push_rider(rider)
                .map_err(|_| AssignmentError::OverCapacity {
                    driver: car.driver.id.clone(),
                    used,
                    total,
                })?;
        }
        Ok(car)
    }
}

/// The assignment for one week: cars plus riders left without a seat.
///
/// # Examples
/// ```
/// use carpool_core::AssignmentResult;
///
/// let empty = AssignmentResult::empty();
/// assert!(empty.assignments().is_empty());
/// assert!(empty.unassigned_riders().is_empty());
/// assert!(empty.overflow_message().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ResultRecord", into = "ResultRecord")]
pub struct AssignmentResult {
    assignments: Vec<CarpoolAssignment>,
    unassigned_riders: Vec<Signup>,
    overflow_message: Option<String>,
}

impl AssignmentResult {
    /// A result with no cars and nobody waiting.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a result from untrusted parts.
    ///
    /// # Errors
    /// Returns [`AssignmentError::Duplicate`] when a signup appears in more
    /// than one place, whether as driver, rider or unassigned rider.
    pub fn from_parts(
        assignments: Vec<CarpoolAssignment>,
        unassigned_riders: Vec<Signup>,
        overflow_message: Option<String>,
    ) -> Result<Self, AssignmentError> {
        let mut seen = HashSet::new();
        let people = assignments
            .iter()
            .flat_map(|car| std::iter::once(car.driver()).chain(car.riders()))
            .chain(&unassigned_riders);
        for person in people {
            if !seen.insert(&person.id) {
                return Err(AssignmentError::Duplicate {
                    id: person.id.clone(),
                });
            }
        }
        Ok(Self::from_valid_parts(
            assignments,
            unassigned_riders,
            overflow_message,
        ))
    }

    pub(crate) const fn from_valid_parts(
        assignments: Vec<CarpoolAssignment>,
        unassigned_riders: Vec<Signup>,
        overflow_message: Option<String>,
    ) -> Self {
        Self {
            assignments,
            unassigned_riders,
            overflow_message,
        }
    }

    /// Cars in creation order (largest capacity first).
    #[must_use]
    pub fn assignments(&self) -> &[CarpoolAssignment] {
        &self.assignments
    }

    /// Riders that could not be placed.
    #[must_use]
    pub fn unassigned_riders(&self) -> &[Signup] {
        &self.unassigned_riders
    }

    /// Prompt for the organiser when demand exceeded capacity.
    #[must_use]
    pub fn overflow_message(&self) -> Option<&str> {
        self.overflow_message.as_deref()
    }

    /// The car at `index`, if any.
    #[must_use]
    pub fn car(&self, index: usize) -> Option<&CarpoolAssignment> {
        self.assignments.get(index)
    }

    /// Riders across all cars and the unassigned pool; drivers excluded.
    #[must_use]
    pub fn rider_count(&self) -> usize {
        self.assignments
            .iter()
            .map(|car| car.riders().len())
            .sum::<usize>()
            + self.unassigned_riders.len()
    }

    /// Find the container holding rider `id`. Drivers are not riders.
    #[must_use]
    pub fn locate_rider(&self, id: &SignupId) -> Option<Slot> {
        self.assignments
            .iter()
            .position(|car| car.position_of(id).is_some())
            .map(Slot::Car)
            .or_else(|| {
                self.unassigned_riders
                    .iter()
                    .any(|rider| rider.id == *id)
                    .then_some(Slot::Unassigned)
            })
    }

    /// Find the container holding anyone with `id`, driver or rider.
    #[must_use]
    pub fn locate(&self, id: &SignupId) -> Option<Slot> {
        self.assignments
            .iter()
            .position(|car| car.carries(id))
            .map(Slot::Car)
            .or_else(|| self.locate_rider(id))
    }

    pub(crate) fn take_rider(&mut self, id: &SignupId, slot: Slot) -> Option<Signup> {
        match slot {
            Slot::Car(index) => self
                .assignments
                .get_mut(index)
                .and_then(|car| car.remove_rider(id)),
            Slot::Unassigned => {
                let index = self
                    .unassigned_riders
                    .iter()
                    .position(|rider| rider.id == *id)?;
                Some(self.unassigned_riders.remove(index))
            }
        }
    }

    /// Seat a rider in car `index`, handing it back when the car is full or
    /// missing.
    pub(crate) fn seat_in_car(&mut self, index: usize, rider: Signup) -> Result<(), Signup> {
        match self.assignments.get_mut(index) {
            Some(car) => car.push_rider(rider),
            None => Err(rider),
        }
    }

    pub(crate) fn push_unassigned(&mut self, rider: Signup) {
        self.unassigned_riders.push(rider);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    #[serde(default)]
    assignments: Vec<CarpoolAssignment>,
    #[serde(default)]
    unassigned_riders: Vec<Signup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overflow_message: Option<String>,
}

impl From<AssignmentResult> for ResultRecord {
    fn from(result: AssignmentResult) -> Self {
        Self {
            assignments: result.assignments,
            unassigned_riders: result.unassigned_riders,
            overflow_message: result.overflow_message,
        }
    }
}

impl TryFrom<ResultRecord> for AssignmentResult {
    type Error = AssignmentError;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        Self::from_parts(
            record.assignments,
            record.unassigned_riders,
            record.overflow_message,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{driver, rider};
    use rstest::rstest;

    #[rstest]
    fn full_car_hands_rider_back() {
        let mut car = CarpoolAssignment::new(driver("d1", "Tower A", 2, 0)).unwrap();
        assert!(car.push_rider(rider("r1", "Tower A", 1)).is_ok());
        let rejected = car.push_rider(rider("r2", "Tower A", 2)).unwrap_err();
        assert_eq!(rejected.id, SignupId::new("r2"));
        assert_eq!(car.used_capacity(), 2);
        assert!(!car.has_space());
    }

    #[rstest]
    fn driver_without_seats_cannot_open_a_car() {
        let mut signup = driver("d1", "Tower A", 2, 0);
        signup.capacity = None;
        assert!(CarpoolAssignment::new(signup).is_none());
    }

    #[rstest]
    fn used_capacity_is_rederived_on_load() {
        let json = r#"{
            "driver": {"id": "d1", "name": "Dee", "canDrive": "yes", "location": "Tower A",
                       "aftereventWeek": "Fall Week 1", "submittedAt": "2024-09-01T00:00:00Z",
                       "capacity": 4},
            "riders": [],
            "totalCapacity": 4,
            "usedCapacity": 3
        }"#;
        let car: CarpoolAssignment = serde_json::from_str(json).expect("valid car");
        assert_eq!(car.used_capacity(), 1);
    }

    #[rstest]
    fn overfull_cars_are_rejected_on_load() {
        let mut car = CarpoolAssignment::new(driver("d1", "Tower A", 2, 0)).unwrap();
        car.push_rider(rider("r1", "Tower A", 1)).unwrap();
        let mut value = serde_json::to_value(&car).expect("serialise car");
        let second = serde_json::to_value(rider("r2", "Tower A", 2)).expect("serialise rider");
        value["riders"].as_array_mut().unwrap().push(second);
        let err = serde_json::from_value::<CarpoolAssignment>(value).unwrap_err();
        assert!(err.to_string().contains("holds 3 people but has 2 seats"));
    }

    #[rstest]
    fn from_parts_rejects_duplicates() {
        let mut car = CarpoolAssignment::new(driver("d1", "Tower A", 3, 0)).unwrap();
        car.push_rider(rider("r1", "Tower A", 1)).unwrap();
        let err = AssignmentResult::from_parts(vec![car], vec![rider("r1", "Tower A", 1)], None)
            .unwrap_err();
        assert_eq!(
            err,
            AssignmentError::Duplicate {
                id: SignupId::new("r1")
            }
        );
    }

    #[rstest]
    fn locate_distinguishes_drivers_from_riders() {
        let mut car = CarpoolAssignment::new(driver("d1", "Tower A", 3, 0)).unwrap();
        car.push_rider(rider("r1", "Tower A", 1)).unwrap();
        let result =
            AssignmentResult::from_parts(vec![car], vec![rider("r2", "Plaza", 2)], None).unwrap();

        assert_eq!(result.locate_rider(&"r1".into()), Some(Slot::Car(0)));
        assert_eq!(result.locate_rider(&"r2".into()), Some(Slot::Unassigned));
        assert_eq!(result.locate_rider(&"d1".into()), None);
        assert_eq!(result.locate(&"d1".into()), Some(Slot::Car(0)));
        assert_eq!(result.locate(&"nobody".into()), None);
        assert_eq!(result.rider_count(), 2);
    }
}
