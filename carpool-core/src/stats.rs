//! Aggregate counts for displaying an assignment.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::AssignmentResult;

/// A percentage rounded half-up to one decimal place.
///
/// Ratios with a zero denominator have no value and render as `"0"`.
///
/// # Examples
/// ```
/// use carpool_core::Percentage;
///
/// assert_eq!(Percentage::from_ratio(2, 3).to_string(), "66.7");
/// assert_eq!(Percentage::from_ratio(0, 4).to_string(), "0.0");
/// assert_eq!(Percentage::from_ratio(0, 0).to_string(), "0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage {
    tenths: Option<u64>,
}

impl Percentage {
    /// Compute `part / whole` as a percentage.
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "percentages are rounded to tenths in fixed point"
    )]
    #[must_use]
    pub fn from_ratio(part: usize, whole: usize) -> Self {
        let (Ok(numerator), Ok(denominator)) = (u64::try_from(part), u64::try_from(whole)) else {
            return Self::default();
        };
        if denominator == 0 {
            return Self::default();
        }
        let scaled = numerator
            .saturating_mul(1000)
            .saturating_add(denominator / 2);
        Self {
            tenths: Some(scaled / denominator),
        }
    }

    /// The value in tenths of a percent, or `None` when undefined.
    #[must_use]
    pub const fn tenths(self) -> Option<u64> {
        self.tenths
    }
}

impl fmt::Display for Percentage {
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "tenths are split into whole and fractional digits"
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tenths {
            Some(tenths) => write!(f, "{}.{}", tenths / 10, tenths % 10),
            None => f.write_str("0"),
        }
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Headline numbers for an [`AssignmentResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    /// Everyone taking part: assigned plus unassigned.
    pub total_people: usize,
    /// Drivers plus the riders seated in their cars.
    pub assigned_people: usize,
    /// Riders left without a seat.
    pub unassigned_people: usize,
    /// Share of people with a seat.
    pub assignment_rate: Percentage,
    /// Share of offered seats that are occupied.
    pub capacity_utilization: Percentage,
    /// Number of cars.
    pub total_drivers: usize,
}

/// Derive [`AssignmentStats`] from a result.
///
/// # Examples
/// ```
/// use carpool_core::{AssignmentResult, stats};
///
/// let summary = stats(&AssignmentResult::empty());
/// assert_eq!(summary.total_people, 0);
/// assert_eq!(summary.assignment_rate.to_string(), "0");
/// ```
#[must_use]
pub fn stats(result: &AssignmentResult) -> AssignmentStats {
    let cars = result.assignments();
    let assigned_people: usize = cars.iter().map(|car| car.used_capacity()).sum();
    let total_seats: usize = cars
        .iter()
        .map(|car| usize::try_from(car.total_capacity()).unwrap_or(usize::MAX))
        .fold(0, usize::saturating_add);
    let unassigned_people = result.unassigned_riders().len();
    let total_people = assigned_people + unassigned_people;

    AssignmentStats {
        total_people,
        assigned_people,
        unassigned_people,
        assignment_rate: Percentage::from_ratio(assigned_people, total_people),
        capacity_utilization: Percentage::from_ratio(assigned_people, total_seats),
        total_drivers: cars.len(),
    }
}
