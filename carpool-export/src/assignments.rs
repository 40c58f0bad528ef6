//! Per-driver roster grid.
//!
//! Each car is a column headed `"<driver> (<seats>)"` and each row holds the
//! next rider of every car. Shorter rosters are padded with empty cells. An
//! `Unassigned` column is appended only when someone is waiting, and is
//! filled independently of the cars.

use carpool_core::{AssignmentResult, Signup};

use crate::{ExportError, finish, writer};

const UNASSIGNED: &str = "Unassigned";

/// Render `result` as a column-per-car name grid.
///
/// A result with no cars and no waiting riders renders as an empty string.
///
/// # Errors
/// Returns [`ExportError`] if the CSV writer fails.
///
/// # Examples
/// ```
/// use carpool_core::AssignmentResult;
/// use carpool_export::assignments_csv;
///
/// assert_eq!(assignments_csv(&AssignmentResult::empty())?, "");
/// # Ok::<(), carpool_export::ExportError>(())
/// ```
pub fn assignments_csv(result: &AssignmentResult) -> Result<String, ExportError> {
    let mut columns: Vec<(String, &[Signup])> = result
        .assignments()
        .iter()
        .map(|car| {
            (
                format!("{} ({})", car.driver().name, car.total_capacity()),
                car.riders(),
            )
        })
        .collect();
    if !result.unassigned_riders().is_empty() {
        columns.push((UNASSIGNED.to_owned(), result.unassigned_riders()));
    }
    if columns.is_empty() {
        return Ok(String::new());
    }

    let rows = columns
        .iter()
        .map(|(_, people)| people.len())
        .max()
        .unwrap_or_default();

    let mut out = writer();
    out.write_record(columns.iter().map(|(header, _)| header.as_str()))?;
    for row in 0..rows {
        out.write_record(columns.iter().map(|(_, people)| {
            people
                .get(row)
                .map_or("", |person| person.name.as_str())
        }))?;
    }
    finish(out)
}
