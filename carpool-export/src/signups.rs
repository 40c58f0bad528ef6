//! Raw signup export.

use carpool_core::Signup;
use chrono::SecondsFormat;

use crate::{ExportError, finish, writer};

const HEADER: [&str; 7] = [
    "Name",
    "Phone",
    "Can Drive",
    "Capacity",
    "Location",
    "Week",
    "Submitted At",
];

/// Render one row per signup, after a header row.
///
/// Columns are name, phone, drive option, capacity (empty when absent),
/// location, week and submission time in RFC 3339.
///
/// # Errors
/// Returns [`ExportError`] if the CSV writer fails.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use carpool_core::{DriveOption, Signup};
/// use carpool_export::signups_csv;
///
/// let signup = Signup::new("r1", "Rui \"Ace\"", DriveOption::No, "Fall Week 1", DateTime::<Utc>::UNIX_EPOCH);
/// let csv = signups_csv(&[signup])?;
/// assert!(csv.ends_with(
///     "\"Rui \"\"Ace\"\"\",\"\",\"no\",\"\",\"\",\"Fall Week 1\",\"1970-01-01T00:00:00.000Z\"\n"
/// ));
/// # Ok::<(), carpool_export::ExportError>(())
/// ```
pub fn signups_csv(signups: &[Signup]) -> Result<String, ExportError> {
    let mut out = writer();
    out.write_record(HEADER)?;
    for signup in signups {
        let capacity = signup
            .capacity
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let submitted = signup
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        out.write_record([
            signup.name.as_str(),
            signup.phone.as_str(),
            signup.can_drive.as_str(),
            capacity.as_str(),
            signup.location.as_str(),
            signup.afterevent_week.as_str(),
            submitted.as_str(),
        ])?;
    }
    finish(out)
}
