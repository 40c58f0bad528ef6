//! Download names for the exports.

use std::fmt;
use std::str::FromStr;

use carpool_core::WeekId;
use thiserror::Error;

/// Which CSV to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Raw signups, one row each.
    Signups,
    /// The roster grid of a week's assignment.
    Assignments,
}

impl ExportKind {
    /// Lower-case name used in file names and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signups => "signups",
            Self::Assignments => "assignments",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown export kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export kind '{0}' (expected signups or assignments)")]
pub struct ExportKindParseError(pub String);

impl FromStr for ExportKind {
    type Err = ExportKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "signups" => Ok(Self::Signups),
            "assignments" => Ok(Self::Assignments),
            _ => Err(ExportKindParseError(s.to_owned())),
        }
    }
}

/// File name for downloading `kind` for `week`.
///
/// The week is lower-cased and every run of other characters becomes a
/// single `-`.
///
/// # Examples
/// ```
/// use carpool_core::WeekId;
/// use carpool_export::{ExportKind, export_file_name};
///
/// assert_eq!(
///     export_file_name(ExportKind::Assignments, &WeekId::new("Fall Week 1")),
///     "carpool-assignments-fall-week-1.csv",
/// );
/// ```
#[must_use]
pub fn export_file_name(kind: ExportKind, week: &WeekId) -> String {
    let slug = slugify(week.as_str());
    if slug.is_empty() {
        format!("carpool-{kind}.csv")
    } else {
        format!("carpool-{kind}-{slug}.csv")
    }
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
