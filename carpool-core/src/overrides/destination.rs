//! Move targets and their textual form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::SignupId;

/// Where a rider should be moved.
///
/// The textual form is `car:<index>`, `unassigned` or `rider:<id>`.
///
/// # Examples
/// ```
/// use carpool_core::Destination;
///
/// assert_eq!("car:2".parse(), Ok(Destination::Car(2)));
/// assert_eq!("unassigned".parse(), Ok(Destination::Unassigned));
/// assert_eq!("rider:r7".parse(), Ok(Destination::Rider("r7".into())));
/// assert_eq!(Destination::Car(0).to_string(), "car:0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Destination {
    /// The car at this index.
    Car(usize),
    /// The unassigned pool.
    Unassigned,
    /// Whichever container currently holds this person.
    Rider(SignupId),
}

/// Errors returned when parsing a [`Destination`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DestinationParseError {
    /// The car index was not a non-negative integer.
    #[error("invalid car index '{0}'")]
    InvalidCarIndex(String),
    /// The rider id was empty.
    #[error("rider destination needs an id")]
    MissingRiderId,
    /// The text matched no destination form.
    #[error("unknown destination '{0}' (expected car:<index>, unassigned or rider:<id>)")]
    Unknown(String),
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Car(index) => write!(f, "car:{index}"),
            Self::Unassigned => f.write_str("unassigned"),
            Self::Rider(id) => write!(f, "rider:{id}"),
        }
    }
}

impl FromStr for Destination {
    type Err = DestinationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unassigned") {
            return Ok(Self::Unassigned);
        }
        if let Some(index) = trimmed.strip_prefix("car:") {
            return index
                .trim()
                .parse()
                .map(Self::Car)
                .map_err(|_| DestinationParseError::InvalidCarIndex(index.to_owned()));
        }
        if let Some(raw_id) = trimmed.strip_prefix("rider:") {
            let id = raw_id.trim();
            if id.is_empty() {
                return Err(DestinationParseError::MissingRiderId);
            }
            return Ok(Self::Rider(SignupId::new(id)));
        }
        Err(DestinationParseError::Unknown(trimmed.to_owned()))
    }
}
