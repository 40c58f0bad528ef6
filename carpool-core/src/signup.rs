//! Ride-sharing signups submitted for a recurring event.
//!
//! A [`Signup`] is read-only input to the engine. Capacity arrives either as
//! a number or as free text typed into a form, so it is kept raw and only
//! interpreted through [`Signup::seats`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier of a signup record.
///
/// # Examples
/// ```
/// use carpool_core::SignupId;
///
/// let id = SignupId::new("abc123");
/// assert_eq!(id.as_str(), "abc123");
/// assert_eq!(id.to_string(), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignupId(String);

impl SignupId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SignupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identifier of one event instance, e.g. `"Fall Week 3"`.
///
/// # Examples
/// ```
/// use carpool_core::WeekId;
///
/// let week = WeekId::new("Fall Week 3");
/// assert_eq!(week.as_str(), "Fall Week 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekId(String);

impl WeekId {
    /// Wrap a raw week label.
    pub fn new(week: impl Into<String>) -> Self {
        Self(week.into())
    }

    /// Borrow the week label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeekId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Whether a signup offers seats, needs one, or travels alone.
///
/// # Examples
/// ```
/// use carpool_core::DriveOption;
///
/// assert_eq!(DriveOption::SelfDrive.as_str(), "self");
/// assert_eq!("YES".parse::<DriveOption>(), Ok(DriveOption::Yes));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriveOption {
    /// Offers seats in their own car.
    Yes,
    /// Needs a seat in someone else's car.
    No,
    /// Drives themselves and takes no part in matching.
    #[serde(rename = "self")]
    SelfDrive,
}

impl DriveOption {
    /// Return the option as it appears in stored records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::SelfDrive => "self",
        }
    }
}

impl fmt::Display for DriveOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriveOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "self" => Ok(Self::SelfDrive),
            _ => Err(format!("unknown drive option '{s}'")),
        }
    }
}

/// Seat count exactly as it was submitted.
///
/// Stored records carry either a JSON number or the text typed into the
/// signup form. Neither form is validated on the way in. Any other JSON
/// shape decodes as [`RawCapacity::Unreadable`] rather than failing the
/// whole record.
///
/// # Examples
/// ```
/// use carpool_core::RawCapacity;
///
/// assert_eq!(RawCapacity::Number(4).seats(), Some(4));
/// assert_eq!(RawCapacity::Text(" 3 ".into()).seats(), Some(3));
/// assert_eq!(RawCapacity::Text("lots".into()).seats(), None);
/// assert_eq!(RawCapacity::Number(0).seats(), None);
/// assert_eq!(RawCapacity::Unreadable.seats(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawCapacity {
    /// Numeric capacity.
    Number(i64),
    /// Free-text capacity.
    Text(String),
    /// A value of some other JSON shape, such as a boolean or an object.
    /// Serialises as `null`.
    Unreadable,
}

/// Wire shapes accepted for a capacity value.
#[derive(Deserialize)]
#[serde(untagged)]
enum CapacityRecord {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl From<CapacityRecord> for RawCapacity {
    fn from(record: CapacityRecord) -> Self {
        match record {
            CapacityRecord::Integer(number) => Self::Number(number),
            // Integral floats such as `4.0` render without a fraction.
            CapacityRecord::Float(number) => {
                let rendered = number.to_string();
                rendered
                    .parse::<i64>()
                    .map_or(Self::Text(rendered), Self::Number)
            }
            CapacityRecord::Text(text) => Self::Text(text),
            CapacityRecord::Other(_) => Self::Unreadable,
        }
    }
}

impl<'de> Deserialize<'de> for RawCapacity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        CapacityRecord::deserialize(deserializer).map(Self::from)
    }
}

impl RawCapacity {
    /// Interpret the value as a positive seat count.
    ///
    /// Returns `None` for unparsable, zero or negative values.
    #[must_use]
    pub fn seats(&self) -> Option<u32> {
        let value = match self {
            Self::Number(number) => *number,
            Self::Text(text) => text.trim().parse::<i64>().ok()?,
            Self::Unreadable => return None,
        };
        u32::try_from(value).ok().filter(|seats| *seats > 0)
    }
}

impl fmt::Display for RawCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
            Self::Unreadable => Ok(()),
        }
    }
}

impl From<u32> for RawCapacity {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// One person's response to the carpool form for a given week.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use carpool_core::{DriveOption, RawCapacity, Signup};
///
/// let signup = Signup::new("s1", "Ada", DriveOption::Yes, "Fall Week 1", DateTime::<Utc>::UNIX_EPOCH)
///     .with_location("Tower A")
///     .with_capacity(RawCapacity::from(4));
///
/// assert!(signup.is_driver());
/// assert_eq!(signup.seats(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    /// Record identifier.
    pub id: SignupId,
    /// Display name.
    pub name: String,
    /// Contact number.
    #[serde(default)]
    pub phone: String,
    /// Role in the carpool.
    pub can_drive: DriveOption,
    /// Free-text residence tag.
    #[serde(default)]
    pub location: String,
    /// Event instance the signup belongs to.
    pub afterevent_week: WeekId,
    /// Submission time; earlier riders are matched first.
    pub submitted_at: DateTime<Utc>,
    /// Offered seats including the driver's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<RawCapacity>,
}

impl Signup {
    /// Construct a signup with empty contact and location details.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        can_drive: DriveOption,
        week: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SignupId::new(id),
            name: name.into(),
            phone: String::new(),
            can_drive,
            location: String::new(),
            afterevent_week: WeekId::new(week),
            submitted_at,
            capacity: None,
        }
    }

    /// Set the contact number while returning `self` for chaining.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Set the residence tag while returning `self` for chaining.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the offered capacity while returning `self` for chaining.
    #[must_use]
    pub fn with_capacity(mut self, capacity: RawCapacity) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Usable seat count, counting the driver's own seat.
    #[must_use]
    pub fn seats(&self) -> Option<u32> {
        self.capacity.as_ref().and_then(RawCapacity::seats)
    }

    /// Whether this signup can open a car: offers to drive with usable seats.
    #[must_use]
    pub fn is_driver(&self) -> bool {
        self.can_drive == DriveOption::Yes && self.seats().is_some()
    }

    /// Whether this signup needs a seat.
    #[must_use]
    pub fn is_rider(&self) -> bool {
        self.can_drive == DriveOption::No
    }
}
