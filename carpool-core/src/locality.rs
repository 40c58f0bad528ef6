//! Coarse grouping of residence strings.
//!
//! Drivers prefer riders from the same building, then from the same
//! [`LocationGroup`]. The grouping is configuration: [`LocalityTable`] maps
//! raw location strings to groups and sends anything unknown to
//! [`LocationGroup::Other`].
//!
//! # Examples
//! ```
//! use carpool_core::{LocalityTable, LocationGroup};
//!
//! let table = LocalityTable::default();
//! assert_eq!(table.group_of("Tower B"), LocationGroup::Towers);
//! assert!(table.compatible("Tower A", "tower c"));
//! assert!(!table.compatible("Tower A", "Plaza"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A bucket of nearby residences.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationGroup {
    /// The residential quads.
    Quad,
    /// The tower blocks.
    Towers,
    /// The student village.
    Village,
    /// Housing away from campus.
    OffCampus,
    /// A site-specific group defined in configuration.
    Custom(String),
    /// Catch-all for unknown locations.
    Other,
}

impl LocationGroup {
    /// Resolve a configured group name.
    ///
    /// Built-in names match case-insensitively; anything else becomes
    /// [`LocationGroup::Custom`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match normalise(name).as_str() {
            "quad" => Self::Quad,
            "towers" => Self::Towers,
            "village" => Self::Village,
            "offcampus" | "off campus" | "off-campus" => Self::OffCampus,
            "other" | "" => Self::Other,
            _ => Self::Custom(name.trim().to_owned()),
        }
    }

    /// Display name of the group.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Quad => "Quad",
            Self::Towers => "Towers",
            Self::Village => "Village",
            Self::OffCampus => "Off Campus",
            Self::Custom(name) => name,
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for LocationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in grouping used when no table is configured.
const DEFAULT_GROUPS: [(LocationGroup, &[&str]); 4] = [
    (
        LocationGroup::Quad,
        &["Quad", "North Quad", "South Quad", "East Quad", "West Quad"],
    ),
    (
        LocationGroup::Towers,
        &["Towers", "Tower A", "Tower B", "Tower C"],
    ),
    (
        LocationGroup::Village,
        &["Village", "Village North", "Village South"],
    ),
    (
        LocationGroup::OffCampus,
        &["Off Campus", "Downtown", "Apartments"],
    ),
];

/// Lookup table from raw location strings to [`LocationGroup`]s.
///
/// Lookups trim surrounding whitespace and ignore case. A location listed
/// under several groups belongs to the last one added.
///
/// Tables deserialise from a map of group name to member locations:
///
/// ```
/// use carpool_core::{LocalityTable, LocationGroup};
///
/// let table: LocalityTable =
///     serde_json::from_str(r#"{"Science": ["Lab Row", "Observatory"]}"#).unwrap();
/// assert_eq!(
///     table.group_of("observatory"),
///     LocationGroup::Custom("Science".into())
/// );
/// assert_eq!(table.group_of("Tower A"), LocationGroup::Other);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "BTreeMap<String, Vec<String>>", into = "BTreeMap<String, Vec<String>>")]
pub struct LocalityTable {
    lookup: HashMap<String, (LocationGroup, String)>,
}

impl LocalityTable {
    /// Construct a table that places every location in
    /// [`LocationGroup::Other`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lookup: HashMap::new(),
        }
    }

    /// Add locations to a group while returning `self` for chaining.
    #[must_use]
    pub fn with_group<I, S>(mut self, group: &LocationGroup, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for location in locations {
            let raw = location.as_ref();
            self.lookup
                .insert(normalise(raw), (group.clone(), raw.trim().to_owned()));
        }
        self
    }

    /// Classify a raw location string.
    #[must_use]
    pub fn group_of(&self, location: &str) -> LocationGroup {
        self.lookup
            .get(&normalise(location))
            .map_or(LocationGroup::Other, |(group, _)| group.clone())
    }

    /// Whether two locations fall in the same group.
    ///
    /// Two unknown locations are compatible because both land in the
    /// catch-all.
    #[must_use]
    pub fn compatible(&self, a: &str, b: &str) -> bool {
        self.group_of(a) == self.group_of(b)
    }

    /// Number of known location strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Whether the table knows no locations at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

impl Default for LocalityTable {
    fn default() -> Self {
        DEFAULT_GROUPS
            .iter()
            .fold(Self::empty(), |table, (group, locations)| {
                table.with_group(group, locations.iter())
            })
    }
}

impl From<BTreeMap<String, Vec<String>>> for LocalityTable {
    fn from(groups: BTreeMap<String, Vec<String>>) -> Self {
        groups.iter().fold(Self::empty(), |table, (name, locations)| {
            table.with_group(&LocationGroup::from_name(name), locations)
        })
    }
}

impl From<LocalityTable> for BTreeMap<String, Vec<String>> {
    fn from(table: LocalityTable) -> Self {
        let mut groups: Self = BTreeMap::new();
        for (group, raw) in table.lookup.into_values() {
            groups.entry(group.as_str().to_owned()).or_default().push(raw);
        }
        for locations in groups.values_mut() {
            locations.sort();
        }
        groups
    }
}

/// Classify a location with the built-in table.
#[must_use]
pub fn group_of(location: &str) -> LocationGroup {
    let key = normalise(location);
    DEFAULT_GROUPS
        .iter()
        .find(|(_, locations)| locations.iter().any(|known| normalise(known) == key))
        .map_or(LocationGroup::Other, |(group, _)| group.clone())
}

/// Whether two locations share a group in the built-in table.
#[must_use]
pub fn compatible(a: &str, b: &str) -> bool {
    group_of(a) == group_of(b)
}

fn normalise(location: &str) -> String {
    location.trim().to_lowercase()
}
