//! Hazard categories and the category index.
//!
//! The [`CategoryIndex`] is derived once from the record store and lists an
//! implicit "all" entry followed by every category present in the data, in the
//! order each category is first seen.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::HazardRecord;

/// Display names for the categories the bundled dataset uses.
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("electrical", "Electrical"),
    ("height", "Working at Height"),
    ("asbestos", "Asbestos"),
    ("structural", "Structural"),
    ("fire", "Fire & Explosion"),
    ("manual", "Manual Handling"),
    ("environmental", "Environmental"),
    ("people", "People & Behaviour"),
    ("chemical", "Chemical & COSHH"),
    ("confined", "Confined Spaces"),
    ("tools", "Tools & Equipment"),
];

/// The reserved identifier of the implicit "all" entry.
pub const ALL: &str = "all";

/// Identifier of a hazard category, e.g. `electrical`.
///
/// Category identifiers are normalised to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    /// Creates a category identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCategoryError`] if the identifier is blank or is the
    /// reserved word `all`.
    pub fn new(s: impl Into<String>) -> Result<Self, InvalidCategoryError> {
        let s = s.into();
        let normalised = s.trim().to_lowercase();
        if normalised.is_empty() || normalised == ALL {
            return Err(InvalidCategoryError(s));
        }
        Ok(Self(normalised))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the human-readable name of the category.
    ///
    /// Categories without a registered name fall back to the identifier with
    /// its first character capitalised.
    #[must_use]
    pub fn display_name(&self) -> String {
        DISPLAY_NAMES
            .iter()
            .find(|(id, _)| *id == self.0)
            .map_or_else(|| capitalise(&self.0), |(_, name)| (*name).to_string())
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl TryFrom<String> for CategoryId {
    type Error = InvalidCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

impl FromStr for CategoryId {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CategoryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for a blank or reserved category identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid category '{0}': must be non-empty and must not be 'all'")]
pub struct InvalidCategoryError(String);

/// Which records are visible while browsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every record.
    #[default]
    All,
    /// Only records in the given category.
    Category(CategoryId),
}

impl CategoryFilter {
    /// Returns `true` if the record passes the filter.
    #[must_use]
    pub fn matches(&self, record: &HazardRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(id) => record.category == *id,
        }
    }

    /// Returns the filter identifier, `all` for [`CategoryFilter::All`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Category(id) => id.as_str(),
        }
    }

    /// Returns the human-readable name of the filter.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::All => "All Hazards".to_string(),
            Self::Category(id) => id.display_name(),
        }
    }
}

impl From<CategoryId> for CategoryFilter {
    fn from(id: CategoryId) -> Self {
        Self::Category(id)
    }
}

impl FromStr for CategoryFilter {
    type Err = InvalidCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Self::All)
        } else {
            CategoryId::new(s).map(Self::Category)
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = InvalidCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the category index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    /// The filter selecting this entry's records.
    pub id: CategoryFilter,
    /// Human-readable label.
    pub name: String,
    /// Number of records in the entry.
    pub count: usize,
}

/// Category list with record counts, derived from a set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    /// "all" first, then categories in first-seen order.
    entries: Vec<CategoryEntry>,
}

impl CategoryIndex {
    /// Builds the index from records in store order.
    pub fn build<'a>(records: impl IntoIterator<Item = &'a HazardRecord>) -> Self {
        let mut entries = vec![CategoryEntry {
            id: CategoryFilter::All,
            name: CategoryFilter::All.display_name(),
            count: 0,
        }];
        let mut positions: HashMap<&CategoryId, usize> = HashMap::new();

        for record in records {
            entries[0].count += 1;
            let position = *positions.entry(&record.category).or_insert_with(|| {
                entries.push(CategoryEntry {
                    id: CategoryFilter::Category(record.category.clone()),
                    name: record.category.display_name(),
                    count: 0,
                });
                entries.len() - 1
            });
            entries[position].count += 1;
        }

        Self { entries }
    }

    /// All entries, "all" first.
    #[must_use]
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    /// Looks up the entry for a filter.
    #[must_use]
    pub fn get(&self, filter: &CategoryFilter) -> Option<&CategoryEntry> {
        self.entries.iter().find(|entry| entry.id == *filter)
    }

    /// Total number of records indexed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries[0].count
    }

    /// Iterates over the entries, "all" first.
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a CategoryIndex {
    type Item = &'a CategoryEntry;
    type IntoIter = std::slice::Iter<'a, CategoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
