//! The read-only store of hazard records.
//!
//! The [`HazardStore`] is built once at startup, either from the dataset
//! bundled into the binary or from a JSON file, and is never mutated
//! afterwards.

use std::{collections::HashMap, io, path::Path};

use thiserror::Error;
use tracing::instrument;

use crate::domain::{CategoryFilter, HazardId, HazardRecord};

/// The dataset shipped with the crate.
const BUNDLED: &str = include_str!("../../data/hazards.json");

/// Errors raised while building a [`HazardStore`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        /// The file being read.
        path: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The dataset is not valid JSON, or a record is invalid.
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two records share an id.
    #[error("duplicate hazard id '{0}'")]
    DuplicateId(HazardId),
}

/// An immutable, ordered collection of hazard records with an id index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HazardStore {
    /// Records in dataset order.
    records: Vec<HazardRecord>,

    /// Position of each record in `records`.
    index: HashMap<HazardId, usize>,
}

impl HazardStore {
    /// Builds a store from records in dataset order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::DuplicateId`] if two records share an id.
    pub fn from_records(records: Vec<HazardRecord>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(LoadError::DuplicateId(record.id.clone()));
            }
        }
        Ok(Self { records, index })
    }

    /// Parses a JSON array of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a record is invalid, or ids
    /// are not unique.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let records: Vec<HazardRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Loads a JSON dataset from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let store = Self::from_json(&json)?;
        tracing::debug!("Loaded {} hazard(s) from {}", store.len(), path.display());
        Ok(store)
    }

    /// The dataset bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled dataset is invalid.
    pub fn bundled() -> Result<Self, LoadError> {
        Self::from_json(BUNDLED)
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &HazardId) -> Option<&HazardRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Returns `true` if a record with this id exists.
    #[must_use]
    pub fn contains(&self, id: &HazardId) -> bool {
        self.index.contains_key(id)
    }

    /// All records in dataset order.
    pub fn iter(&self) -> std::slice::Iter<'_, HazardRecord> {
        self.records.iter()
    }

    /// Records passing the filter, in dataset order.
    pub fn in_category<'a>(
        &'a self,
        filter: &'a CategoryFilter,
    ) -> impl Iterator<Item = &'a HazardRecord> + 'a {
        self.records.iter().filter(move |record| filter.matches(record))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a HazardStore {
    type Item = &'a HazardRecord;
    type IntoIter = std::slice::Iter<'a, HazardRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::domain::{CategoryIndex, RiskRating};

    const TWO: &str = r#"[
        {"id": "h1", "category": "electrical", "hazard": "Electric shock",
         "consequence": "Burns", "riskRating": 16},
        {"id": "h2", "category": "height", "hazard": "Fall from height",
         "consequence": "Fractures", "riskRating": 9}
    ]"#;

    #[test]
    fn from_json_keeps_order_and_indexes() {
        let store = HazardStore::from_json(TWO).unwrap();

        assert_eq!(store.len(), 2);
        let ids: Vec<_> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["h1", "h2"]);

        let h2 = store.get(&HazardId::new("h2").unwrap()).unwrap();
        assert_eq!(h2.risk_rating, RiskRating::new(9).unwrap());
        assert!(!store.contains(&HazardId::new("h3").unwrap()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": "h1", "category": "fire", "hazard": "a", "consequence": "b", "riskRating": 1},
            {"id": "h1", "category": "fire", "hazard": "c", "consequence": "d", "riskRating": 2}
        ]"#;
        assert!(matches!(
            HazardStore::from_json(json),
            Err(LoadError::DuplicateId(id)) if id.as_str() == "h1"
        ));
    }

    #[test]
    fn invalid_records_are_rejected() {
        let bad_rating =
            r#"[{"id": "h1", "category": "fire", "hazard": "a", "consequence": "b", "riskRating": 0}]"#;
        let blank_id =
            r#"[{"id": " ", "category": "fire", "hazard": "a", "consequence": "b", "riskRating": 3}]"#;

        assert!(matches!(HazardStore::from_json(bad_rating), Err(LoadError::Parse(_))));
        assert!(matches!(HazardStore::from_json(blank_id), Err(LoadError::Parse(_))));
    }

    #[test]
    fn in_category_filters() {
        let store = HazardStore::from_json(TWO).unwrap();
        let height: CategoryFilter = "height".parse().unwrap();

        let ids: Vec<_> = store.in_category(&height).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["h2"]);
        assert_eq!(store.in_category(&CategoryFilter::All).count(), 2);
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO.as_bytes()).unwrap();

        assert_eq!(HazardStore::load(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            HazardStore::load(&tmp.path().join("missing.json")),
            Err(LoadError::Io { .. })
        ));
    }

    #[test]
    fn bundled_dataset_is_valid() {
        let store = HazardStore::bundled().unwrap();
        assert!(!store.is_empty());

        let index = CategoryIndex::build(&store);
        assert_eq!(index.total(), store.len());
        assert!(index.entries().len() > 2);
    }
}
