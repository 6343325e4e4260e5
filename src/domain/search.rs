//! Free-text search over hazard records.
//!
//! Matching is a case-insensitive substring test against the hazard label,
//! the consequence, and the category id. Results keep store order and are
//! capped, so the same query always produces the same list.

use tracing::instrument;

use crate::domain::HazardRecord;

/// The default maximum number of results returned by [`search`].
pub const DEFAULT_LIMIT: usize = 20;

/// A normalised search query.
///
/// Construction returns `None` for an empty or whitespace-only query, since
/// searching is not a way to browse every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    needle: String,
}

impl Query {
    /// Normalises raw user input into a query.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                needle: trimmed.to_lowercase(),
            })
        }
    }

    /// Returns `true` if any searchable field of the record contains the query.
    #[must_use]
    pub fn matches(&self, record: &HazardRecord) -> bool {
        [
            record.hazard.as_str(),
            record.consequence.as_str(),
            record.category.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Returns at most `limit` records matching `query`, in store order.
///
/// A blank query yields no results.
#[instrument(level = "debug", skip(records))]
pub fn search<'a>(
    records: impl IntoIterator<Item = &'a HazardRecord>,
    query: &str,
    limit: usize,
) -> Vec<&'a HazardRecord> {
    let Some(query) = Query::new(query) else {
        return Vec::new();
    };

    let results: Vec<_> = records
        .into_iter()
        .filter(|record| query.matches(record))
        .take(limit)
        .collect();

    tracing::debug!("{} result(s)", results.len());
    results
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::{CategoryId, ControlMeasures, HazardId, RiskRating};

    fn record(id: &str, category: &str, hazard: &str, consequence: &str) -> HazardRecord {
        HazardRecord {
            id: HazardId::new(id).unwrap(),
            category: CategoryId::new(category).unwrap(),
            hazard: hazard.to_string(),
            consequence: consequence.to_string(),
            risk_rating: RiskRating::new(4).unwrap(),
            control_measures: ControlMeasures::default(),
            bs7671_references: Vec::new(),
            guidance_notes: Vec::new(),
            emergency_procedures: Vec::new(),
            training_required: Vec::new(),
        }
    }

    fn sample() -> Vec<HazardRecord> {
        vec![
            record("h1", "electrical", "Electric shock", "Burns, cardiac arrest"),
            record("h2", "height", "Fall from height", "Fractures or death"),
            record("h3", "fire", "Arc flash", "Severe burns"),
            record("h4", "asbestos", "Disturbing asbestos", "Mesothelioma"),
        ]
    }

    fn ids(results: &[&HazardRecord]) -> Vec<String> {
        results.iter().map(|r| r.id.to_string()).collect()
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "spaces")]
    #[test_case("\t"; "tab")]
    fn blank_query_returns_nothing(query: &str) {
        let records = sample();
        assert!(search(&records, query, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn matches_hazard_label() {
        let records = sample();
        assert_eq!(ids(&search(&records, "electric", DEFAULT_LIMIT)), vec!["h1"]);
    }

    #[test]
    fn matches_consequence() {
        let records = sample();
        assert_eq!(
            ids(&search(&records, "burns", DEFAULT_LIMIT)),
            vec!["h1", "h3"]
        );
    }

    #[test]
    fn matches_category_id() {
        let records = sample();
        assert_eq!(ids(&search(&records, "FIRE", DEFAULT_LIMIT)), vec!["h3"]);
    }

    #[test_case("Shock", "shock")]
    #[test_case("HEIGHT", "height")]
    #[test_case("Mesothelioma", "mESOTHELIOMA")]
    fn matching_is_case_insensitive(a: &str, b: &str) {
        let records = sample();
        assert_eq!(
            search(&records, a, DEFAULT_LIMIT),
            search(&records, b, DEFAULT_LIMIT)
        );
        assert!(!search(&records, a, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let records = sample();
        assert_eq!(ids(&search(&records, "  arc ", DEFAULT_LIMIT)), vec!["h3"]);
    }

    #[test]
    fn no_match_is_an_empty_result() {
        let records = sample();
        assert!(search(&records, "radiation", DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn results_are_capped_and_keep_store_order() {
        let records: Vec<_> = (0..50)
            .map(|i| record(&format!("h{i:02}"), "electrical", "Live conductor", ""))
            .collect();

        let results = search(&records, "live", DEFAULT_LIMIT);

        assert_eq!(results.len(), DEFAULT_LIMIT);
        let expected: Vec<_> = (0..20).map(|i| format!("h{i:02}")).collect();
        assert_eq!(ids(&results), expected);
    }

    #[test]
    fn custom_limit_is_respected() {
        let records = sample();
        assert_eq!(search(&records, "h", 2).len(), 2);
        assert!(search(&records, "h", 0).is_empty());
    }
}
