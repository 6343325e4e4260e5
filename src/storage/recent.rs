//! The persisted list of recent search terms.

use tracing::instrument;

use crate::storage::kv::{read_json, write_json, KeyValueStore, StorageError};

/// The default number of terms kept.
pub const DEFAULT_LIMIT: usize = 5;

/// Most-recent-first list of distinct search terms, bounded in length.
///
/// Persistence follows the same best-effort policy as
/// [`BookmarkStore`](crate::storage::BookmarkStore).
#[derive(Debug)]
pub struct RecentSearches<S> {
    storage: S,
    key: String,
    limit: usize,
    terms: Vec<String>,
}

impl<S: KeyValueStore> RecentSearches<S> {
    /// Loads the list stored under `key`, keeping at most `limit` terms.
    ///
    /// A missing key, unreadable storage or malformed value all yield an empty
    /// list. Blank and repeated stored terms are dropped.
    #[instrument(level = "debug", skip(storage, key))]
    pub fn load(storage: S, key: impl AsRef<str>, limit: usize) -> Self {
        let key = key.as_ref().to_string();
        let stored = match read_json::<Vec<String>, _>(&storage, &key) {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                tracing::debug!("Ignoring stored recent searches: {e}");
                Vec::new()
            }
        };

        let mut terms: Vec<String> = Vec::with_capacity(limit);
        for term in stored {
            let term = term.trim();
            if term.is_empty() || terms.iter().any(|t| t == term) {
                continue;
            }
            if terms.len() == limit {
                break;
            }
            terms.push(term.to_string());
        }

        Self {
            storage,
            key,
            limit,
            terms,
        }
    }

    /// Records a search term at the front of the list.
    ///
    /// Blank terms are ignored. An existing equal term is moved to the front
    /// rather than repeated, and the list is truncated to the limit.
    pub fn record(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        self.terms.retain(|t| t != term);
        self.terms.insert(0, term.to_string());
        self.terms.truncate(self.limit);
        tracing::debug!(term, "Recorded search");
        self.save_best_effort();
    }

    /// Empties the list.
    pub fn clear(&mut self) {
        self.terms.clear();
        self.save_best_effort();
    }

    /// The terms, most recent first.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Writes the list to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or written.
    pub fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.storage, &self.key, &self.terms)
    }

    fn save_best_effort(&self) {
        // Same fire-and-forget policy as bookmarks: the list in memory stays
        // authoritative when the write fails.
        if let Err(e) = self.persist() {
            tracing::debug!("Failed to persist recent searches: {e}");
        }
    }
}
