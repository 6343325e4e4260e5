//! The persisted set of bookmarked hazards.

use std::collections::{BTreeSet, HashSet};

use tracing::instrument;

use crate::{
    domain::HazardId,
    storage::kv::{read_json, write_json, KeyValueStore, StorageError},
};

/// A set of bookmarked hazard ids, written back to storage on every change.
///
/// The in-memory set is the source of truth for the session. Storage is
/// best-effort: a failed read starts from an empty set and a failed write is
/// ignored.
#[derive(Debug)]
pub struct BookmarkStore<S> {
    storage: S,
    key: String,
    ids: HashSet<HazardId>,
}

impl<S: KeyValueStore> BookmarkStore<S> {
    /// Loads the bookmark set stored under `key`.
    ///
    /// A missing key, unreadable storage or malformed value all yield an empty
    /// set. Blank ids in the stored value are skipped.
    #[instrument(level = "debug", skip_all)]
    pub fn load(storage: S, key: impl AsRef<str>) -> Self {
        let key = key.as_ref().to_string();
        let ids = match read_json::<Vec<String>, _>(&storage, &key) {
            Ok(Some(raw)) => raw
                .into_iter()
                .filter_map(|id| HazardId::new(id).ok())
                .collect(),
            Ok(None) => HashSet::new(),
            Err(e) => {
                tracing::debug!("Ignoring stored bookmarks: {e}");
                HashSet::new()
            }
        };
        tracing::debug!("Loaded {} bookmark(s)", ids.len());
        Self { storage, key, ids }
    }

    /// Flips membership of `id` and persists the result.
    ///
    /// Returns `true` if the hazard is bookmarked after the call.
    pub fn toggle(&mut self, id: &HazardId) -> bool {
        let bookmarked = if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        };
        tracing::debug!(%id, bookmarked, "Toggled bookmark");
        self.save_best_effort();
        bookmarked
    }

    /// Returns `true` if `id` is bookmarked.
    #[must_use]
    pub fn is_bookmarked(&self, id: &HazardId) -> bool {
        self.ids.contains(id)
    }

    /// Number of bookmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is bookmarked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The bookmarked ids, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &HazardId> {
        self.ids.iter()
    }

    /// Writes the set to storage.
    ///
    /// Ids are written sorted so the stored value is deterministic.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or written.
    pub fn persist(&self) -> Result<(), StorageError> {
        let sorted: BTreeSet<&str> = self.ids.iter().map(HazardId::as_str).collect();
        write_json(&self.storage, &self.key, &sorted)
    }

    fn save_best_effort(&self) {
        // Persistence is fire-and-forget: a failed write must never undo or
        // block the in-memory change, so the error is dropped here.
        if let Err(e) = self.persist() {
            tracing::debug!("Failed to persist bookmarks: {e}");
        }
    }
}
