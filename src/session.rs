//! A browsing session over the hazard database.
//!
//! The [`Session`] is the only surface the rendering layer talks to. It owns
//! the read-only record store and its category index, the persisted bookmark
//! and recent-search stores, and the navigation state. Every operation is
//! synchronous and is reflected in the session state as soon as it returns.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{
        search, CategoryEntry, CategoryFilter, CategoryIndex, Config, HazardId, HazardRecord,
        Navigator, Selection, View,
    },
    storage::{BookmarkStore, FileStore, HazardStore, KeyValueStore, LoadError, RecentSearches},
};

/// The directory holding configuration and persisted state, relative to the
/// workspace root.
pub const WORKSPACE_DIR: &str = ".hazdb";

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The hazard id is not in the record store.
    #[error("hazard '{0}' not found")]
    UnknownHazard(HazardId),
    /// The hazard is not among the results for the current search text.
    #[error("hazard '{0}' is not a result for the current search")]
    NotASearchResult(HazardId),
    /// The dataset could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Returns the path of the configuration file for a workspace root.
#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR).join("config.toml")
}

/// Returns the directory persisted state is stored in for a workspace root.
#[must_use]
pub fn state_dir(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR).join("state")
}

/// A browsing session.
#[derive(Debug)]
pub struct Session<S> {
    records: HazardStore,
    categories: CategoryIndex,
    bookmarks: BookmarkStore<Arc<S>>,
    recent: RecentSearches<Arc<S>>,
    navigator: Navigator,
    search_limit: usize,
}

impl Session<FileStore> {
    /// Opens a session for the workspace at `root`.
    ///
    /// Configuration is read from `.hazdb/config.toml` (defaults if missing),
    /// the configured dataset is loaded (the bundled dataset if none is
    /// configured), and bookmarks and recent searches are read from
    /// `.hazdb/state/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset cannot be loaded. Problems with the
    /// persisted state never fail the session.
    #[instrument(level = "debug")]
    pub fn open(root: &Path) -> Result<Self, SessionError> {
        let config = Config::load_or_default(&config_path(root));
        let records = match config.dataset_path(root) {
            Some(path) => HazardStore::load(&path)?,
            None => HazardStore::bundled()?,
        };
        Ok(Self::new(records, FileStore::new(state_dir(root)), &config))
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Creates a session over `records`, persisting to `storage`.
    pub fn new(records: HazardStore, storage: S, config: &Config) -> Self {
        let storage = Arc::new(storage);
        let categories = CategoryIndex::build(&records);
        let bookmarks = BookmarkStore::load(Arc::clone(&storage), config.bookmarks_key());
        let recent = RecentSearches::load(
            storage,
            config.recent_searches_key(),
            config.recent_limit(),
        );

        Self {
            records,
            categories,
            bookmarks,
            recent,
            navigator: Navigator::new(),
            search_limit: config.search_limit(),
        }
    }

    /// The record store.
    #[must_use]
    pub const fn records(&self) -> &HazardStore {
        &self.records
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &HazardId) -> Option<&HazardRecord> {
        self.records.get(id)
    }

    /// The category index: "all" first, then categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryEntry] {
        self.categories.entries()
    }

    /// The category filter applied while browsing.
    #[must_use]
    pub const fn active_category(&self) -> &CategoryFilter {
        self.navigator.active_category()
    }

    /// Sets the category filter. The foreground view is unaffected.
    pub fn set_active_category(&mut self, filter: CategoryFilter) {
        self.navigator.set_active_category(filter);
    }

    /// Records visible in the browsing list, in store order.
    pub fn visible_records(&self) -> impl Iterator<Item = &HazardRecord> {
        self.records.in_category(self.navigator.active_category())
    }

    /// Flips the bookmark on `id`, returning whether it is now bookmarked.
    ///
    /// Ids not present in the record store are accepted, so bookmarks are not
    /// lost if a dataset update temporarily removes a hazard.
    pub fn toggle_bookmark(&mut self, id: &HazardId) -> bool {
        self.bookmarks.toggle(id)
    }

    /// Returns `true` if `id` is bookmarked.
    #[must_use]
    pub fn is_bookmarked(&self, id: &HazardId) -> bool {
        self.bookmarks.is_bookmarked(id)
    }

    /// The bookmark store.
    #[must_use]
    pub const fn bookmarks(&self) -> &BookmarkStore<Arc<S>> {
        &self.bookmarks
    }

    /// Bookmarked records in store order. Bookmarks for ids missing from the
    /// store are skipped.
    pub fn bookmarked_records(&self) -> impl Iterator<Item = &HazardRecord> {
        self.records
            .iter()
            .filter(|record| self.bookmarks.is_bookmarked(&record.id))
    }

    /// Opens the detail view for `id` from any view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownHazard`] if the id is not in the store.
    /// The navigation state is unchanged in that case.
    pub fn select_hazard(&mut self, id: &HazardId) -> Result<&HazardRecord, SessionError> {
        let Some(record) = self.records.get(id) else {
            return Err(SessionError::UnknownHazard(id.clone()));
        };
        self.navigator.select_hazard(id.clone());
        Ok(record)
    }

    /// The record open in the detail view, if any.
    #[must_use]
    pub fn selected_hazard(&self) -> Option<&HazardRecord> {
        self.navigator
            .selected_hazard()
            .and_then(|id| self.records.get(id))
    }

    /// Closes the detail view, returning to browsing.
    pub fn close_detail(&mut self) {
        self.navigator.close_detail();
    }

    /// Opens the search overlay.
    pub fn open_search(&mut self) {
        self.navigator.open_search();
    }

    /// Closes the search overlay and clears the query.
    pub fn close_search(&mut self) {
        self.navigator.close_search();
    }

    /// Opens the bookmarks overlay.
    pub fn open_bookmarks(&mut self) {
        self.navigator.open_bookmarks();
    }

    /// Closes the bookmarks overlay.
    pub fn close_bookmarks(&mut self) {
        self.navigator.close_bookmarks();
    }

    /// The foreground view.
    #[must_use]
    pub const fn view(&self) -> &View {
        self.navigator.view()
    }

    /// Updates the text in the search overlay.
    ///
    /// Typing does not record a recent search.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.navigator.set_search_query(query);
    }

    /// Results for the current search text.
    #[must_use]
    pub fn search_results(&self) -> Vec<&HazardRecord> {
        self.search(self.navigator.search_query())
    }

    /// Results for an arbitrary query, capped at the configured limit.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&HazardRecord> {
        search::search(&self.records, query, self.search_limit)
    }

    /// Selects a search result: records the current query as a recent search
    /// and opens the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownHazard`] if the id is not in the store,
    /// or [`SessionError::NotASearchResult`] if it is not among the current
    /// [`search_results`](Self::search_results). Nothing is recorded in
    /// either case.
    pub fn select_search_result(&mut self, id: &HazardId) -> Result<&HazardRecord, SessionError> {
        if !self.records.contains(id) {
            return Err(SessionError::UnknownHazard(id.clone()));
        }
        if !self.search_results().iter().any(|record| record.id == *id) {
            return Err(SessionError::NotASearchResult(id.clone()));
        }
        self.recent.record(self.navigator.search_query());
        self.select_hazard(id)
    }

    /// Records a submitted search term.
    pub fn submit_query(&mut self, term: &str) {
        self.recent.record(term);
    }

    /// Recent search terms, most recent first.
    #[must_use]
    pub fn recent_searches(&self) -> &[String] {
        self.recent.terms()
    }

    /// Forgets all recent search terms.
    pub fn clear_recent_searches(&mut self) {
        self.recent.clear();
    }

    /// The flattened UI selection state.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.navigator.selection()
    }

    /// Everything the rendering layer needs to draw the current state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        let mut bookmarks: Vec<&HazardId> = self.bookmarks.iter().collect();
        bookmarks.sort();
        Snapshot {
            categories: self.categories(),
            records: self.visible_records().collect(),
            bookmarks,
            selection: self.selection(),
        }
    }
}

/// A borrowed view of the session state for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    /// The category index.
    pub categories: &'a [CategoryEntry],
    /// Records visible in the browsing list.
    pub records: Vec<&'a HazardRecord>,
    /// Bookmarked ids, sorted.
    pub bookmarks: Vec<&'a HazardId>,
    /// UI selection state.
    pub selection: Selection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const TWO: &str = r#"[
        {"id": "h1", "category": "electrical", "hazard": "Electric shock",
         "consequence": "Burns", "riskRating": 16},
        {"id": "h2", "category": "height", "hazard": "Fall from height",
         "consequence": "Fractures", "riskRating": 9}
    ]"#;

    fn session() -> Session<MemoryStore> {
        Session::new(
            HazardStore::from_json(TWO).unwrap(),
            MemoryStore::new(),
            &Config::default(),
        )
    }

    fn id(s: &str) -> HazardId {
        HazardId::new(s).unwrap()
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a HazardRecord>) -> Vec<&'a str> {
        records.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn two_record_scenario() {
        let mut session = session();

        let categories: Vec<_> = session
            .categories()
            .iter()
            .map(|c| (c.id.to_string(), c.count))
            .collect();
        assert_eq!(
            categories,
            vec![
                ("all".to_string(), 2),
                ("electrical".to_string(), 1),
                ("height".to_string(), 1)
            ]
        );

        assert_eq!(ids(session.search("electric")), vec!["h1"]);

        assert!(session.toggle_bookmark(&id("h1")));
        assert!(session.is_bookmarked(&id("h1")));
        assert!(!session.toggle_bookmark(&id("h1")));
        assert!(!session.is_bookmarked(&id("h1")));
    }

    #[test]
    fn detail_opened_from_search_closes_to_browsing() {
        let mut session = session();
        session.open_search();
        session.select_hazard(&id("h1")).unwrap();
        assert_eq!(session.view(), &View::ViewingDetail(id("h1")));

        session.close_detail();
        assert_eq!(session.view(), &View::Browsing);
    }

    #[test]
    fn unknown_hazard_leaves_state_unchanged() {
        let mut session = session();
        session.open_bookmarks();

        let result = session.select_hazard(&id("missing"));

        assert!(matches!(result, Err(SessionError::UnknownHazard(_))));
        assert_eq!(session.view(), &View::ViewingBookmarks);
    }

    #[test]
    fn active_category_filters_visible_records() {
        let mut session = session();
        assert_eq!(ids(session.visible_records()), vec!["h1", "h2"]);

        session.set_active_category("height".parse().unwrap());
        assert_eq!(ids(session.visible_records()), vec!["h2"]);

        session.open_search();
        session.select_hazard(&id("h1")).unwrap();
        session.close_detail();
        assert_eq!(ids(session.visible_records()), vec!["h2"]);
    }

    #[test]
    fn typing_does_not_record_but_selecting_does() {
        let mut session = session();
        session.open_search();
        session.set_search_query("fall");
        assert_eq!(ids(session.search_results()), vec!["h2"]);
        assert!(session.recent_searches().is_empty());

        let record = session.select_search_result(&id("h2")).unwrap();
        assert_eq!(record.hazard, "Fall from height");
        assert_eq!(session.recent_searches(), ["fall"]);
        assert_eq!(session.selected_hazard().map(|r| r.id.as_str()), Some("h2"));
    }

    #[test]
    fn selecting_unknown_result_records_nothing() {
        let mut session = session();
        session.open_search();
        session.set_search_query("fall");

        assert!(session.select_search_result(&id("nope")).is_err());
        assert!(session.recent_searches().is_empty());
        assert_eq!(session.view(), &View::Searching);
    }

    #[test]
    fn selecting_a_record_outside_the_results_is_rejected() {
        let mut session = session();
        session.open_search();
        session.set_search_query("fall");

        let result = session.select_search_result(&id("h1"));

        assert!(matches!(result, Err(SessionError::NotASearchResult(_))));
        assert!(session.recent_searches().is_empty());
        assert_eq!(session.view(), &View::Searching);
    }

    #[test]
    fn result_and_history_caps_hold_for_large_datasets() {
        let records: Vec<_> = (0..40)
            .map(|i| {
                serde_json::json!({
                    "id": format!("live-{i}"),
                    "category": "electrical",
                    "hazard": format!("Live conductor {i}"),
                    "consequence": "Shock",
                    "riskRating": 16,
                })
            })
            .collect();
        let records =
            HazardStore::from_json(&serde_json::Value::Array(records).to_string()).unwrap();

        let mut config = Config::default();
        assert!(config.set_search_limit(50).is_err());
        assert!(config.set_recent_limit(9).is_err());
        let mut session = Session::new(records, MemoryStore::new(), &config);

        assert_eq!(session.search("live").len(), 20);
        for i in 0..9 {
            session.submit_query(&format!("live {i}"));
        }
        assert_eq!(session.recent_searches().len(), 5);
        assert_eq!(session.recent_searches()[0], "live 8");
    }

    #[test]
    fn submit_and_clear_recent_searches() {
        let mut session = session();
        session.submit_query("shock");
        session.submit_query("ladder");
        session.submit_query("shock");
        assert_eq!(session.recent_searches(), ["shock", "ladder"]);

        session.clear_recent_searches();
        assert!(session.recent_searches().is_empty());
    }

    #[test]
    fn bookmarked_records_follow_store_order_and_skip_unknown_ids() {
        let mut session = session();
        session.toggle_bookmark(&id("h2"));
        session.toggle_bookmark(&id("gone"));
        session.toggle_bookmark(&id("h1"));

        assert_eq!(ids(session.bookmarked_records()), vec!["h1", "h2"]);
        assert_eq!(session.bookmarks().len(), 3);
    }

    #[test]
    fn snapshot_collects_render_state() {
        let mut session = session();
        session.toggle_bookmark(&id("h2"));
        session.set_active_category("electrical".parse().unwrap());

        let snapshot = session.snapshot();

        assert_eq!(snapshot.categories.len(), 3);
        assert_eq!(ids(snapshot.records.iter().copied()), vec!["h1"]);
        assert_eq!(snapshot.bookmarks, vec![&id("h2")]);
        assert_eq!(snapshot.selection.active_category.as_str(), "electrical");
    }

    #[test]
    fn state_survives_reopening_workspace() {
        let tmp = tempfile::tempdir().unwrap();

        let mut first = Session::open(tmp.path()).unwrap();
        let first_id = first.records().iter().next().unwrap().id.clone();
        first.toggle_bookmark(&first_id);
        first.submit_query("shock");
        drop(first);

        let second = Session::open(tmp.path()).unwrap();
        assert!(second.is_bookmarked(&first_id));
        assert_eq!(second.recent_searches(), ["shock"]);
    }

    #[test]
    fn open_uses_configured_dataset() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("site.json"), TWO).unwrap();
        let mut config = Config::default();
        config.dataset = Some(PathBuf::from("site.json"));
        config.save(&config_path(tmp.path())).unwrap();

        let session = Session::open(tmp.path()).unwrap();

        assert_eq!(session.records().len(), 2);
    }

    #[test]
    fn corrupt_state_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_dir(tmp.path());
        std::fs::create_dir_all(&state).unwrap();
        std::fs::write(state.join("hazard-bookmarks.json"), "{{{").unwrap();
        std::fs::write(state.join("hazard-recent-searches.json"), "42").unwrap();

        let session = Session::open(tmp.path()).unwrap();

        assert!(session.bookmarks().is_empty());
        assert!(session.recent_searches().is_empty());
    }
}
