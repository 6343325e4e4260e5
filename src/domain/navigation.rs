//! Which view of the hazard database is in the foreground.
//!
//! At most one of the search overlay, the bookmarks overlay and the detail
//! view is open at a time. The [`Navigator`] holds that as a single [`View`]
//! so two overlays can never be open together.

use serde::Serialize;

use crate::domain::{CategoryFilter, HazardId};

/// The foreground view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "hazard", rename_all = "camelCase")]
pub enum View {
    /// The category-filtered list.
    #[default]
    Browsing,
    /// The search overlay.
    Searching,
    /// The bookmarks overlay.
    ViewingBookmarks,
    /// The detail view for one hazard.
    ViewingDetail(HazardId),
}

/// Navigation state machine plus the ephemeral state that rides along with it.
///
/// The active category is independent of the view and is never reset by a
/// transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    view: View,
    active_category: CategoryFilter,
    search_query: String,
}

impl Navigator {
    /// Creates a navigator in the browsing view with no category filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current foreground view.
    #[must_use]
    pub const fn view(&self) -> &View {
        &self.view
    }

    /// The category filter applied while browsing.
    #[must_use]
    pub const fn active_category(&self) -> &CategoryFilter {
        &self.active_category
    }

    /// The text typed into the search overlay.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The hazard open in the detail view, if any.
    #[must_use]
    pub fn selected_hazard(&self) -> Option<&HazardId> {
        match &self.view {
            View::ViewingDetail(id) => Some(id),
            _ => None,
        }
    }

    /// Sets the category filter. The view is unaffected.
    pub fn set_active_category(&mut self, filter: CategoryFilter) {
        self.active_category = filter;
    }

    /// Updates the search text.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Opens the search overlay, replacing whatever is in the foreground.
    pub fn open_search(&mut self) {
        self.transition(View::Searching);
    }

    /// Closes the search overlay and clears the query.
    ///
    /// Does nothing unless the search overlay is open.
    pub fn close_search(&mut self) {
        if self.view == View::Searching {
            self.search_query.clear();
            self.transition(View::Browsing);
        }
    }

    /// Opens the bookmarks overlay, replacing whatever is in the foreground.
    pub fn open_bookmarks(&mut self) {
        self.transition(View::ViewingBookmarks);
    }

    /// Closes the bookmarks overlay.
    ///
    /// Does nothing unless the bookmarks overlay is open.
    pub fn close_bookmarks(&mut self) {
        if self.view == View::ViewingBookmarks {
            self.transition(View::Browsing);
        }
    }

    /// Opens the detail view for a hazard from any view, closing any overlay.
    pub fn select_hazard(&mut self, id: HazardId) {
        self.transition(View::ViewingDetail(id));
    }

    /// Closes the detail view.
    ///
    /// Always returns to browsing, whichever view the detail was opened from.
    /// Does nothing unless the detail view is open.
    pub fn close_detail(&mut self) {
        if matches!(self.view, View::ViewingDetail(_)) {
            self.transition(View::Browsing);
        }
    }

    /// A flattened snapshot for the rendering layer.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            active_category: self.active_category.clone(),
            selected_hazard_id: self.selected_hazard().cloned(),
            search_overlay_open: self.view == View::Searching,
            bookmarks_overlay_open: self.view == View::ViewingBookmarks,
            search_query: self.search_query.clone(),
        }
    }

    fn transition(&mut self, to: View) {
        tracing::trace!(from = ?self.view, to = ?to, "navigate");
        self.view = to;
    }
}

/// Flattened UI selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Category filter applied while browsing.
    pub active_category: CategoryFilter,
    /// The hazard open in the detail view.
    pub selected_hazard_id: Option<HazardId>,
    /// Whether the search overlay is in the foreground.
    pub search_overlay_open: bool,
    /// Whether the bookmarks overlay is in the foreground.
    pub bookmarks_overlay_open: bool,
    /// Text typed into the search overlay.
    pub search_query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> HazardId {
        HazardId::new(s).unwrap()
    }

    #[test]
    fn starts_browsing() {
        let nav = Navigator::new();
        assert_eq!(nav.view(), &View::Browsing);
        assert_eq!(nav.active_category(), &CategoryFilter::All);
        assert!(nav.selected_hazard().is_none());
    }

    #[test]
    fn search_overlay_opens_and_closes() {
        let mut nav = Navigator::new();
        nav.open_search();
        nav.set_search_query("shock");
        assert_eq!(nav.view(), &View::Searching);

        nav.close_search();
        assert_eq!(nav.view(), &View::Browsing);
        assert_eq!(nav.search_query(), "");
    }

    #[test]
    fn bookmarks_overlay_opens_and_closes() {
        let mut nav = Navigator::new();
        nav.open_bookmarks();
        assert_eq!(nav.view(), &View::ViewingBookmarks);
        nav.close_bookmarks();
        assert_eq!(nav.view(), &View::Browsing);
    }

    #[test]
    fn detail_from_search_returns_to_browsing() {
        let mut nav = Navigator::new();
        nav.open_search();
        nav.select_hazard(id("h1"));
        assert_eq!(nav.view(), &View::ViewingDetail(id("h1")));

        nav.close_detail();
        assert_eq!(nav.view(), &View::Browsing);
    }

    #[test]
    fn detail_from_bookmarks_returns_to_browsing() {
        let mut nav = Navigator::new();
        nav.open_bookmarks();
        nav.select_hazard(id("h2"));
        assert_eq!(nav.selected_hazard(), Some(&id("h2")));

        nav.close_detail();
        assert_eq!(nav.view(), &View::Browsing);
    }

    #[test]
    fn selecting_from_detail_replaces_the_hazard() {
        let mut nav = Navigator::new();
        nav.select_hazard(id("h1"));
        nav.select_hazard(id("h2"));
        assert_eq!(nav.selected_hazard(), Some(&id("h2")));
    }

    #[test]
    fn opening_one_overlay_closes_the_other() {
        let mut nav = Navigator::new();
        nav.open_search();
        nav.open_bookmarks();

        let selection = nav.selection();
        assert!(selection.bookmarks_overlay_open);
        assert!(!selection.search_overlay_open);
    }

    #[test]
    fn close_is_a_no_op_in_other_views() {
        let mut nav = Navigator::new();
        nav.open_bookmarks();
        nav.close_search();
        nav.close_detail();
        assert_eq!(nav.view(), &View::ViewingBookmarks);

        nav.select_hazard(id("h1"));
        nav.close_bookmarks();
        assert_eq!(nav.view(), &View::ViewingDetail(id("h1")));
    }

    #[test]
    fn active_category_survives_navigation() {
        let mut nav = Navigator::new();
        let fire: CategoryFilter = "fire".parse().unwrap();
        nav.set_active_category(fire.clone());

        nav.open_search();
        nav.select_hazard(id("h1"));
        nav.close_detail();
        nav.open_bookmarks();
        nav.close_bookmarks();

        assert_eq!(nav.active_category(), &fire);
    }

    #[test]
    fn selection_reflects_detail_view() {
        let mut nav = Navigator::new();
        nav.open_search();
        nav.set_search_query("arc");
        nav.select_hazard(id("h3"));

        let selection = nav.selection();
        assert_eq!(selection.selected_hazard_id, Some(id("h3")));
        assert!(!selection.search_overlay_open);
        assert!(!selection.bookmarks_overlay_open);
        assert_eq!(selection.search_query, "arc");
    }
}
