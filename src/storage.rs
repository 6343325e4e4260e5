//! Storage for the hazard database.
//!
//! The record store is read-only reference data. Bookmarks and recent searches
//! are persisted through a [`KeyValueStore`] on a best-effort basis.

/// The persisted bookmark set.
pub mod bookmarks;
pub mod kv;
/// The persisted recent-searches list.
pub mod recent;
mod record_store;

pub use bookmarks::BookmarkStore;
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use recent::RecentSearches;
pub use record_store::{HazardStore, LoadError};
