//! Site hazard database
//!
//! A read-only set of hazard records with a category index, free-text search,
//! persisted bookmarks and recent searches, and a small navigation state
//! machine for the views a front end shows over them.

pub mod domain;
pub use domain::{
    CategoryEntry, CategoryFilter, CategoryId, CategoryIndex, Config, ControlMeasures,
    ControlTier, HazardId, HazardRecord, Navigator, RiskBand, RiskRating, Selection, View,
};

/// Record, bookmark and recent-search storage.
pub mod storage;
pub use storage::{
    BookmarkStore, FileStore, HazardStore, KeyValueStore, LoadError, MemoryStore, RecentSearches,
    StorageError,
};

pub mod session;
pub use session::{Session, SessionError, Snapshot};
