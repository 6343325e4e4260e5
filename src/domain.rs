//! Domain models for the hazard database.
//!
//! This module contains the hazard record types, the category index, the
//! search engine, the navigation state machine and configuration.

/// Hazard records and their component types.
pub mod hazard;
pub use hazard::{
    ControlMeasures, ControlTier, HazardId, HazardIdError, HazardRecord, RiskBand, RiskRating,
    RiskRatingError,
};

pub mod category;
pub use category::{CategoryEntry, CategoryFilter, CategoryId, CategoryIndex, InvalidCategoryError};

mod config;
pub use config::Config;

pub mod navigation;
pub use navigation::{Navigator, Selection, View};

pub mod search;
