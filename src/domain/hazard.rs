use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

use crate::domain::CategoryId;

/// A stable, unique identifier for a hazard record.
///
/// Identifiers are persisted as bookmark keys, so they must never change for a
/// given hazard between releases of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HazardId(NonEmptyString);

impl HazardId {
    /// Creates a new `HazardId` from a string.
    ///
    /// Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns `HazardIdError` if the string is empty or contains only
    /// whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, HazardIdError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(HazardIdError(s));
        }
        NonEmptyString::new(trimmed.to_string())
            .map(Self)
            .map_err(HazardIdError)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for HazardId {
    type Error = HazardIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for HazardId {
    type Error = HazardIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HazardId> for String {
    fn from(id: HazardId) -> Self {
        id.0.as_str().to_owned()
    }
}

impl FromStr for HazardId {
    type Err = HazardIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for HazardId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for HazardId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for HazardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a hazard identifier is blank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid hazard id '{0}': must contain at least one non-whitespace character")]
pub struct HazardIdError(String);

/// A risk rating in the range 1-25.
///
/// The rating is the product of likelihood and severity, each scored on a
/// 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RiskRating(u8);

impl RiskRating {
    /// The lowest possible rating.
    pub const MIN: u8 = 1;
    /// The highest possible rating.
    pub const MAX: u8 = 25;

    /// Creates a rating from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`RiskRatingError::OutOfRange`] if the value is outside 1-25.
    pub const fn new(value: u8) -> Result<Self, RiskRatingError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(RiskRatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Creates a rating from its likelihood and severity scores.
    ///
    /// # Errors
    ///
    /// Returns [`RiskRatingError::Factor`] if either score is outside 1-5.
    pub const fn from_factors(likelihood: u8, severity: u8) -> Result<Self, RiskRatingError> {
        if likelihood < 1 || likelihood > 5 {
            return Err(RiskRatingError::Factor(likelihood));
        }
        if severity < 1 || severity > 5 {
            return Err(RiskRatingError::Factor(severity));
        }
        Ok(Self(likelihood * severity))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the severity band this rating falls into.
    #[must_use]
    pub const fn band(self) -> RiskBand {
        RiskBand::from_rating(self)
    }
}

impl TryFrom<u8> for RiskRating {
    type Error = RiskRatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskRating> for u8 {
    fn from(rating: RiskRating) -> Self {
        rating.0
    }
}

impl fmt::Display for RiskRating {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors produced when constructing a [`RiskRating`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RiskRatingError {
    /// The rating is outside the 1-25 range.
    #[error("Invalid risk rating {0}: expected a value between 1 and 25")]
    OutOfRange(u8),
    /// A likelihood or severity score is outside the 1-5 range.
    #[error("Invalid likelihood or severity score {0}: expected a value between 1 and 5")]
    Factor(u8),
}

/// Severity band used to label a risk rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    /// Rating below 5.
    Low,
    /// Rating 5-8.
    Medium,
    /// Rating 9-14.
    High,
    /// Rating 15 and above.
    Extreme,
}

impl RiskBand {
    /// Classifies a rating.
    #[must_use]
    pub const fn from_rating(rating: RiskRating) -> Self {
        match rating.get() {
            15.. => Self::Extreme,
            9..=14 => Self::High,
            5..=8 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Extreme => "Extreme",
        }
    }
}

impl FromStr for RiskBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "extreme" => Ok(Self::Extreme),
            other => Err(format!(
                "Unknown risk band '{other}': expected low, medium, high or extreme"
            )),
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tier of the hierarchy of control, from most to least effective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlTier {
    /// Remove the hazard entirely.
    Elimination,
    /// Replace with something less hazardous.
    Substitution,
    /// Isolate people from the hazard.
    Engineering,
    /// Change the way people work.
    Administrative,
    /// Personal protective equipment.
    Ppe,
}

impl ControlTier {
    /// All tiers in hierarchy order.
    pub const ALL: [Self; 5] = [
        Self::Elimination,
        Self::Substitution,
        Self::Engineering,
        Self::Administrative,
        Self::Ppe,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Elimination => "Elimination",
            Self::Substitution => "Substitution",
            Self::Engineering => "Engineering controls",
            Self::Administrative => "Administrative controls",
            Self::Ppe => "PPE",
        }
    }
}

impl fmt::Display for ControlTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Control measures grouped by tier of the hierarchy of control.
///
/// Any tier may be absent from the source data, in which case it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMeasures {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    elimination: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    substitution: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    engineering: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    administrative: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    ppe: Vec<String>,
}

impl ControlMeasures {
    /// Returns the measures for a single tier, in their original order.
    #[must_use]
    pub fn get(&self, tier: ControlTier) -> &[String] {
        match tier {
            ControlTier::Elimination => &self.elimination,
            ControlTier::Substitution => &self.substitution,
            ControlTier::Engineering => &self.engineering,
            ControlTier::Administrative => &self.administrative,
            ControlTier::Ppe => &self.ppe,
        }
    }

    /// Iterates over the non-empty tiers in hierarchy order.
    pub fn tiers(&self) -> impl Iterator<Item = (ControlTier, &[String])> {
        ControlTier::ALL
            .into_iter()
            .map(|tier| (tier, self.get(tier)))
            .filter(|(_, measures)| !measures.is_empty())
    }

    /// Total number of measures across all tiers.
    #[must_use]
    pub fn len(&self) -> usize {
        ControlTier::ALL.iter().map(|&tier| self.get(tier).len()).sum()
    }

    /// Returns `true` if no tier has any measures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single entry of the hazard database.
///
/// Records are read-only reference data. They are only ever handed out by
/// shared reference from the [`HazardStore`](crate::HazardStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardRecord {
    /// Unique, stable identifier.
    pub id: HazardId,
    /// The category this hazard belongs to.
    pub category: CategoryId,
    /// Short label, e.g. "Electric shock".
    pub hazard: String,
    /// What happens if the hazard is realised.
    pub consequence: String,
    /// Likelihood × severity.
    pub risk_rating: RiskRating,
    /// Measures grouped by hierarchy of control.
    #[serde(default)]
    pub control_measures: ControlMeasures,
    /// Relevant regulations from BS 7671.
    #[serde(default, rename = "bs7671References", skip_serializing_if = "Vec::is_empty")]
    pub bs7671_references: Vec<String>,
    /// Guidance notes and further reading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidance_notes: Vec<String>,
    /// What to do if the hazard is realised.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emergency_procedures: Vec<String>,
    /// Training operatives need before exposure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub training_required: Vec<String>,
}

impl HazardRecord {
    /// Shorthand for the record's severity band.
    #[must_use]
    pub const fn band(&self) -> RiskBand {
        self.risk_rating.band()
    }
}
