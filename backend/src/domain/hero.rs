//! Hero data model.
//!
//! A hero is identified by a store-assigned integer id and a unique,
//! case-sensitive alias (`heroName` on the wire). Scalar fields are checked
//! here once, so adapters and services only ever handle a valid
//! [`HeroProfile`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Superpower;

/// Maximum length, in characters, of a hero's name and alias.
pub const HERO_TEXT_MAX: usize = 120;

/// Validation errors returned by [`HeroProfile::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeroValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("heroName must not be empty")]
    EmptyAlias,
    #[error("heroName must be at most {max} characters")]
    AliasTooLong { max: usize },
    #[error("height must be a positive number")]
    InvalidHeight,
    #[error("weight must be a positive number")]
    InvalidWeight,
}

impl HeroValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::EmptyAlias | Self::AliasTooLong { .. } => "heroName",
            Self::InvalidHeight => "height",
            Self::InvalidWeight => "weight",
        }
    }

    /// Machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::EmptyAlias => "empty_field",
            Self::NameTooLong { .. } | Self::AliasTooLong { .. } => "too_long",
            Self::InvalidHeight | Self::InvalidWeight => "not_positive",
        }
    }
}

/// Store-assigned hero identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(i32);

impl HeroId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unvalidated scalar input for a hero.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroDraft {
    pub name: String,
    pub alias: String,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
}

/// Validated scalar fields shared by create and update.
///
/// ## Invariants
/// - `name` and `alias` are non-blank and at most [`HERO_TEXT_MAX`]
///   characters. They are stored verbatim (no trimming or case folding).
/// - `height` and `weight` are finite and strictly positive.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use heroes_api::domain::{HeroDraft, HeroProfile};
///
/// let profile = HeroProfile::new(HeroDraft {
///     name: "Diana Prince".into(),
///     alias: "Mulher-Maravilha".into(),
///     birth_date: Utc.with_ymd_and_hms(1976, 3, 22, 0, 0, 0).unwrap(),
///     height: 1.83,
///     weight: 74.0,
/// })
/// .expect("valid hero");
/// assert_eq!(profile.alias(), "Mulher-Maravilha");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HeroProfile {
    name: String,
    alias: String,
    birth_date: DateTime<Utc>,
    height: f64,
    weight: f64,
}

fn check_text(
    value: &str,
    empty: HeroValidationError,
    too_long: HeroValidationError,
) -> Result<(), HeroValidationError> {
    if value.trim().is_empty() {
        return Err(empty);
    }
    if value.chars().count() > HERO_TEXT_MAX {
        return Err(too_long);
    }
    Ok(())
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl HeroProfile {
    /// Validate a draft.
    pub fn new(draft: HeroDraft) -> Result<Self, HeroValidationError> {
        let HeroDraft {
            name,
            alias,
            birth_date,
            height,
            weight,
        } = draft;

        check_text(
            &name,
            HeroValidationError::EmptyName,
            HeroValidationError::NameTooLong { max: HERO_TEXT_MAX },
        )?;
        check_text(
            &alias,
            HeroValidationError::EmptyAlias,
            HeroValidationError::AliasTooLong { max: HERO_TEXT_MAX },
        )?;
        if !is_positive(height) {
            return Err(HeroValidationError::InvalidHeight);
        }
        if !is_positive(weight) {
            return Err(HeroValidationError::InvalidWeight);
        }

        Ok(Self {
            name,
            alias,
            birth_date,
            height,
            weight,
        })
    }

    /// Civil name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Unique hero alias.
    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    /// Birth date in UTC.
    pub fn birth_date(&self) -> DateTime<Utc> {
        self.birth_date
    }

    /// Height in metres.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Denormalised read view of a hero and its resolved superpowers.
///
/// `superpowers` is ordered by superpower id ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroView {
    pub id: HeroId,
    pub name: String,
    pub hero_name: String,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    pub superpowers: Vec<Superpower>,
}
