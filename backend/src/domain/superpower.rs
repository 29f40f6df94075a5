//! Superpower reference data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a superpower name.
pub const SUPERPOWER_NAME_MAX: usize = 50;
/// Maximum length of a superpower description.
pub const SUPERPOWER_DESCRIPTION_MAX: usize = 250;

/// Validation errors returned by [`Superpower::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuperpowerValidationError {
    #[error("superpower name must not be empty")]
    EmptyName,
    #[error("superpower name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("superpower description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

/// Superpower identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuperpowerId(i32);

impl SuperpowerId {
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for SuperpowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Read-only catalogue entry.
///
/// ## Invariants
/// - `name` is non-blank and at most [`SUPERPOWER_NAME_MAX`] characters.
/// - `description` may be empty and is at most
///   [`SUPERPOWER_DESCRIPTION_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Superpower {
    id: SuperpowerId,
    name: String,
    description: String,
}

impl Superpower {
    /// Validate and construct a catalogue entry.
    ///
    /// # Examples
    /// ```
    /// use heroes_api::domain::{Superpower, SuperpowerId};
    ///
    /// let power = Superpower::new(SuperpowerId::new(2), "Voo", "")
    ///     .expect("valid superpower");
    /// assert_eq!(power.name(), "Voo");
    /// ```
    pub fn new(
        id: SuperpowerId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SuperpowerValidationError> {
        let name = name.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(SuperpowerValidationError::EmptyName);
        }
        if name.chars().count() > SUPERPOWER_NAME_MAX {
            return Err(SuperpowerValidationError::NameTooLong {
                max: SUPERPOWER_NAME_MAX,
            });
        }
        if description.chars().count() > SUPERPOWER_DESCRIPTION_MAX {
            return Err(SuperpowerValidationError::DescriptionTooLong {
                max: SUPERPOWER_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            id,
            name,
            description,
        })
    }

    pub fn id(&self) -> SuperpowerId {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}
