//! Driving port for hero mutations.
//!
//! Implementations validate the whole request before writing anything, so a
//! failed call leaves the hero and its links untouched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, HeroId, HeroView, SuperpowerId};

/// Hero fields supplied by a client on create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroPayload {
    pub name: String,
    pub hero_name: String,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    /// Requested links; duplicates are collapsed.
    pub superpower_ids: Vec<SuperpowerId>,
}

/// Request to create a hero.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateHeroRequest {
    pub hero: HeroPayload,
}

/// Request to replace a hero's fields and links.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateHeroRequest {
    /// Identifier addressed by the caller (the URL path).
    pub id: HeroId,
    /// Identifier carried in the body; must equal `id`.
    pub body_id: HeroId,
    pub hero: HeroPayload,
}

#[async_trait]
pub trait HeroCommand: Send + Sync {
    /// Create a hero and return its read view.
    ///
    /// Fails with `Conflict` when the alias is taken and `InvalidReference`
    /// when a superpower id is unknown.
    async fn create_hero(&self, request: CreateHeroRequest) -> Result<HeroView, Error>;

    /// Overwrite a hero and replace its link set.
    ///
    /// Fails with `IdMismatch`, `NotFound`, `Conflict` or `InvalidReference`,
    /// checked in that order.
    async fn update_hero(&self, request: UpdateHeroRequest) -> Result<(), Error>;

    /// Delete a hero and its links; `NotFound` when absent.
    async fn delete_hero(&self, id: HeroId) -> Result<(), Error>;

    async fn hero_exists(&self, id: HeroId) -> Result<bool, Error>;
}
