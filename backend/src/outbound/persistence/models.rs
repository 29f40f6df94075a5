//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{HeroId, HeroProfile, HeroView, Superpower, SuperpowerId};

use super::schema::{catalog_seed_runs, hero_superpowers, heroes, superpowers};

// ---------------------------------------------------------------------------
// Hero models
// ---------------------------------------------------------------------------

/// Row struct for reading from the heroes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = heroes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HeroRow {
    pub id: i32,
    pub name: String,
    pub hero_name: String,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl HeroRow {
    /// Attach the hero's superpowers to build the read view.
    pub fn into_view(self, superpowers: Vec<Superpower>) -> HeroView {
        HeroView {
            id: HeroId::new(self.id),
            name: self.name,
            hero_name: self.hero_name,
            birth_date: self.birth_date,
            height: self.height,
            weight: self.weight,
            created_at: self.created_at,
            superpowers,
        }
    }
}

/// Insertable struct for heroes created through the API.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = heroes)]
pub(crate) struct NewHeroRow<'a> {
    pub name: &'a str,
    pub hero_name: &'a str,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewHeroRow<'a> {
    pub fn from_profile(profile: &'a HeroProfile, created_at: DateTime<Utc>) -> Self {
        Self {
            name: profile.name(),
            hero_name: profile.alias(),
            birth_date: profile.birth_date(),
            height: profile.height(),
            weight: profile.weight(),
            created_at,
        }
    }
}

/// Insertable struct for seeded heroes, which keep their reference ids.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = heroes)]
pub(crate) struct SeedHeroRow<'a> {
    pub id: i32,
    pub name: &'a str,
    pub hero_name: &'a str,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
}

/// Changeset struct for overwriting a hero's scalar fields.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = heroes)]
pub(crate) struct HeroChangesetRow<'a> {
    pub name: &'a str,
    pub hero_name: &'a str,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
}

impl<'a> From<&'a HeroProfile> for HeroChangesetRow<'a> {
    fn from(profile: &'a HeroProfile) -> Self {
        Self {
            name: profile.name(),
            hero_name: profile.alias(),
            birth_date: profile.birth_date(),
            height: profile.height(),
            weight: profile.weight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Superpower models
// ---------------------------------------------------------------------------

/// Row struct for reading from the superpowers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = superpowers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SuperpowerRow {
    pub id: i32,
    pub name: String,
    pub description: String,
}

impl TryFrom<SuperpowerRow> for Superpower {
    type Error = String;

    fn try_from(row: SuperpowerRow) -> Result<Self, Self::Error> {
        Superpower::new(SuperpowerId::new(row.id), row.name, row.description)
            .map_err(|err| format!("stored superpower {} is invalid: {err}", row.id))
    }
}

/// Insertable struct for seeding the catalogue.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = superpowers)]
pub(crate) struct NewSuperpowerRow<'a> {
    pub id: i32,
    pub name: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a Superpower> for NewSuperpowerRow<'a> {
    fn from(power: &'a Superpower) -> Self {
        Self {
            id: power.id().get(),
            name: power.name(),
            description: power.description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Link models
// ---------------------------------------------------------------------------

/// Insertable struct for hero to superpower links.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = hero_superpowers)]
pub(crate) struct HeroSuperpowerRow {
    pub hero_id: i32,
    pub superpower_id: i32,
}

impl HeroSuperpowerRow {
    pub fn link(hero: HeroId, superpower: SuperpowerId) -> Self {
        Self {
            hero_id: hero.get(),
            superpower_id: superpower.get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Seed models
// ---------------------------------------------------------------------------

/// Insertable marker recording that a catalogue seed was applied.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = catalog_seed_runs)]
pub(crate) struct NewCatalogSeedRunRow<'a> {
    pub seed_key: &'a str,
    pub hero_count: i32,
}
