//! Reference catalogue applied to an empty store at startup.
//!
//! The seed is plain JSON so deployments can swap it without a rebuild. The
//! bundled fixture carries the 20 reference superpowers, 10 heroes and their
//! links.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{
    HeroDraft, HeroId, HeroProfile, HeroValidationError, Superpower, SuperpowerId,
    SuperpowerIds, SuperpowerValidationError,
};

const REFERENCE_SEED: &str = include_str!("../../fixtures/catalog_seed.json");

/// Errors raised while parsing or checking a catalogue seed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogSeedError {
    #[error("catalogue seed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed superpower {id} is invalid: {source}")]
    Superpower {
        id: i32,
        #[source]
        source: SuperpowerValidationError,
    },
    #[error("seed hero {id} is invalid: {source}")]
    Hero {
        id: i32,
        #[source]
        source: HeroValidationError,
    },
    #[error("seed {kind} id {id} appears more than once")]
    DuplicateId { kind: &'static str, id: i32 },
    #[error("seed hero alias '{alias}' appears more than once")]
    DuplicateAlias { alias: String },
    #[error("seed hero {hero_id} links unknown superpower {superpower_id}")]
    UnknownSuperpower { hero_id: i32, superpower_id: i32 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedDocument {
    superpowers: Vec<SeedSuperpowerRecord>,
    heroes: Vec<SeedHeroRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedSuperpowerRecord {
    id: i32,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedHeroRecord {
    id: i32,
    name: String,
    hero_name: String,
    birth_date: DateTime<Utc>,
    height: f64,
    weight: f64,
    created_at: DateTime<Utc>,
    #[serde(default)]
    superpower_ids: Vec<i32>,
}

/// Hero entry of a seed, with its fixed id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedHero {
    pub id: HeroId,
    pub profile: HeroProfile,
    pub created_at: DateTime<Utc>,
    pub superpower_ids: SuperpowerIds,
}

/// Validated catalogue seed.
///
/// ## Invariants
/// - Superpower ids, hero ids and hero aliases are unique.
/// - Every hero link names a superpower in the same seed.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSeed {
    superpowers: Vec<Superpower>,
    heroes: Vec<SeedHero>,
}

impl CatalogSeed {
    /// The seed bundled with the service.
    ///
    /// # Examples
    /// ```
    /// use heroes_api::domain::CatalogSeed;
    ///
    /// let seed = CatalogSeed::reference().expect("bundled seed is valid");
    /// assert_eq!(seed.superpowers().len(), 20);
    /// assert_eq!(seed.heroes().len(), 10);
    /// ```
    pub fn reference() -> Result<Self, CatalogSeedError> {
        Self::from_json(REFERENCE_SEED)
    }

    /// Parse and check a seed document.
    pub fn from_json(contents: &str) -> Result<Self, CatalogSeedError> {
        let document: SeedDocument = serde_json::from_str(contents)?;

        let mut superpower_ids = HashSet::new();
        let mut superpowers = Vec::with_capacity(document.superpowers.len());
        for record in document.superpowers {
            if !superpower_ids.insert(record.id) {
                return Err(CatalogSeedError::DuplicateId {
                    kind: "superpower",
                    id: record.id,
                });
            }
            let superpower =
                Superpower::new(SuperpowerId::new(record.id), record.name, record.description)
                    .map_err(|source| CatalogSeedError::Superpower {
                        id: record.id,
                        source,
                    })?;
            superpowers.push(superpower);
        }

        let mut hero_ids = HashSet::new();
        let mut aliases = HashSet::new();
        let mut heroes = Vec::with_capacity(document.heroes.len());
        for record in document.heroes {
            heroes.push(check_hero(record, &superpower_ids, &mut hero_ids, &mut aliases)?);
        }

        Ok(Self {
            superpowers,
            heroes,
        })
    }

    pub fn superpowers(&self) -> &[Superpower] {
        self.superpowers.as_slice()
    }

    pub fn heroes(&self) -> &[SeedHero] {
        self.heroes.as_slice()
    }

    /// Total number of hero to superpower links.
    pub fn link_count(&self) -> usize {
        self.heroes.iter().map(|hero| hero.superpower_ids.len()).sum()
    }
}

fn check_hero(
    record: SeedHeroRecord,
    superpower_ids: &HashSet<i32>,
    hero_ids: &mut HashSet<i32>,
    aliases: &mut HashSet<String>,
) -> Result<SeedHero, CatalogSeedError> {
    let SeedHeroRecord {
        id,
        name,
        hero_name,
        birth_date,
        height,
        weight,
        created_at,
        superpower_ids: links,
    } = record;

    if !hero_ids.insert(id) {
        return Err(CatalogSeedError::DuplicateId { kind: "hero", id });
    }
    if !aliases.insert(hero_name.clone()) {
        return Err(CatalogSeedError::DuplicateAlias { alias: hero_name });
    }
    if let Some(unknown) = links.iter().find(|link| !superpower_ids.contains(*link)) {
        return Err(CatalogSeedError::UnknownSuperpower {
            hero_id: id,
            superpower_id: *unknown,
        });
    }

    let profile = HeroProfile::new(HeroDraft {
        name,
        alias: hero_name,
        birth_date,
        height,
        weight,
    })
    .map_err(|source| CatalogSeedError::Hero { id, source })?;

    Ok(SeedHero {
        id: HeroId::new(id),
        profile,
        created_at,
        superpower_ids: SuperpowerIds::from_requested(links.into_iter().map(SuperpowerId::new)),
    })
}
