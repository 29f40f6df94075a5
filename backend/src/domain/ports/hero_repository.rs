//! Driven port for hero persistence.
//!
//! Adapters own the transactional guarantees: `insert` and `update` write the
//! hero row and its links atomically, and `update` serialises writers on the
//! hero row while it reconciles links.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{HeroId, HeroProfile, HeroView, SuperpowerIds};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by hero repository adapters.
    pub enum HeroRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "hero repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "hero repository query failed: {message}",
        /// The unique alias constraint rejected the write.
        AliasConflict { alias: String } => "hero alias '{alias}' already exists",
        /// A link referenced a superpower the store does not hold.
        UnknownSuperpower { message: String } => "unknown superpower: {message}",
        /// The hero disappeared before the write could lock it.
        MissingHero { id: i32 } => "hero {id} not found",
    }
}

/// Hero to persist on creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHero {
    pub profile: HeroProfile,
    pub created_at: DateTime<Utc>,
    pub superpower_ids: SuperpowerIds,
}

/// Replacement state for an existing hero.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroChanges {
    pub profile: HeroProfile,
    pub superpower_ids: SuperpowerIds,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HeroRepository: Send + Sync {
    /// Every hero ordered by id, each with superpowers ordered by id.
    ///
    /// Heroes and links must come from one consistent snapshot.
    async fn list_views(&self) -> Result<Vec<HeroView>, HeroRepositoryError>;

    /// Read view for a single hero.
    async fn find_view(&self, id: HeroId) -> Result<Option<HeroView>, HeroRepositoryError>;

    async fn exists(&self, id: HeroId) -> Result<bool, HeroRepositoryError>;

    /// Id of the hero holding `alias` (exact, case-sensitive match).
    async fn find_id_by_alias(&self, alias: &str) -> Result<Option<HeroId>, HeroRepositoryError>;

    /// Insert the hero and one link per superpower id.
    async fn insert(&self, hero: &NewHero) -> Result<HeroId, HeroRepositoryError>;

    /// Overwrite scalar fields and reconcile links.
    ///
    /// Returns [`HeroRepositoryError::MissingHero`] when the row is gone.
    async fn update(&self, id: HeroId, changes: &HeroChanges) -> Result<(), HeroRepositoryError>;

    /// Remove the hero and its links. Returns `false` when nothing matched.
    async fn delete(&self, id: HeroId) -> Result<bool, HeroRepositoryError>;
}
