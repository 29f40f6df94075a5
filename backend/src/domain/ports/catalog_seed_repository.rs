//! Port abstraction for applying the reference catalogue.
//!
//! Adapters apply the whole seed in one transaction and record that they did.
//! Later attempts see the record and write nothing, so restarts never
//! duplicate, overwrite or resurrect data, even after every hero is deleted.

use async_trait::async_trait;

use crate::domain::CatalogSeed;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalogue seed adapters.
    pub enum CatalogSeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue seeding connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue seeding query failed: {message}",
    }
}

/// Key under which adapters record the applied catalogue seed.
pub const CATALOG_SEED_KEY: &str = "reference-catalogue";

/// Outcome of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The seed was written.
    Applied,
    /// A seed was applied earlier; nothing was written.
    AlreadySeeded,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSeedRepository: Send + Sync {
    /// Write `seed` unless a seed has already been applied to this store.
    async fn seed_once(
        &self,
        seed: &CatalogSeed,
    ) -> Result<SeedingResult, CatalogSeedRepositoryError>;
}
