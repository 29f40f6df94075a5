//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_seed_repository;
mod hero_command;
mod hero_query;
mod hero_repository;
mod superpower_query;
mod superpower_repository;

#[cfg(test)]
pub use catalog_seed_repository::MockCatalogSeedRepository;
pub use catalog_seed_repository::{
    CATALOG_SEED_KEY, CatalogSeedRepository, CatalogSeedRepositoryError, SeedingResult,
};
pub use hero_command::{CreateHeroRequest, HeroCommand, HeroPayload, UpdateHeroRequest};
pub use hero_query::HeroQuery;
#[cfg(test)]
pub use hero_repository::MockHeroRepository;
pub use hero_repository::{HeroChanges, HeroRepository, HeroRepositoryError, NewHero};
pub use superpower_query::SuperpowerQuery;
#[cfg(test)]
pub use superpower_repository::MockSuperpowerRepository;
pub use superpower_repository::{SuperpowerRepository, SuperpowerRepositoryError};
