//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the hero, superpower and catalogue seed ports
//! backed by PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Validation and association rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic writes**: every hero mutation runs in one transaction; updates
//!   lock the hero row before reconciling links.
//!
//! # Example
//!
//! ```rust,no_run
//! use heroes_api::outbound::persistence::{DbPool, DieselHeroRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/heroes")).await?;
//! let repo = DieselHeroRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_catalog_seed_repository;
mod diesel_helpers;
mod diesel_hero_repository;
mod diesel_superpower_repository;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_seed_repository::DieselCatalogSeedRepository;
pub use diesel_hero_repository::DieselHeroRepository;
pub use diesel_superpower_repository::DieselSuperpowerRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
