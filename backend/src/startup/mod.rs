//! Startup wiring: schema migrations and reference catalogue seeding.

mod migrations;
mod seeding;

pub use migrations::{MigrationError, run_migrations};
pub use seeding::{StartupSeedingError, seed_catalog_on_startup};
