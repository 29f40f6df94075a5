//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed catalogue entities used by the API and
//! persistence layers, plus the services that enforce hero invariants. Keep
//! types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and its stable identifier.
//! - HeroProfile / HeroView: validated hero fields and the read view.
//! - Superpower: read-only catalogue entry.
//! - SuperpowerIds / LinkPlan: deduplicated link requests and their diff.
//! - CatalogSeed: reference data applied to an empty store.
//! - HeroCommandService / HeroQueryService / SuperpowerQueryService.

pub mod catalog_seed;
pub mod error;
pub mod hero;
pub mod hero_links;
pub mod hero_service;
pub mod ports;
pub mod superpower;
pub mod superpower_service;
pub mod trace_id;

pub use self::catalog_seed::{CatalogSeed, CatalogSeedError, SeedHero};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::hero::{
    HERO_TEXT_MAX, HeroDraft, HeroId, HeroProfile, HeroValidationError, HeroView,
};
pub use self::hero_links::{LinkPlan, SuperpowerIds};
pub use self::hero_service::{HeroCommandService, HeroQueryService};
pub use self::superpower::{
    SUPERPOWER_DESCRIPTION_MAX, SUPERPOWER_NAME_MAX, Superpower, SuperpowerId,
    SuperpowerValidationError,
};
pub use self::superpower_service::SuperpowerQueryService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
