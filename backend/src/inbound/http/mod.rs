//! HTTP inbound adapter exposing the hero and superpower REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod heroes;
pub mod schemas;
pub mod state;
pub mod superpowers;
pub mod validation;

pub use error::ApiResult;

/// `/api` scope with every catalogue endpoint and extractor error handling.
///
/// Handlers read [`state::HttpState`] from application data, so callers must
/// register it on the enclosing `App`.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .app_data(validation::json_config())
        .app_data(validation::path_config())
        .service(heroes::list_heroes)
        .service(heroes::get_hero)
        .service(heroes::create_hero)
        .service(heroes::update_hero)
        .service(heroes::delete_hero)
        .service(superpowers::list_superpowers)
        .service(superpowers::get_superpower)
}
