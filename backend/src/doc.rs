//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every hero, superpower and health endpoint together
//! with the request/response DTOs and the error envelope ([`ErrorSchema`],
//! [`ErrorCodeSchema`]). The document is served by Swagger UI in debug builds
//! and exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::heroes::{
    CreateHeroRequestBody, HeroResponseBody, UpdateHeroRequestBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::superpowers::SuperpowerResponseBody;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Heroes API",
        description = "CRUD catalogue of heroes and the superpowers linked to them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::heroes::list_heroes,
        crate::inbound::http::heroes::get_hero,
        crate::inbound::http::heroes::create_hero,
        crate::inbound::http::heroes::update_hero,
        crate::inbound::http::heroes::delete_hero,
        crate::inbound::http::superpowers::list_superpowers,
        crate::inbound::http::superpowers::get_superpower,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateHeroRequestBody,
        UpdateHeroRequestBody,
        HeroResponseBody,
        SuperpowerResponseBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "heroes", description = "Hero records and their superpower links"),
        (name = "superpowers", description = "Read-only superpower catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
