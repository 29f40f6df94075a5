//! Hero HTTP handlers.
//!
//! ```text
//! GET    /api/hero
//! GET    /api/hero/{id}
//! POST   /api/hero
//! PUT    /api/hero/{id}
//! DELETE /api/hero/{id}
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::domain::ports::{CreateHeroRequest, HeroPayload, UpdateHeroRequest};
use crate::domain::{Error, HeroId, HeroView, SuperpowerId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::log_failure;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::superpowers::SuperpowerResponseBody;
use crate::inbound::http::validation::{FieldName, parse_birth_date};

/// Request payload for creating a hero.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHeroRequestBody {
    #[schema(example = "Clark Kent")]
    pub name: String,
    /// Unique alias. `alias` is accepted as a synonym.
    #[serde(alias = "alias")]
    #[schema(example = "Super-Homem")]
    pub hero_name: String,
    /// RFC 3339 timestamp, offset-less timestamp (UTC) or `YYYY-MM-DD`.
    #[schema(example = "1980-02-29")]
    pub birth_date: String,
    #[schema(example = 1.91)]
    pub height: f64,
    #[schema(example = 107.5)]
    pub weight: f64,
    /// Superpowers to link; duplicates are ignored.
    #[schema(example = json!([1, 2]))]
    pub superpower_ids: Vec<i32>,
}

/// Request payload for replacing a hero.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHeroRequestBody {
    /// Must equal the path identifier.
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Clark Kent")]
    pub name: String,
    #[serde(alias = "alias")]
    #[schema(example = "Super-Homem")]
    pub hero_name: String,
    #[schema(example = "1980-02-29")]
    pub birth_date: String,
    #[schema(example = 1.91)]
    pub height: f64,
    #[schema(example = 107.5)]
    pub weight: f64,
    /// Complete replacement link set; an empty list unlinks everything.
    #[schema(example = json!([2, 7]))]
    pub superpower_ids: Vec<i32>,
}

/// Hero read view returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroResponseBody {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Clark Kent")]
    pub name: String,
    #[schema(example = "Super-Homem")]
    pub hero_name: String,
    pub birth_date: DateTime<Utc>,
    pub height: f64,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    /// Linked superpowers ordered by id.
    pub superpowers: Vec<SuperpowerResponseBody>,
}

impl From<HeroView> for HeroResponseBody {
    fn from(value: HeroView) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            hero_name: value.hero_name,
            birth_date: value.birth_date,
            height: value.height,
            weight: value.weight,
            created_at: value.created_at,
            superpowers: value
                .superpowers
                .into_iter()
                .map(SuperpowerResponseBody::from)
                .collect(),
        }
    }
}

fn superpower_ids(raw: Vec<i32>) -> Vec<SuperpowerId> {
    raw.into_iter().map(SuperpowerId::new).collect()
}

impl TryFrom<CreateHeroRequestBody> for HeroPayload {
    type Error = Error;

    fn try_from(body: CreateHeroRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            birth_date: parse_birth_date(&body.birth_date, FieldName::new("birthDate"))?,
            name: body.name,
            hero_name: body.hero_name,
            height: body.height,
            weight: body.weight,
            superpower_ids: superpower_ids(body.superpower_ids),
        })
    }
}

fn parse_update(path_id: i32, body: UpdateHeroRequestBody) -> Result<UpdateHeroRequest, Error> {
    Ok(UpdateHeroRequest {
        id: HeroId::new(path_id),
        body_id: HeroId::new(body.id),
        hero: HeroPayload {
            birth_date: parse_birth_date(&body.birth_date, FieldName::new("birthDate"))?,
            name: body.name,
            hero_name: body.hero_name,
            height: body.height,
            weight: body.weight,
            superpower_ids: superpower_ids(body.superpower_ids),
        },
    })
}

/// List every hero with its superpowers.
#[utoipa::path(
    get,
    path = "/api/hero",
    responses(
        (status = 200, description = "Heroes ordered by id", body = [HeroResponseBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["heroes"],
    operation_id = "listHeroes"
)]
#[get("/hero")]
pub async fn list_heroes(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<HeroResponseBody>>> {
    debug!("listing heroes");
    let heroes = state
        .heroes_query
        .list_heroes()
        .await
        .inspect_err(|error| log_failure("list_heroes", None, error))?;
    Ok(web::Json(
        heroes.into_iter().map(HeroResponseBody::from).collect(),
    ))
}

/// Fetch one hero.
#[utoipa::path(
    get,
    path = "/api/hero/{id}",
    params(("id" = i32, Path, description = "Hero identifier")),
    responses(
        (status = 200, description = "Hero", body = HeroResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Hero not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["heroes"],
    operation_id = "getHero"
)]
#[get("/hero/{id}")]
pub async fn get_hero(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<HeroResponseBody>> {
    let id = path.into_inner();
    debug!(hero_id = id, "fetching hero");
    let hero = state
        .heroes_query
        .get_hero(HeroId::new(id))
        .await
        .inspect_err(|error| log_failure("get_hero", Some(id), error))?;
    Ok(web::Json(hero.into()))
}

/// Create a hero and link its superpowers.
#[utoipa::path(
    post,
    path = "/api/hero",
    request_body = CreateHeroRequestBody,
    responses(
        (
            status = 201,
            description = "Hero created",
            headers(("Location" = String, description = "URL of the new hero")),
            body = HeroResponseBody
        ),
        (
            status = 400,
            description = "Invalid fields, alias conflict or unknown superpower",
            body = ErrorSchema
        ),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["heroes"],
    operation_id = "createHero"
)]
#[post("/hero")]
pub async fn create_hero(
    state: web::Data<HttpState>,
    payload: web::Json<CreateHeroRequestBody>,
) -> ApiResult<HttpResponse> {
    let created = async {
        let hero = HeroPayload::try_from(payload.into_inner())?;
        state.heroes.create_hero(CreateHeroRequest { hero }).await
    }
    .await
    .inspect_err(|error| log_failure("create_hero", None, error))?;

    info!(hero_id = created.id.get(), "hero created");
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/hero/{}", created.id)))
        .json(HeroResponseBody::from(created)))
}

/// Replace a hero's fields and superpower links.
#[utoipa::path(
    put,
    path = "/api/hero/{id}",
    params(("id" = i32, Path, description = "Hero identifier")),
    request_body = UpdateHeroRequestBody,
    responses(
        (status = 200, description = "Updated hero", body = HeroResponseBody),
        (
            status = 400,
            description = "Invalid fields, id mismatch, alias conflict or unknown superpower",
            body = ErrorSchema
        ),
        (status = 404, description = "Hero not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["heroes"],
    operation_id = "updateHero"
)]
#[put("/hero/{id}")]
pub async fn update_hero(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
    payload: web::Json<UpdateHeroRequestBody>,
) -> ApiResult<web::Json<HeroResponseBody>> {
    let id = path.into_inner();
    let updated = async {
        let request = parse_update(id, payload.into_inner())?;
        state.heroes.update_hero(request).await?;
        state.heroes_query.get_hero(HeroId::new(id)).await
    }
    .await
    .inspect_err(|error| log_failure("update_hero", Some(id), error))?;

    info!(hero_id = id, "hero updated");
    Ok(web::Json(updated.into()))
}

/// Delete a hero and its superpower links.
#[utoipa::path(
    delete,
    path = "/api/hero/{id}",
    params(("id" = i32, Path, description = "Hero identifier")),
    responses(
        (status = 204, description = "Hero deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Hero not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["heroes"],
    operation_id = "deleteHero"
)]
#[delete("/hero/{id}")]
pub async fn delete_hero(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    state
        .heroes
        .delete_hero(HeroId::new(id))
        .await
        .inspect_err(|error| log_failure("delete_hero", Some(id), error))?;

    info!(hero_id = id, "hero deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "heroes_tests.rs"]
mod tests;
