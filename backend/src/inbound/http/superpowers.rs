//! Superpower catalogue read endpoints.
//!
//! ```text
//! GET /api/superpowers
//! GET /api/superpowers/{id}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::{Superpower, SuperpowerId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::log_failure;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Superpower as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuperpowerResponseBody {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "Voo")]
    pub name: String,
    #[schema(example = "Habilidade de levitar e se mover pelo ar")]
    pub description: String,
}

impl From<Superpower> for SuperpowerResponseBody {
    fn from(value: Superpower) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
        }
    }
}

/// List every superpower ordered by name.
#[utoipa::path(
    get,
    path = "/api/superpowers",
    responses(
        (status = 200, description = "Superpower catalogue", body = [SuperpowerResponseBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["superpowers"],
    operation_id = "listSuperpowers"
)]
#[get("/superpowers")]
pub async fn list_superpowers(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<SuperpowerResponseBody>>> {
    debug!("listing superpowers");
    let superpowers = state
        .superpowers
        .list_superpowers()
        .await
        .inspect_err(|error| log_failure("list_superpowers", None, error))?;
    Ok(web::Json(
        superpowers
            .into_iter()
            .map(SuperpowerResponseBody::from)
            .collect(),
    ))
}

/// Fetch one superpower.
#[utoipa::path(
    get,
    path = "/api/superpowers/{id}",
    params(("id" = i32, Path, description = "Superpower identifier")),
    responses(
        (status = 200, description = "Superpower", body = SuperpowerResponseBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Superpower not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["superpowers"],
    operation_id = "getSuperpower"
)]
#[get("/superpowers/{id}")]
pub async fn get_superpower(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<SuperpowerResponseBody>> {
    let id = path.into_inner();
    debug!(superpower_id = id, "fetching superpower");
    let superpower = state
        .superpowers
        .get_superpower(SuperpowerId::new(id))
        .await
        .inspect_err(|error| log_failure("get_superpower", Some(id), error))?;
    Ok(web::Json(superpower.into()))
}
