//! Hero domain services.
//!
//! [`HeroCommandService`] is the association manager: it validates create and
//! update requests against the catalogue before delegating the atomic write to
//! the repository. [`HeroQueryService`] serves the read views. Neither logs;
//! failures are returned as typed [`Error`]s for the inbound adapter to report.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    CreateHeroRequest, HeroChanges, HeroCommand, HeroPayload, HeroQuery, HeroRepository,
    HeroRepositoryError, NewHero, SuperpowerRepository, SuperpowerRepositoryError,
    UpdateHeroRequest,
};
use crate::domain::{
    Error, HeroDraft, HeroId, HeroProfile, HeroValidationError, HeroView, SuperpowerId,
    SuperpowerIds,
};

pub(crate) fn map_hero_repository_error(error: HeroRepositoryError) -> Error {
    match error {
        HeroRepositoryError::Connection { message } => {
            Error::internal(format!("hero repository unavailable: {message}"))
        }
        HeroRepositoryError::Query { message } => {
            Error::internal(format!("hero repository error: {message}"))
        }
        HeroRepositoryError::AliasConflict { alias } => alias_conflict(&alias),
        HeroRepositoryError::UnknownSuperpower { message } => Error::invalid_reference(message),
        HeroRepositoryError::MissingHero { id } => hero_not_found(HeroId::new(id)),
    }
}

pub(crate) fn map_superpower_repository_error(error: SuperpowerRepositoryError) -> Error {
    match error {
        SuperpowerRepositoryError::Connection { message } => {
            Error::internal(format!("superpower repository unavailable: {message}"))
        }
        SuperpowerRepositoryError::Query { message } => {
            Error::internal(format!("superpower repository error: {message}"))
        }
    }
}

fn map_validation_error(error: HeroValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn alias_conflict(alias: &str) -> Error {
    Error::conflict(format!("hero alias '{alias}' already exists"))
        .with_details(json!({ "heroName": alias }))
}

fn hero_not_found(id: HeroId) -> Error {
    Error::not_found(format!("hero {id} not found"))
}

fn validate_payload(payload: HeroPayload) -> Result<(HeroProfile, SuperpowerIds), Error> {
    let HeroPayload {
        name,
        hero_name,
        birth_date,
        height,
        weight,
        superpower_ids,
    } = payload;
    let profile = HeroProfile::new(HeroDraft {
        name,
        alias: hero_name,
        birth_date,
        height,
        weight,
    })
    .map_err(map_validation_error)?;
    Ok((profile, SuperpowerIds::from_requested(superpower_ids)))
}

/// Hero service implementing the mutation driving port.
#[derive(Clone)]
pub struct HeroCommandService<H, S> {
    hero_repo: Arc<H>,
    superpower_repo: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<H, S> HeroCommandService<H, S> {
    /// Create a command service; `clock` stamps `createdAt` on new heroes.
    pub fn new(hero_repo: Arc<H>, superpower_repo: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            hero_repo,
            superpower_repo,
            clock,
        }
    }
}

impl<H, S> HeroCommandService<H, S>
where
    H: HeroRepository,
    S: SuperpowerRepository,
{
    /// Fail with `Conflict` if a hero other than `owner` holds `alias`.
    async fn ensure_alias_available(&self, alias: &str, owner: Option<HeroId>) -> Result<(), Error> {
        let holder = self
            .hero_repo
            .find_id_by_alias(alias)
            .await
            .map_err(map_hero_repository_error)?;
        match holder {
            Some(holder) if Some(holder) != owner => Err(alias_conflict(alias)),
            _ => Ok(()),
        }
    }

    /// Fail with `InvalidReference` naming the first unknown id in request order.
    async fn ensure_superpowers_exist(&self, ids: &SuperpowerIds) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let found: HashSet<SuperpowerId> = self
            .superpower_repo
            .existing_ids(ids.as_slice())
            .await
            .map_err(map_superpower_repository_error)?
            .into_iter()
            .collect();
        let missing: Vec<i32> = ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(SuperpowerId::get)
            .collect();
        match missing.first() {
            Some(first) => Err(Error::invalid_reference(format!("superpower {first} not found"))
                .with_details(json!({ "missingSuperpowerIds": missing }))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<H, S> HeroCommand for HeroCommandService<H, S>
where
    H: HeroRepository,
    S: SuperpowerRepository,
{
    async fn create_hero(&self, request: CreateHeroRequest) -> Result<HeroView, Error> {
        let (profile, superpower_ids) = validate_payload(request.hero)?;
        self.ensure_alias_available(profile.alias(), None).await?;
        self.ensure_superpowers_exist(&superpower_ids).await?;

        let new_hero = NewHero {
            profile,
            created_at: self.clock.utc(),
            superpower_ids,
        };
        let id = self
            .hero_repo
            .insert(&new_hero)
            .await
            .map_err(map_hero_repository_error)?;

        self.hero_repo
            .find_view(id)
            .await
            .map_err(map_hero_repository_error)?
            .ok_or_else(|| Error::internal(format!("hero {id} missing after creation")))
    }

    async fn update_hero(&self, request: UpdateHeroRequest) -> Result<(), Error> {
        let UpdateHeroRequest { id, body_id, hero } = request;
        if id != body_id {
            return Err(Error::id_mismatch(format!(
                "path id {id} does not match body id {body_id}"
            ))
            .with_details(json!({ "pathId": id, "bodyId": body_id })));
        }

        let (profile, superpower_ids) = validate_payload(hero)?;
        if !self
            .hero_repo
            .exists(id)
            .await
            .map_err(map_hero_repository_error)?
        {
            return Err(hero_not_found(id));
        }
        self.ensure_alias_available(profile.alias(), Some(id)).await?;
        self.ensure_superpowers_exist(&superpower_ids).await?;

        let changes = HeroChanges {
            profile,
            superpower_ids,
        };
        self.hero_repo
            .update(id, &changes)
            .await
            .map_err(map_hero_repository_error)
    }

    async fn delete_hero(&self, id: HeroId) -> Result<(), Error> {
        let deleted = self
            .hero_repo
            .delete(id)
            .await
            .map_err(map_hero_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(hero_not_found(id))
        }
    }

    async fn hero_exists(&self, id: HeroId) -> Result<bool, Error> {
        self.hero_repo
            .exists(id)
            .await
            .map_err(map_hero_repository_error)
    }
}

/// Hero service implementing the read driving port.
#[derive(Clone)]
pub struct HeroQueryService<H> {
    hero_repo: Arc<H>,
}

impl<H> HeroQueryService<H> {
    /// Build a query service over the hero repository.
    pub fn new(hero_repo: Arc<H>) -> Self {
        Self { hero_repo }
    }
}

#[async_trait]
impl<H> HeroQuery for HeroQueryService<H>
where
    H: HeroRepository,
{
    async fn list_heroes(&self) -> Result<Vec<HeroView>, Error> {
        self.hero_repo
            .list_views()
            .await
            .map_err(map_hero_repository_error)
    }

    async fn get_hero(&self, id: HeroId) -> Result<HeroView, Error> {
        self.hero_repo
            .find_view(id)
            .await
            .map_err(map_hero_repository_error)?
            .ok_or_else(|| hero_not_found(id))
    }
}

#[cfg(test)]
#[path = "hero_service_tests.rs"]
mod tests;
