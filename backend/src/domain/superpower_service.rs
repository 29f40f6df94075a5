//! Superpower catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::hero_service::map_superpower_repository_error;
use crate::domain::ports::{SuperpowerQuery, SuperpowerRepository};
use crate::domain::{Error, Superpower, SuperpowerId};

/// Superpower service implementing the catalogue driving port.
#[derive(Clone)]
pub struct SuperpowerQueryService<S> {
    repo: Arc<S>,
}

impl<S> SuperpowerQueryService<S> {
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<S> SuperpowerQuery for SuperpowerQueryService<S>
where
    S: SuperpowerRepository,
{
    async fn list_superpowers(&self) -> Result<Vec<Superpower>, Error> {
        self.repo
            .list_by_name()
            .await
            .map_err(map_superpower_repository_error)
    }

    async fn get_superpower(&self, id: SuperpowerId) -> Result<Superpower, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_superpower_repository_error)?
            .ok_or_else(|| Error::not_found(format!("superpower {id} not found")))
    }
}
