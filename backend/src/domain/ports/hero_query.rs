//! Driving port for hero read views.

use async_trait::async_trait;

use crate::domain::{Error, HeroId, HeroView};

#[async_trait]
pub trait HeroQuery: Send + Sync {
    /// Every hero ordered by id.
    async fn list_heroes(&self) -> Result<Vec<HeroView>, Error>;

    /// A single hero, or `NotFound`.
    async fn get_hero(&self, id: HeroId) -> Result<HeroView, Error>;
}
