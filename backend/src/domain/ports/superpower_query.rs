//! Driving port for the superpower catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Superpower, SuperpowerId};

#[async_trait]
pub trait SuperpowerQuery: Send + Sync {
    /// All superpowers ordered by name.
    async fn list_superpowers(&self) -> Result<Vec<Superpower>, Error>;

    /// A single superpower, or `NotFound`.
    async fn get_superpower(&self, id: SuperpowerId) -> Result<Superpower, Error>;
}
