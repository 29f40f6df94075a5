//! Driven port for the superpower reference catalogue.

use async_trait::async_trait;

use crate::domain::{Superpower, SuperpowerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by superpower repository adapters.
    pub enum SuperpowerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "superpower repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "superpower repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SuperpowerRepository: Send + Sync {
    /// All superpowers ordered by name using the store's collation.
    async fn list_by_name(&self) -> Result<Vec<Superpower>, SuperpowerRepositoryError>;

    async fn find_by_id(
        &self,
        id: SuperpowerId,
    ) -> Result<Option<Superpower>, SuperpowerRepositoryError>;

    /// The subset of `ids` that exist, in no particular order.
    async fn existing_ids(
        &self,
        ids: &[SuperpowerId],
    ) -> Result<Vec<SuperpowerId>, SuperpowerRepositoryError>;
}
