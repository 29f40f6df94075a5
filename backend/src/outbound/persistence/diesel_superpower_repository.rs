//! PostgreSQL-backed superpower catalogue adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SuperpowerRepository, SuperpowerRepositoryError};
use crate::domain::{Superpower, SuperpowerId};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::SuperpowerRow;
use super::pool::{DbPool, PoolError};
use super::schema::superpowers;

/// Diesel-backed implementation of the superpower repository port.
#[derive(Clone)]
pub struct DieselSuperpowerRepository {
    pool: DbPool,
}

impl DieselSuperpowerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SuperpowerRepositoryError {
    SuperpowerRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> SuperpowerRepositoryError {
    match classify_diesel_error(error, "superpower read") {
        DieselFailure::Connection(message) => SuperpowerRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation(message)
        | DieselFailure::Query(message) => SuperpowerRepositoryError::query(message),
    }
}

fn row_to_superpower(row: SuperpowerRow) -> Result<Superpower, SuperpowerRepositoryError> {
    Superpower::try_from(row).map_err(SuperpowerRepositoryError::query)
}

#[async_trait]
impl SuperpowerRepository for DieselSuperpowerRepository {
    async fn list_by_name(&self) -> Result<Vec<Superpower>, SuperpowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SuperpowerRow> = superpowers::table
            .select(SuperpowerRow::as_select())
            .order_by((superpowers::name, superpowers::id))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_superpower).collect()
    }

    async fn find_by_id(
        &self,
        id: SuperpowerId,
    ) -> Result<Option<Superpower>, SuperpowerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SuperpowerRow> = superpowers::table
            .filter(superpowers::id.eq(id.get()))
            .select(SuperpowerRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_superpower).transpose()
    }

    async fn existing_ids(
        &self,
        ids: &[SuperpowerId],
    ) -> Result<Vec<SuperpowerId>, SuperpowerRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Vec<i32> = superpowers::table
            .filter(superpowers::id.eq_any(raw))
            .select(superpowers::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(found.into_iter().map(SuperpowerId::new).collect())
    }
}
