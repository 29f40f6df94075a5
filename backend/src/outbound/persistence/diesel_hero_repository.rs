//! PostgreSQL-backed hero repository.
//!
//! Reads run in a read-only, repeatable-read transaction so a hero and its
//! links always come from the same snapshot. Writes touch the hero row and its
//! links in one transaction; `update` locks the hero row first so concurrent
//! link reconciliations for the same hero serialise.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{HeroChanges, HeroRepository, HeroRepositoryError, NewHero};
use crate::domain::{HeroId, HeroView, LinkPlan, Superpower, SuperpowerId};

use super::diesel_helpers::{
    DieselFailure, HERO_ALIAS_CONSTRAINT, classify_diesel_error, map_pool_error_message,
};
use super::models::{HeroChangesetRow, HeroRow, HeroSuperpowerRow, NewHeroRow, SuperpowerRow};
use super::pool::{DbPool, PoolError};
use super::schema::{hero_superpowers, heroes, superpowers};

const UNKNOWN_SUPERPOWER_MESSAGE: &str = "a requested superpower no longer exists";

/// Diesel-backed implementation of the hero repository port.
#[derive(Clone)]
pub struct DieselHeroRepository {
    pool: DbPool,
}

impl DieselHeroRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use heroes_api::outbound::persistence::{DbPool, DieselHeroRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/heroes")).await?;
    /// let repository = DieselHeroRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HeroRepositoryError {
    HeroRepositoryError::connection(map_pool_error_message(error))
}

fn map_read_error(error: DieselError) -> HeroRepositoryError {
    match classify_diesel_error(error, "hero read") {
        DieselFailure::Connection(message) => HeroRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation(message)
        | DieselFailure::Query(message) => HeroRepositoryError::query(message),
    }
}

/// Map write failures, attributing unique violations to `alias`.
fn map_write_error(alias: &str) -> impl FnOnce(DieselError) -> HeroRepositoryError + '_ {
    move |error| match classify_diesel_error(error, "hero write") {
        DieselFailure::Connection(message) => HeroRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint, message } => match constraint.as_deref() {
            None | Some(HERO_ALIAS_CONSTRAINT) => HeroRepositoryError::alias_conflict(alias),
            Some(_) => HeroRepositoryError::query(message),
        },
        DieselFailure::ForeignKeyViolation(_) => {
            HeroRepositoryError::unknown_superpower(UNKNOWN_SUPERPOWER_MESSAGE)
        }
        DieselFailure::Query(message) => HeroRepositoryError::query(message),
    }
}

type ViewRows = (Vec<HeroRow>, Vec<(i32, SuperpowerRow)>);

/// Load hero rows (all, or just `only`) and their links in id order.
async fn load_view_rows(
    conn: &mut AsyncPgConnection,
    only: Option<i32>,
) -> Result<ViewRows, DieselError> {
    let mut hero_query = heroes::table
        .select(HeroRow::as_select())
        .order_by(heroes::id)
        .into_boxed();
    if let Some(id) = only {
        hero_query = hero_query.filter(heroes::id.eq(id));
    }
    let hero_rows: Vec<HeroRow> = hero_query.load(conn).await?;
    if hero_rows.is_empty() {
        return Ok((hero_rows, Vec::new()));
    }

    let hero_ids: Vec<i32> = hero_rows.iter().map(|row| row.id).collect();
    let link_rows: Vec<(i32, SuperpowerRow)> = hero_superpowers::table
        .inner_join(superpowers::table)
        .filter(hero_superpowers::hero_id.eq_any(hero_ids))
        .order_by((hero_superpowers::hero_id, superpowers::id))
        .select((hero_superpowers::hero_id, SuperpowerRow::as_select()))
        .load(conn)
        .await?;
    Ok((hero_rows, link_rows))
}

fn assemble_views(rows: ViewRows) -> Result<Vec<HeroView>, HeroRepositoryError> {
    let (hero_rows, link_rows) = rows;
    let mut by_hero: HashMap<i32, Vec<Superpower>> = HashMap::new();
    for (hero_id, row) in link_rows {
        let power = Superpower::try_from(row).map_err(HeroRepositoryError::query)?;
        by_hero.entry(hero_id).or_default().push(power);
    }
    Ok(hero_rows
        .into_iter()
        .map(|row| {
            let powers = by_hero.remove(&row.id).unwrap_or_default();
            row.into_view(powers)
        })
        .collect())
}

fn link_rows(hero: HeroId, superpowers: &[SuperpowerId]) -> Vec<HeroSuperpowerRow> {
    superpowers
        .iter()
        .map(|superpower| HeroSuperpowerRow::link(hero, *superpower))
        .collect()
}

impl DieselHeroRepository {
    async fn read_views(&self, only: Option<i32>) -> Result<Vec<HeroView>, HeroRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|conn| async move { load_view_rows(conn, only).await }.scope_boxed())
            .await
            .map_err(map_read_error)?;
        assemble_views(rows)
    }
}

#[async_trait]
impl HeroRepository for DieselHeroRepository {
    async fn list_views(&self) -> Result<Vec<HeroView>, HeroRepositoryError> {
        self.read_views(None).await
    }

    async fn find_view(&self, id: HeroId) -> Result<Option<HeroView>, HeroRepositoryError> {
        Ok(self.read_views(Some(id.get())).await?.into_iter().next())
    }

    async fn exists(&self, id: HeroId) -> Result<bool, HeroRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(heroes::table.find(id.get())))
            .get_result(&mut conn)
            .await
            .map_err(map_read_error)
    }

    async fn find_id_by_alias(&self, alias: &str) -> Result<Option<HeroId>, HeroRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Option<i32> = heroes::table
            .filter(heroes::hero_name.eq(alias))
            .select(heroes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(found.map(HeroId::new))
    }

    async fn insert(&self, hero: &NewHero) -> Result<HeroId, HeroRepositoryError> {
        let row = NewHeroRow::from_profile(&hero.profile, hero.created_at);
        let requested = hero.superpower_ids.as_slice();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let id: i32 = diesel::insert_into(heroes::table)
                    .values(&row)
                    .returning(heroes::id)
                    .get_result(conn)
                    .await?;
                let id = HeroId::new(id);
                if !requested.is_empty() {
                    diesel::insert_into(hero_superpowers::table)
                        .values(&link_rows(id, requested))
                        .execute(conn)
                        .await?;
                }
                Ok(id)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_write_error(hero.profile.alias()))
    }

    async fn update(&self, id: HeroId, changes: &HeroChanges) -> Result<(), HeroRepositoryError> {
        let changeset = HeroChangesetRow::from(&changes.profile);
        let requested = &changes.superpower_ids;
        let raw_id = id.get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = conn
            .transaction(|conn| {
                async move {
                    let locked: Vec<i32> = heroes::table
                        .filter(heroes::id.eq(raw_id))
                        .select(heroes::id)
                        .for_update()
                        .load(conn)
                        .await?;
                    if locked.is_empty() {
                        return Ok(false);
                    }

                    diesel::update(heroes::table.filter(heroes::id.eq(raw_id)))
                        .set(&changeset)
                        .execute(conn)
                        .await?;

                    let existing: Vec<SuperpowerId> = hero_superpowers::table
                        .filter(hero_superpowers::hero_id.eq(raw_id))
                        .select(hero_superpowers::superpower_id)
                        .order_by(hero_superpowers::superpower_id)
                        .load::<i32>(conn)
                        .await?
                        .into_iter()
                        .map(SuperpowerId::new)
                        .collect();
                    let plan = LinkPlan::reconcile(&existing, requested);

                    if !plan.to_remove().is_empty() {
                        let stale: Vec<i32> =
                            plan.to_remove().iter().map(|power| power.get()).collect();
                        diesel::delete(
                            hero_superpowers::table
                                .filter(hero_superpowers::hero_id.eq(raw_id))
                                .filter(hero_superpowers::superpower_id.eq_any(stale)),
                        )
                        .execute(conn)
                        .await?;
                    }
                    if !plan.to_add().is_empty() {
                        diesel::insert_into(hero_superpowers::table)
                            .values(&link_rows(id, plan.to_add()))
                            .execute(conn)
                            .await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error(changes.profile.alias()))?;

        if found {
            Ok(())
        } else {
            Err(HeroRepositoryError::missing_hero(raw_id))
        }
    }

    async fn delete(&self, id: HeroId) -> Result<bool, HeroRepositoryError> {
        let raw_id = id.get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(hero_superpowers::table.filter(hero_superpowers::hero_id.eq(raw_id)))
                    .execute(conn)
                    .await?;
                let removed = diesel::delete(heroes::table.filter(heroes::id.eq(raw_id)))
                    .execute(conn)
                    .await?;
                Ok::<_, DieselError>(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for hero row assembly and write error mapping.
    use chrono::{TimeZone, Utc};
    use diesel::result::DatabaseErrorKind;
    use rstest::rstest;

    use super::*;

    fn hero_row(id: i32, alias: &str) -> HeroRow {
        let at = Utc
            .with_ymd_and_hms(2025, 9, 6, 13, 22, 0)
            .single()
            .expect("valid timestamp");
        HeroRow {
            id,
            name: format!("Person {id}"),
            hero_name: alias.to_owned(),
            birth_date: at,
            height: 1.8,
            weight: 80.0,
            created_at: at,
        }
    }

    fn power_row(id: i32, name: &str) -> SuperpowerRow {
        SuperpowerRow {
            id,
            name: name.to_owned(),
            description: String::new(),
        }
    }

    #[rstest]
    fn assemble_groups_links_under_their_hero() {
        let views = assemble_views((
            vec![hero_row(1, "Flash"), hero_row(2, "Ciclope")],
            vec![(1, power_row(2, "Voo")), (1, power_row(5, "Velocidade"))],
        ))
        .expect("rows are valid");

        assert_eq!(views.len(), 2);
        let first: Vec<i32> = views[0]
            .superpowers
            .iter()
            .map(|power| power.id().get())
            .collect();
        assert_eq!(first, vec![2, 5]);
        assert!(views[1].superpowers.is_empty());
    }

    #[rstest]
    fn assemble_rejects_corrupt_superpower_rows() {
        let error = assemble_views((vec![hero_row(1, "Flash")], vec![(1, power_row(2, "  "))]))
            .expect_err("blank name rejected");
        assert!(matches!(error, HeroRepositoryError::Query { .. }));
    }

    #[rstest]
    fn unique_violation_becomes_alias_conflict() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        assert_eq!(
            map_write_error("Flash")(error),
            HeroRepositoryError::alias_conflict("Flash")
        );
    }

    #[rstest]
    fn foreign_key_violation_becomes_unknown_superpower() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key constraint".to_owned()),
        );
        assert!(matches!(
            map_write_error("Flash")(error),
            HeroRepositoryError::UnknownSuperpower { .. }
        ));
    }

    #[rstest]
    fn closed_connection_becomes_connection_error() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert!(matches!(
            map_read_error(error),
            HeroRepositoryError::Connection { .. }
        ));
    }
}
