//! PostgreSQL-backed catalogue seeding adapter.
//!
//! The seed is applied in a single transaction that first claims a
//! `catalog_seed_runs` row. Concurrent instances starting against the same
//! database apply it at most once, and a database whose heroes were all
//! deleted is not reseeded. Seeded rows keep their reference ids; the serial
//! sequences are moved past them afterwards.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{
    CATALOG_SEED_KEY, CatalogSeedRepository, CatalogSeedRepositoryError, SeedingResult,
};
use crate::domain::{CatalogSeed, SeedHero};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::models::{HeroSuperpowerRow, NewCatalogSeedRunRow, NewSuperpowerRow, SeedHeroRow};
use super::pool::{DbPool, PoolError};
use super::schema::{catalog_seed_runs, hero_superpowers, heroes, superpowers};

const LOCK_HEROES_SQL: &str = "LOCK TABLE heroes IN SHARE ROW EXCLUSIVE MODE";
const RESET_HERO_SEQUENCE_SQL: &str = "SELECT setval(pg_get_serial_sequence('heroes', 'id'), \
     (SELECT COALESCE(MAX(id), 0) + 1 FROM heroes), false)";
const RESET_SUPERPOWER_SEQUENCE_SQL: &str =
    "SELECT setval(pg_get_serial_sequence('superpowers', 'id'), \
     (SELECT COALESCE(MAX(id), 0) + 1 FROM superpowers), false)";

/// Diesel-backed implementation of the catalogue seeding port.
#[derive(Clone)]
pub struct DieselCatalogSeedRepository {
    pool: DbPool,
}

impl DieselCatalogSeedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogSeedRepositoryError {
    CatalogSeedRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogSeedRepositoryError {
    match classify_diesel_error(error, "catalogue seed") {
        DieselFailure::Connection(message) => CatalogSeedRepositoryError::connection(message),
        DieselFailure::UniqueViolation { message, .. }
        | DieselFailure::ForeignKeyViolation(message)
        | DieselFailure::Query(message) => CatalogSeedRepositoryError::query(message),
    }
}

fn seed_hero_row(hero: &SeedHero) -> SeedHeroRow<'_> {
    SeedHeroRow {
        id: hero.id.get(),
        name: hero.profile.name(),
        hero_name: hero.profile.alias(),
        birth_date: hero.profile.birth_date(),
        height: hero.profile.height(),
        weight: hero.profile.weight(),
        created_at: hero.created_at,
    }
}

fn seed_link_rows(seed: &CatalogSeed) -> Vec<HeroSuperpowerRow> {
    seed.heroes()
        .iter()
        .flat_map(|hero| {
            hero.superpower_ids
                .iter()
                .map(move |superpower| HeroSuperpowerRow::link(hero.id, superpower))
        })
        .collect()
}

#[async_trait]
impl CatalogSeedRepository for DieselCatalogSeedRepository {
    async fn seed_once(
        &self,
        seed: &CatalogSeed,
    ) -> Result<SeedingResult, CatalogSeedRepositoryError> {
        let superpower_rows: Vec<NewSuperpowerRow<'_>> =
            seed.superpowers().iter().map(NewSuperpowerRow::from).collect();
        let hero_rows: Vec<SeedHeroRow<'_>> = seed.heroes().iter().map(seed_hero_row).collect();
        let link_rows = seed_link_rows(seed);
        let run = NewCatalogSeedRunRow {
            seed_key: CATALOG_SEED_KEY,
            hero_count: i32::try_from(hero_rows.len()).unwrap_or(i32::MAX),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                sql_query(LOCK_HEROES_SQL).execute(conn).await?;
                let claimed = diesel::insert_into(catalog_seed_runs::table)
                    .values(&run)
                    .on_conflict(catalog_seed_runs::seed_key)
                    .do_nothing()
                    .execute(conn)
                    .await?;
                if claimed == 0 {
                    return Ok(SeedingResult::AlreadySeeded);
                }

                if !superpower_rows.is_empty() {
                    diesel::insert_into(superpowers::table)
                        .values(&superpower_rows)
                        .on_conflict(superpowers::id)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                if !hero_rows.is_empty() {
                    diesel::insert_into(heroes::table)
                        .values(&hero_rows)
                        .execute(conn)
                        .await?;
                }
                if !link_rows.is_empty() {
                    diesel::insert_into(hero_superpowers::table)
                        .values(&link_rows)
                        .on_conflict_do_nothing()
                        .execute(conn)
                        .await?;
                }

                sql_query(RESET_HERO_SEQUENCE_SQL).execute(conn).await?;
                sql_query(RESET_SUPERPOWER_SEQUENCE_SQL)
                    .execute(conn)
                    .await?;
                Ok(SeedingResult::Applied)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for seed row mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reference_seed_produces_one_row_per_link() {
        let seed = CatalogSeed::reference().expect("bundled seed is valid");
        let links = seed_link_rows(&seed);

        assert_eq!(links.len(), seed.link_count());
        let first: Vec<i32> = links
            .iter()
            .filter(|link| link.hero_id == 1)
            .map(|link| link.superpower_id)
            .collect();
        assert_eq!(first, vec![1, 2, 6, 19]);
    }

    #[rstest]
    fn seeded_heroes_keep_reference_ids() {
        let seed = CatalogSeed::reference().expect("bundled seed is valid");
        let rows: Vec<SeedHeroRow<'_>> = seed.heroes().iter().map(seed_hero_row).collect();

        assert_eq!(<[_]>::first(&rows).map(|row| (row.id, row.hero_name)), Some((1, "Super-Homem")));
    }

    #[rstest]
    fn connection_loss_maps_to_connection_error() {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("gone".to_owned()),
        ));
        assert_eq!(error, CatalogSeedRepositoryError::connection("gone"));
    }
}
