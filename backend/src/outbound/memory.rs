//! Process-local catalogue store.
//!
//! Implements the hero, superpower and seed ports over a mutex-guarded map so
//! the API can run without PostgreSQL (local development, integration tests).
//! Every operation takes the lock once, which makes each write atomic and
//! gives reads a consistent view. Data is lost when the process exits.
//!
//! Superpower names sort by Unicode code point here, which can differ from a
//! PostgreSQL collation for accented names.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CatalogSeedRepository, CatalogSeedRepositoryError, HeroChanges, HeroRepository,
    HeroRepositoryError, NewHero, SeedingResult, SuperpowerRepository, SuperpowerRepositoryError,
};
use crate::domain::{
    CatalogSeed, HeroId, HeroProfile, HeroView, LinkPlan, Superpower, SuperpowerId,
};

const POISONED: &str = "in-memory catalogue lock poisoned";

#[derive(Debug, Clone)]
struct StoredHero {
    profile: HeroProfile,
    created_at: DateTime<Utc>,
    links: BTreeSet<SuperpowerId>,
}

#[derive(Debug, Default)]
struct CatalogState {
    heroes: BTreeMap<HeroId, StoredHero>,
    superpowers: BTreeMap<SuperpowerId, Superpower>,
    next_hero_id: i32,
    seeded: bool,
}

impl CatalogState {
    fn view(&self, id: HeroId, hero: &StoredHero) -> HeroView {
        HeroView {
            id,
            name: hero.profile.name().to_owned(),
            hero_name: hero.profile.alias().to_owned(),
            birth_date: hero.profile.birth_date(),
            height: hero.profile.height(),
            weight: hero.profile.weight(),
            created_at: hero.created_at,
            superpowers: hero
                .links
                .iter()
                .filter_map(|link| self.superpowers.get(link).cloned())
                .collect(),
        }
    }

    fn alias_holder(&self, alias: &str) -> Option<HeroId> {
        self.heroes
            .iter()
            .find(|(_, hero)| hero.profile.alias() == alias)
            .map(|(id, _)| *id)
    }

    fn ensure_alias_free(&self, alias: &str, owner: Option<HeroId>) -> Result<(), HeroRepositoryError> {
        match self.alias_holder(alias) {
            Some(holder) if Some(holder) != owner => Err(HeroRepositoryError::alias_conflict(alias)),
            _ => Ok(()),
        }
    }

    fn ensure_known(&self, ids: impl IntoIterator<Item = SuperpowerId>) -> Result<(), HeroRepositoryError> {
        match ids.into_iter().find(|id| !self.superpowers.contains_key(id)) {
            Some(missing) => Err(HeroRepositoryError::unknown_superpower(format!(
                "superpower {missing} not found"
            ))),
            None => Ok(()),
        }
    }
}

/// Catalogue store held in process memory.
///
/// Clones share the same underlying state.
///
/// # Examples
/// ```
/// use heroes_api::outbound::memory::InMemoryCatalogStore;
///
/// let store = InMemoryCatalogStore::new();
/// let shared = store.clone();
/// # let _ = shared;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryCatalogStore {
    state: Arc<Mutex<CatalogState>>,
}

impl Default for InMemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CatalogState {
                next_hero_id: 1,
                ..CatalogState::default()
            })),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, CatalogState>> {
        self.state.lock().ok()
    }

    fn lock_heroes(&self) -> Result<MutexGuard<'_, CatalogState>, HeroRepositoryError> {
        self.lock().ok_or_else(|| HeroRepositoryError::connection(POISONED))
    }

    fn lock_superpowers(&self) -> Result<MutexGuard<'_, CatalogState>, SuperpowerRepositoryError> {
        self.lock()
            .ok_or_else(|| SuperpowerRepositoryError::connection(POISONED))
    }
}

#[async_trait]
impl HeroRepository for InMemoryCatalogStore {
    async fn list_views(&self) -> Result<Vec<HeroView>, HeroRepositoryError> {
        let state = self.lock_heroes()?;
        Ok(state
            .heroes
            .iter()
            .map(|(id, hero)| state.view(*id, hero))
            .collect())
    }

    async fn find_view(&self, id: HeroId) -> Result<Option<HeroView>, HeroRepositoryError> {
        let state = self.lock_heroes()?;
        Ok(state.heroes.get(&id).map(|hero| state.view(id, hero)))
    }

    async fn exists(&self, id: HeroId) -> Result<bool, HeroRepositoryError> {
        Ok(self.lock_heroes()?.heroes.contains_key(&id))
    }

    async fn find_id_by_alias(&self, alias: &str) -> Result<Option<HeroId>, HeroRepositoryError> {
        Ok(self.lock_heroes()?.alias_holder(alias))
    }

    async fn insert(&self, hero: &NewHero) -> Result<HeroId, HeroRepositoryError> {
        let mut state = self.lock_heroes()?;
        state.ensure_alias_free(hero.profile.alias(), None)?;
        state.ensure_known(hero.superpower_ids.iter())?;

        let id = HeroId::new(state.next_hero_id);
        state.next_hero_id += 1;
        state.heroes.insert(
            id,
            StoredHero {
                profile: hero.profile.clone(),
                created_at: hero.created_at,
                links: hero.superpower_ids.iter().collect(),
            },
        );
        Ok(id)
    }

    async fn update(&self, id: HeroId, changes: &HeroChanges) -> Result<(), HeroRepositoryError> {
        let mut state = self.lock_heroes()?;
        if !state.heroes.contains_key(&id) {
            return Err(HeroRepositoryError::missing_hero(id.get()));
        }
        state.ensure_alias_free(changes.profile.alias(), Some(id))?;
        state.ensure_known(changes.superpower_ids.iter())?;

        let hero = state
            .heroes
            .get_mut(&id)
            .ok_or_else(|| HeroRepositoryError::missing_hero(id.get()))?;
        let existing: Vec<SuperpowerId> = hero.links.iter().copied().collect();
        let plan = LinkPlan::reconcile(&existing, &changes.superpower_ids);
        for stale in plan.to_remove() {
            hero.links.remove(stale);
        }
        hero.links.extend(plan.to_add().iter().copied());
        hero.profile = changes.profile.clone();
        Ok(())
    }

    async fn delete(&self, id: HeroId) -> Result<bool, HeroRepositoryError> {
        Ok(self.lock_heroes()?.heroes.remove(&id).is_some())
    }
}

#[async_trait]
impl SuperpowerRepository for InMemoryCatalogStore {
    async fn list_by_name(&self) -> Result<Vec<Superpower>, SuperpowerRepositoryError> {
        let state = self.lock_superpowers()?;
        let mut powers: Vec<Superpower> = state.superpowers.values().cloned().collect();
        powers.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(powers)
    }

    async fn find_by_id(
        &self,
        id: SuperpowerId,
    ) -> Result<Option<Superpower>, SuperpowerRepositoryError> {
        Ok(self.lock_superpowers()?.superpowers.get(&id).cloned())
    }

    async fn existing_ids(
        &self,
        ids: &[SuperpowerId],
    ) -> Result<Vec<SuperpowerId>, SuperpowerRepositoryError> {
        let state = self.lock_superpowers()?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.superpowers.contains_key(id))
            .collect())
    }
}

#[async_trait]
impl CatalogSeedRepository for InMemoryCatalogStore {
    async fn seed_once(
        &self,
        seed: &CatalogSeed,
    ) -> Result<SeedingResult, CatalogSeedRepositoryError> {
        let mut state = self
            .lock()
            .ok_or_else(|| CatalogSeedRepositoryError::connection(POISONED))?;
        if state.seeded {
            return Ok(SeedingResult::AlreadySeeded);
        }
        state.seeded = true;

        for power in seed.superpowers() {
            state
                .superpowers
                .entry(power.id())
                .or_insert_with(|| power.clone());
        }
        for hero in seed.heroes() {
            state.heroes.insert(
                hero.id,
                StoredHero {
                    profile: hero.profile.clone(),
                    created_at: hero.created_at,
                    links: hero.superpower_ids.iter().collect(),
                },
            );
        }
        let highest = state.heroes.keys().next_back().map_or(0, |id| id.get());
        state.next_hero_id = state.next_hero_id.max(highest + 1);
        Ok(SeedingResult::Applied)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{HeroDraft, SuperpowerIds};

    #[fixture]
    async fn seeded() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        let seed = CatalogSeed::reference().expect("bundled seed is valid");
        store.seed_once(&seed).await.expect("seed applies");
        store
    }

    fn profile(alias: &str) -> HeroProfile {
        HeroProfile::new(HeroDraft {
            name: "Wally West".to_owned(),
            alias: alias.to_owned(),
            birth_date: Utc
                .with_ymd_and_hms(1990, 1, 1, 0, 0, 0)
                .single()
                .expect("valid date"),
            height: 1.8,
            weight: 80.0,
        })
        .expect("valid profile")
    }

    fn links(raw: &[i32]) -> SuperpowerIds {
        SuperpowerIds::from_requested(raw.iter().copied().map(SuperpowerId::new))
    }

    fn new_hero(alias: &str, raw: &[i32]) -> NewHero {
        NewHero {
            profile: profile(alias),
            created_at: Utc::now(),
            superpower_ids: links(raw),
        }
    }

    fn link_ids(view: &HeroView) -> Vec<i32> {
        view.superpowers.iter().map(|power| power.id().get()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn seeding_twice_is_a_no_op(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;
        let seed = CatalogSeed::reference().expect("bundled seed is valid");

        let outcome = store.seed_once(&seed).await.expect("seed check");

        assert_eq!(outcome, SeedingResult::AlreadySeeded);
        assert_eq!(store.list_views().await.expect("list").len(), 10);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_every_hero_does_not_reseed(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;
        for id in 1..=10 {
            assert!(store.delete(HeroId::new(id)).await.expect("delete"));
        }
        let seed = CatalogSeed::reference().expect("bundled seed is valid");

        let outcome = store.seed_once(&seed).await.expect("seed check");

        assert_eq!(outcome, SeedingResult::AlreadySeeded);
        assert!(store.list_views().await.expect("list").is_empty());
        assert!(store.find_view(HeroId::new(1)).await.expect("read").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_heroes_follow_seeded_ids(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;

        let id = store
            .insert(&new_hero("Kid Flash", &[5, 1]))
            .await
            .expect("insert succeeds");
        let view = store
            .find_view(id)
            .await
            .expect("read")
            .expect("hero stored");

        assert_eq!(id, HeroId::new(11));
        assert_eq!(link_ids(&view), vec![1, 5]);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_taken_alias(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;

        let error = store
            .insert(&new_hero("Flash", &[]))
            .await
            .expect_err("alias taken");

        assert_eq!(error, HeroRepositoryError::alias_conflict("Flash"));
    }

    #[rstest]
    #[tokio::test]
    async fn update_reconciles_links_and_keeps_created_at(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;
        let before = store
            .find_view(HeroId::new(1))
            .await
            .expect("read")
            .expect("seeded hero");

        store
            .update(
                HeroId::new(1),
                &HeroChanges {
                    profile: profile("Super-Homem"),
                    superpower_ids: links(&[2, 7]),
                },
            )
            .await
            .expect("update succeeds");
        let after = store
            .find_view(HeroId::new(1))
            .await
            .expect("read")
            .expect("seeded hero");

        assert_eq!(link_ids(&after), vec![2, 7]);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.name, "Wally West");
    }

    #[rstest]
    #[tokio::test]
    async fn update_with_unknown_superpower_changes_nothing(
        #[future] seeded: InMemoryCatalogStore,
    ) {
        let store = seeded.await;

        let error = store
            .update(
                HeroId::new(1),
                &HeroChanges {
                    profile: profile("Novo Nome"),
                    superpower_ids: links(&[999]),
                },
            )
            .await
            .expect_err("unknown superpower");
        let view = store
            .find_view(HeroId::new(1))
            .await
            .expect("read")
            .expect("seeded hero");

        assert!(matches!(error, HeroRepositoryError::UnknownSuperpower { .. }));
        assert_eq!(view.hero_name, "Super-Homem");
        assert_eq!(link_ids(&view), vec![1, 2, 6, 19]);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_a_hero_was_removed(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;

        assert!(store.delete(HeroId::new(3)).await.expect("delete"));
        assert!(!store.delete(HeroId::new(3)).await.expect("delete"));
        assert!(!store.exists(HeroId::new(3)).await.expect("exists"));
    }

    #[rstest]
    #[tokio::test]
    async fn superpowers_list_by_name(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;

        let names: Vec<String> = store
            .list_by_name()
            .await
            .expect("list")
            .into_iter()
            .map(|power| power.name().to_owned())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();

        assert_eq!(names.len(), 20);
        assert_eq!(names, sorted);
    }

    #[rstest]
    #[tokio::test]
    async fn existing_ids_filters_unknown_entries(#[future] seeded: InMemoryCatalogStore) {
        let store = seeded.await;

        let found = store
            .existing_ids(&[SuperpowerId::new(3), SuperpowerId::new(404)])
            .await
            .expect("lookup");

        assert_eq!(found, vec![SuperpowerId::new(3)]);
    }
}
