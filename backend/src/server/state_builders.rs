//! Builders turning a catalogue backend into HTTP state and a seed target.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use heroes_api::domain::ports::CatalogSeedRepository;
use heroes_api::inbound::http::state::HttpState;
use heroes_api::outbound::memory::InMemoryCatalogStore;
use heroes_api::outbound::persistence::{
    DbPool, DieselCatalogSeedRepository, DieselHeroRepository, DieselSuperpowerRepository,
};

/// Storage selected at startup.
#[derive(Clone)]
pub enum CatalogBackend {
    /// PostgreSQL through the shared connection pool.
    Postgres(DbPool),
    /// Process-local store; contents are lost on exit.
    InMemory(InMemoryCatalogStore),
}

impl Default for CatalogBackend {
    fn default() -> Self {
        Self::InMemory(InMemoryCatalogStore::new())
    }
}

impl CatalogBackend {
    /// Adapter used to apply the reference catalogue.
    pub fn seed_repository(&self) -> Arc<dyn CatalogSeedRepository> {
        match self {
            Self::Postgres(pool) => Arc::new(DieselCatalogSeedRepository::new(pool.clone())),
            Self::InMemory(store) => Arc::new(store.clone()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }
}

/// Wire the domain services over the selected backend.
pub fn build_http_state(backend: &CatalogBackend) -> web::Data<HttpState> {
    let clock = Arc::new(DefaultClock);
    let state = match backend {
        CatalogBackend::Postgres(pool) => HttpState::with_services(
            Arc::new(DieselHeroRepository::new(pool.clone())),
            Arc::new(DieselSuperpowerRepository::new(pool.clone())),
            clock,
        ),
        CatalogBackend::InMemory(store) => {
            let store = Arc::new(store.clone());
            HttpState::with_services(store.clone(), store, clock)
        }
    };
    web::Data::new(state)
}
