//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    HeroCommand, HeroQuery, HeroRepository, SuperpowerQuery, SuperpowerRepository,
};
use crate::domain::{HeroCommandService, HeroQueryService, SuperpowerQueryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub heroes: Arc<dyn HeroCommand>,
    pub heroes_query: Arc<dyn HeroQuery>,
    pub superpowers: Arc<dyn SuperpowerQuery>,
}

impl HttpState {
    /// Bundle explicit port implementations.
    pub fn new(
        heroes: Arc<dyn HeroCommand>,
        heroes_query: Arc<dyn HeroQuery>,
        superpowers: Arc<dyn SuperpowerQuery>,
    ) -> Self {
        Self {
            heroes,
            heroes_query,
            superpowers,
        }
    }

    /// Wire the domain services over a pair of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use heroes_api::inbound::http::state::HttpState;
    /// use heroes_api::outbound::memory::InMemoryCatalogStore;
    /// use mockable::DefaultClock;
    ///
    /// let store = Arc::new(InMemoryCatalogStore::new());
    /// let state = HttpState::with_services(store.clone(), store, Arc::new(DefaultClock));
    /// # let _ = state;
    /// ```
    pub fn with_services<H, S>(heroes: Arc<H>, superpowers: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        H: HeroRepository + 'static,
        S: SuperpowerRepository + 'static,
    {
        Self::new(
            Arc::new(HeroCommandService::new(
                heroes.clone(),
                superpowers.clone(),
                clock,
            )),
            Arc::new(HeroQueryService::new(heroes)),
            Arc::new(SuperpowerQueryService::new(superpowers)),
        )
    }
}
