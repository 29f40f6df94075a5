//! Heroes API entry-point: migrates, seeds, then serves the catalogue.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use heroes_api::inbound::http::health::HealthState;
use heroes_api::outbound::persistence::{DbPool, PoolConfig};
use heroes_api::settings::AppSettings;
use heroes_api::startup::{run_migrations, seed_catalog_on_startup};
use server::{CatalogBackend, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let backend = match settings.database_url() {
        Some(url) => {
            run_migrations(url).await.map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
                .await
                .map_err(std::io::Error::other)?;
            CatalogBackend::Postgres(pool)
        }
        None => {
            warn!("HEROES_DATABASE_URL not set; serving an in-memory catalogue");
            CatalogBackend::default()
        }
    };

    let seed_repository = backend.seed_repository();
    seed_catalog_on_startup(&settings, seed_repository.as_ref())
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state.clone(),
        ServerConfig::new(bind_addr).with_backend(backend),
    )?;
    health_state.mark_ready();
    info!("catalogue ready");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
