//! Startup seeding of the reference catalogue.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{CatalogSeedRepository, CatalogSeedRepositoryError, SeedingResult};
use crate::domain::{CatalogSeed, CatalogSeedError};
use crate::settings::AppSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Seed file could not be read.
    #[error("failed to read catalogue seed at {path}: {source}")]
    SeedRead {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Seed parsing or validation failed.
    #[error("catalogue seed error: {0}")]
    Seed(#[from] CatalogSeedError),
    /// Persistence failed.
    #[error("catalogue seeding failed: {0}")]
    Repository(#[from] CatalogSeedRepositoryError),
}

/// Apply the reference catalogue unless the store was seeded before.
///
/// Returns `None` when seeding is disabled, otherwise the repository outcome.
///
/// # Examples
///
/// ```rust,no_run
/// use heroes_api::outbound::memory::InMemoryCatalogStore;
/// use heroes_api::settings::AppSettings;
/// use heroes_api::startup::seed_catalog_on_startup;
///
/// # async fn run(settings: AppSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryCatalogStore::new();
/// let outcome = seed_catalog_on_startup(&settings, &store).await?;
/// # let _ = outcome;
/// # Ok(())
/// # }
/// ```
pub async fn seed_catalog_on_startup(
    settings: &AppSettings,
    repository: &dyn CatalogSeedRepository,
) -> Result<Option<SeedingResult>, StartupSeedingError> {
    if settings.skip_seed {
        info!(reason = "disabled", "catalogue seeding skipped");
        return Ok(None);
    }

    let seed = match settings.seed_path() {
        Some(path) => load_seed(path)?,
        None => CatalogSeed::reference()?,
    };

    let result = repository.seed_once(&seed).await?;
    match result {
        SeedingResult::Applied => info!(
            superpowers = seed.superpowers().len(),
            heroes = seed.heroes().len(),
            links = seed.link_count(),
            "catalogue seed applied"
        ),
        SeedingResult::AlreadySeeded => info!("catalogue already seeded; skipping"),
    }

    Ok(Some(result))
}

fn load_seed(path: &Path) -> Result<CatalogSeed, StartupSeedingError> {
    let read_error = |source| StartupSeedingError::SeedRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    Ok(CatalogSeed::from_json(&contents)?)
}
