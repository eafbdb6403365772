pub mod browse;
pub mod clear;
pub mod config;
pub mod prompts;
pub mod search;
pub mod watched;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::{Config, ConfigError, CredentialStore, PathManager};
use popcorn_core::{FileStorage, WatchlistStore};
use popcorn_models::RatingInput;
use popcorn_sources::{create_catalog, MovieCatalog};
use std::sync::Arc;

/// Paths, configuration and credentials every command starts from.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        Ok(Self { paths, config, credentials })
    }

    pub fn catalog(&self) -> Result<Arc<dyn MovieCatalog>> {
        match create_catalog(&self.config, &self.credentials) {
            Ok(client) => Ok(Arc::new(client)),
            Err(ConfigError::MissingApiKey) => Err(eyre!(
                "No OMDb API key configured. Run 'popcorn config omdb' or set POPCORN_OMDB_API_KEY."
            )),
            Err(e) => Err(eyre!("{}", e)),
        }
    }

    pub fn watchlist(&self) -> WatchlistStore<FileStorage> {
        WatchlistStore::load(FileStorage::from_paths(&self.paths), self.config.watchlist.storage_key.clone())
    }

    pub fn rating_input(&self) -> RatingInput {
        RatingInput::new(self.config.watchlist.max_rating)
    }
}
