use color_eyre::Result;
use popcorn_catalog::{MovieCatalog, OmdbClient};
use popcorn_config::{Config, PathManager};
use popcorn_core::{JsonFileStore, KeyValueStore, MemoryStore, WatchedList};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: resolved paths, loaded config and the store
/// the watched list lives in.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    store: Arc<dyn KeyValueStore>,
}

impl AppContext {
    pub fn load(ephemeral: bool) -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let store: Arc<dyn KeyValueStore> = if ephemeral {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(JsonFileStore::from_paths(&paths))
        };

        Ok(Self { paths, config, store })
    }

    /// The OMDb client; fails when the API key is missing or the config is invalid.
    pub fn catalog(&self) -> Result<Arc<dyn MovieCatalog>> {
        self.config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;
        let client = OmdbClient::from_config(&self.config.omdb)?;
        debug!("Using catalog at {}", client.base_url());
        Ok(Arc::new(client))
    }

    /// The watched list; fails when the configured store key cannot be written.
    pub fn watched(&self) -> Result<WatchedList> {
        self.config
            .validate_storage()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;
        Ok(WatchedList::load(self.store.clone(), &self.config.storage.watched_key))
    }
}
