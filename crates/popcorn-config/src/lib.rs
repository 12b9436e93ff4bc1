pub mod config;
pub mod paths;

pub use config::{is_valid_store_key, Config, LoggingConfig, OmdbConfig, StorageConfig, API_KEY_ENV, API_KEY_PLACEHOLDER, DEFAULT_BASE_URL};
pub use paths::{PathManager, container_base_path};
