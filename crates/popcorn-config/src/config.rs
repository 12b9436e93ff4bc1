use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";
/// Environment variable that overrides `omdb.api_key`
pub const API_KEY_ENV: &str = "POPCORN_OMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store key the watched list is kept under
    #[serde(default = "default_watched_key")]
    pub watched_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Write logs to this file (rotated daily) instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_watched_key() -> String {
    "watched".to_string()
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            watched_key: default_watched_key(),
        }
    }
}

impl OmdbConfig {
    pub fn is_api_key_configured(&self) -> bool {
        let key = self.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise defaults; then apply environment overrides.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                debug!("Using OMDb API key from {}", API_KEY_ENV);
                self.omdb.api_key = key;
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.omdb.is_api_key_configured() {
            return Err(anyhow::anyhow!(
                "OMDb API key is not configured (run 'popcorn config set-api-key' or set {})",
                API_KEY_ENV
            ));
        }

        let base_url = self.omdb.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!("omdb.base_url must be an http(s) URL: {}", base_url));
        }

        self.validate_storage()
    }

    /// Checks only the `[storage]` section; commands that never reach the
    /// catalog still need a usable store key.
    pub fn validate_storage(&self) -> anyhow::Result<()> {
        let key = &self.storage.watched_key;
        if key.trim().is_empty() {
            return Err(anyhow::anyhow!("storage.watched_key cannot be empty"));
        }
        if !is_valid_store_key(key) {
            return Err(anyhow::anyhow!(
                "storage.watched_key {:?} may only contain ASCII letters, digits, '-', '_' and '.', and must not start with '.'",
                key
            ));
        }
        Ok(())
    }
}

/// Whether `key` can name a record in the store (it becomes a file name).
pub fn is_valid_store_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn configured() -> Config {
        Config {
            omdb: OmdbConfig {
                api_key: "a1b2c3d4".to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = configured();
        config.logging.file = Some(PathBuf::from("/tmp/popcorn.log"));

        config.save_to_file(file.path()).unwrap();
        let loaded = Config::load_from_file(file.path()).unwrap();

        assert_eq!(loaded.omdb.api_key, "a1b2c3d4");
        assert_eq!(loaded.omdb.base_url, DEFAULT_BASE_URL);
        assert_eq!(loaded.storage.watched_key, "watched");
        assert_eq!(loaded.logging.file, Some(PathBuf::from("/tmp/popcorn.log")));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[omdb]\napi_key = \"k3y\"\n").unwrap();
        assert_eq!(config.omdb.api_key, "k3y");
        assert_eq!(config.omdb.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.storage.watched_key, "watched");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err(), "placeholder key must be rejected");

        config = configured();
        assert!(config.validate().is_ok());

        config.omdb.base_url = "ftp://omdb".to_string();
        assert!(config.validate().is_err());

        config = configured();
        config.storage.watched_key = "../escape".to_string();
        assert!(config.validate().is_err());

        config.storage.watched_key = " ".to_string();
        assert!(config.validate().is_err());

        config.storage.watched_key = "my list".to_string();
        assert!(config.validate().is_err());
        assert!(config.validate_storage().is_err());

        config.storage.watched_key = "a:b".to_string();
        assert!(config.validate().is_err());

        config.storage.watched_key = "watched-2024.v1".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_key_rule() {
        assert!(is_valid_store_key("watched"));
        assert!(is_valid_store_key("watched_list-1.bak"));
        assert!(!is_valid_store_key(""));
        assert!(!is_valid_store_key(".hidden"));
        assert!(!is_valid_store_key("my list"));
        assert!(!is_valid_store_key("../escape"));
        assert!(!is_valid_store_key(" watched"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.storage.watched_key, "watched");
    }
}
