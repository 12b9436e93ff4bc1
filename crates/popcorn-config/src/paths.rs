use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("POPCORN_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("popcorn");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("popcorn"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    pub fn from_container_env() -> Self {
        Self::with_base(&container_base_path())
    }

    /// Everything under one directory: config at the top, data and logs below.
    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Directory backing the key-value store
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.log_dir.join("popcorn.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // An explicit base path or an existing container base wins over platform dirs
        let base = container_base_path();
        if std::env::var_os("POPCORN_BASE_PATH").is_some() || base.exists() {
            return Self::from_container_env();
        }

        Self::new().unwrap_or_else(|_| Self::with_base(&base))
    }
}
