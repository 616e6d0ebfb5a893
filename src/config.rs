//! Runtime configuration
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no
//! file at all) yields a working configuration.

use crate::cache::CacheConfig;
use crate::query::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file; `None` means the per-user default
    #[serde(default)]
    pub database: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_influential_limit")]
    pub influential_limit: usize,

    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_influential_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            log_level: default_log_level(),
            influential_limit: default_influential_limit(),
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Read a YAML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, else the default location if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // serde_yaml reads an empty document as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// `<data_dir>/citegraph/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Configured database path, or `<data_dir>/citegraph/citegraph.db`
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_db_path)
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .map(|dir| dir.join("citegraph"))
}

/// Default database path (~/.local/share/citegraph/citegraph.db on Linux)
pub fn default_db_path() -> PathBuf {
    data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("citegraph.db")
}
