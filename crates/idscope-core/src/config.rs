//! Engine configuration and its on-disk location.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration error type.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Other configuration error.
    #[error("{0}")]
    Other(String),
}

/// Tuning knobs for the identity engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of endpoint connections kept alive at once.
    pub max_connections: usize,
    /// Connections older than this are replaced on next use. `None` keeps
    /// them for the life of the process.
    pub max_connection_age_secs: Option<u64>,
    /// Time allowed for the liveness probe of a cached connection.
    pub liveness_timeout_secs: u64,
    /// Token decimals assumed when a chain reports none.
    pub default_decimals: u32,
    /// SS58 prefix used to render addresses when a chain reports none.
    pub fallback_ss58_prefix: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_connections: 16,
            max_connection_age_secs: None,
            liveness_timeout_secs: 5,
            default_decimals: 12,
            fallback_ss58_prefix: 42,
        }
    }
}

impl EngineConfig {
    pub fn max_connection_age(&self) -> Option<Duration> {
        self.max_connection_age_secs.map(Duration::from_secs)
    }

    pub fn liveness_timeout(&self) -> Duration {
        Duration::from_secs(self.liveness_timeout_secs)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        if config.max_connections == 0 {
            return Err(ConfigError::Other(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists there.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = get_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Get the config directory.
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from("xyz", "dotidx", "idscope")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))
}

/// Get the config file path.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    get_config_dir().map(|dir| dir.join("config.json"))
}
