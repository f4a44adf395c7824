//! Loader configuration.
//!
//! Stored as TOML. Every field has a default, so an empty file (or
//! `ArchiveConfig::default()`) reaches the public archives with no local
//! snapshots.

use exohelp_core::data::DataError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIRMED_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync?query=select+*+from+ps+where+default_flag=1&format=csv";

pub const DEFAULT_SOLAR_SYSTEM_URL: &str =
    "https://nssdc.gsfc.nasa.gov/planetary/factsheet/planet_table_ratio.html";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_USER_AGENT: &str = concat!("exohelp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("parse config TOML: {0}")]
    Parse(String),

    #[error("timeout_secs must be at least 1")]
    ZeroTimeout,
}

impl From<ConfigError> for DataError {
    fn from(e: ConfigError) -> Self {
        DataError::Configuration(e.to_string())
    }
}

/// Where the loaders fetch from and where they keep snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Snapshot directory. `None` disables caching entirely.
    pub output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    pub user_agent: String,

    /// TAP query returning the confirmed-planet table as CSV.
    pub confirmed_url: String,

    /// Page whose first table is the solar-system reference table.
    pub solar_system_url: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            confirmed_url: DEFAULT_CONFIRMED_URL.to_string(),
            solar_system_url: DEFAULT_SOLAR_SYSTEM_URL.to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Default endpoints with snapshots kept under `dir`.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
