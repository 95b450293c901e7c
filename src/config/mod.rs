//! Configuration management for powboot
//!
//! Every command-line argument is forwarded verbatim to the launched
//! artifact, so configuration comes from a file and the `POWBOOT_CONFIG`
//! environment variable rather than flags.

pub mod schema;

pub use schema::{CacheConfig, Config, LaunchConfig, ReleaseConfig};

use crate::error::{PowbootError, PowbootResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Create a config manager honoring the `POWBOOT_CONFIG` override
    pub fn from_env() -> Self {
        match std::env::var_os("POWBOOT_CONFIG") {
            Some(path) => Self::with_path(PathBuf::from(path)),
            None => Self::new(),
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("powboot")
            .join("config.toml")
    }

    /// Load configuration, using defaults if the file does not exist
    pub fn load(&self) -> PowbootResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> PowbootResult<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PowbootError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| PowbootError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
