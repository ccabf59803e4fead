//! Client configuration file storage.
//!
//! Loads `config.toml` from the calq configuration directory. The file is
//! optional; every setting has a compiled-in default.

use std::fs;
use std::path::PathBuf;

use calq_core::config::ClientConfig;
use calq_core::error::{CalqError, Result};

use crate::paths::CalqPaths;

/// Read-only storage for the client configuration file.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates storage at the default location (`<config dir>/config.toml`).
    pub fn new() -> Result<Self> {
        let path =
            CalqPaths::config_file().map_err(|err| CalqError::config(err.to_string()))?;
        Ok(Self { path })
    }

    /// Creates storage at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults when the file
    /// does not exist.
    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!("no config.toml, using defaults");
            return Ok(ClientConfig::default());
        }

        let raw = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
