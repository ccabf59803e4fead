//! Unified path management for calq configuration files.
//!
//! All client state lives under one per-user configuration directory:
//!
//! ```text
//! ~/.config/calq/              # Linux; platform equivalent elsewhere
//! ├── config.toml              # Client configuration (optional)
//! └── user_data.json           # Cached profile
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform configuration directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find configuration directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for calq.
pub struct CalqPaths;

impl CalqPaths {
    /// Returns the calq configuration directory.
    ///
    /// Resolved from the platform configuration directory (XDG on Linux),
    /// falling back to `~/.config` when the platform offers none.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = dirs::config_dir() {
            return Ok(dir.join("calq"));
        }

        dirs::home_dir()
            .map(|home| home.join(".config").join("calq"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the client configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the cached-profile file.
    ///
    /// The file name matches the storage key the product has always used
    /// for the cached profile.
    pub fn profile_cache_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("user_data.json"))
    }
}
