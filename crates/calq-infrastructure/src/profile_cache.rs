//! Cached-profile persistence.
//!
//! The client keeps one profile object cached between runs, the way the
//! browser client kept it in local storage. The cache is only trusted
//! after a successful profile fetch; it is cleared on logout, account
//! deletion, or any authentication failure.

use std::fs;
use std::path::PathBuf;

use calq_core::error::{CalqError, Result};
use calq_core::profile::Profile;

use crate::paths::CalqPaths;

/// JSON file store for the cached profile.
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    /// Creates a cache at the default location
    /// (`<config dir>/user_data.json`).
    pub fn new() -> Result<Self> {
        let path = CalqPaths::profile_cache_file()
            .map_err(|err| CalqError::config(err.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a cache at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persists the profile, creating the directory structure if needed.
    pub fn save(&self, profile: &Profile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json)?;

        tracing::debug!(path = %self.path.display(), "profile cached");
        Ok(())
    }

    /// Loads the cached profile.
    ///
    /// Returns `Ok(None)` when no cache exists. A corrupted cache file is
    /// removed and treated as absent rather than surfaced as an error.
    pub fn load(&self) -> Result<Option<Profile>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&json) {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                tracing::warn!(%err, "discarding corrupted profile cache");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Removes the cached profile, if any.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_profile() -> Profile {
        Profile {
            id: 11,
            name: "Carla".to_string(),
            email: "carla@exemplo.com".to_string(),
            registered_at: "2024-02-01T09:00:00Z".to_string(),
            updated_at: None,
        }
    }

    fn cache_in(dir: &TempDir) -> ProfileCache {
        ProfileCache::with_path(dir.path().join("user_data.json"))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        cache.save(&sample_profile()).unwrap();
        let loaded = cache.load().unwrap().unwrap();

        assert_eq!(loaded, sample_profile());
    }

    #[test]
    fn test_load_without_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        assert_eq!(cache.load().unwrap(), None);
    }

    #[test]
    fn test_corrupted_cache_is_discarded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("user_data.json");
        fs::write(&path, "{not json").unwrap();

        let cache = ProfileCache::with_path(path.clone());
        assert_eq!(cache.load().unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = cache_in(&temp_dir);

        cache.save(&sample_profile()).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.load().unwrap(), None);

        // Clearing an absent cache is not an error.
        cache.clear().unwrap();
    }
}
