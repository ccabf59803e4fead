//! Session state and the authentication gate.
//!
//! The gate runs exactly once per protected-screen entry, before any
//! screen-specific data load: a credentialed profile fetch that, on
//! success, refreshes the cached profile (memory and persistent store).
//! Any failure invalidates the cache; the caller then returns to the
//! entry screen. Screen initialization only runs after the gate's future
//! resolves successfully, which is what enforces the ordering.

use std::sync::Arc;

use calq_core::api::AuthApi;
use calq_core::error::Result;
use calq_core::profile::Profile;
use calq_infrastructure::ProfileCache;

/// Owns the cached profile and the authentication lifecycle.
pub struct Session {
    auth: Arc<dyn AuthApi>,
    cache: ProfileCache,
    profile: Option<Profile>,
}

impl Session {
    pub fn new(auth: Arc<dyn AuthApi>, cache: ProfileCache) -> Self {
        Self {
            auth,
            cache,
            profile: None,
        }
    }

    /// The in-memory cached profile, trusted only after a successful fetch.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Loads whatever profile is cached on disk, without trusting it.
    ///
    /// Used by the entry screen to decide whether a verification request
    /// is worth issuing at all.
    pub fn cached_profile(&self) -> Option<Profile> {
        match self.cache.load() {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!(%err, "failed to read profile cache");
                None
            }
        }
    }

    /// Caches a server-confirmed profile, in memory and on disk.
    ///
    /// The disk write is best-effort: the in-memory copy is authoritative
    /// for this run, and a failed write only costs the next startup check.
    pub fn remember(&mut self, profile: Profile) {
        if let Err(err) = self.cache.save(&profile) {
            tracing::warn!(%err, "failed to persist profile cache");
        }
        self.profile = Some(profile);
    }

    /// Drops the cached profile, in memory and on disk.
    pub fn invalidate(&mut self) {
        self.profile = None;
        if let Err(err) = self.cache.clear() {
            tracing::warn!(%err, "failed to clear profile cache");
        }
    }

    /// The authentication gate: fetches the profile over the credentialed
    /// session. Success refreshes the cache; any failure invalidates it
    /// and bubbles up so the caller can return to the entry screen. No
    /// retry.
    pub async fn authenticate(&mut self) -> Result<Profile> {
        match self.auth.fetch_profile().await {
            Ok(profile) => {
                self.remember(profile.clone());
                Ok(profile)
            }
            Err(err) => {
                tracing::debug!(%err, "authentication check failed");
                self.invalidate();
                Err(err)
            }
        }
    }

    /// Ends the session: the server call is best-effort (errors are logged
    /// and ignored), the local cache is always cleared.
    pub async fn logout(&mut self) {
        if let Err(err) = self.auth.logout().await {
            tracing::warn!(%err, "logout request failed");
        }
        self.invalidate();
    }

    /// The `👤 name` header line, once authenticated.
    pub fn header_line(&self) -> Option<String> {
        self.profile.as_ref().map(|p| format!("👤 {}", p.name))
    }
}
