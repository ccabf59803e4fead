//! Login/register controller for the entry screen.
//!
//! Two mutually exclusive form views toggled by a single control; password
//! confirmation is checked before any network call; and on startup a
//! plausible cached profile is verified against the server under a bounded
//! timeout before the form is shown at all.

use std::sync::Arc;

use calq_core::api::AuthApi;
use calq_core::error::Result;
use calq_core::profile::Profile;
use calq_core::validation;

use crate::session::Session;

/// Which of the two entry forms is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormView {
    #[default]
    Login,
    Register,
}

impl FormView {
    /// The single toggle control between the two forms. Toggling clears
    /// any visible banner, which is the caller's concern.
    pub fn toggle(self) -> Self {
        match self {
            FormView::Login => FormView::Register,
            FormView::Register => FormView::Login,
        }
    }

    /// The toggle link caption, phrased for the view being left.
    pub fn toggle_caption(self) -> &'static str {
        match self {
            FormView::Login => "Não tem conta? Criar uma",
            FormView::Register => "Já tem conta? Fazer login",
        }
    }
}

/// Drives the entry screen: login, registration, and the startup check.
pub struct LoginController {
    auth: Arc<dyn AuthApi>,
}

impl LoginController {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self { auth }
    }

    /// Verifies a cached profile on startup.
    ///
    /// Only a plausible cache (deserialized with a positive identifier) is
    /// worth a request. The verification runs under the transport's bounded
    /// timeout; a timeout or any failure invalidates the cache and the form
    /// is shown. Returns `true` when the session is confirmed valid and the
    /// form can be skipped.
    pub async fn startup_check(&self, session: &mut Session) -> bool {
        let Some(cached) = session.cached_profile() else {
            return false;
        };
        if cached.id <= 0 {
            session.invalidate();
            return false;
        }

        match self.auth.verify_session().await {
            Ok(profile) => {
                session.remember(profile);
                true
            }
            Err(err) => {
                tracing::debug!(%err, "cached profile failed verification");
                session.invalidate();
                false
            }
        }
    }

    /// Posts credentials; on success the returned profile is cached and
    /// the caller proceeds to the calculator screen.
    pub async fn login(
        &self,
        session: &mut Session,
        email: &str,
        password: &str,
    ) -> Result<Profile> {
        let profile = self.auth.login(email.trim(), password).await?;
        session.remember(profile.clone());
        Ok(profile)
    }

    /// Registers a new account.
    ///
    /// The password/confirmation match is checked here, before any network
    /// call. On success the caller switches to the login view and pre-fills
    /// the email field; the profile is returned but not cached (the user
    /// still logs in explicitly).
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Profile> {
        validation::validate_password_match(password, confirm_password)?;

        self.auth
            .register(name.trim(), email.trim(), password, confirm_password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_profile, MockAuthApi};
    use calq_core::error::CalqError;
    use calq_infrastructure::ProfileCache;
    use tempfile::TempDir;

    fn session_with(auth: Arc<MockAuthApi>, dir: &TempDir) -> Session {
        let cache = ProfileCache::with_path(dir.path().join("user_data.json"));
        Session::new(auth, cache)
    }

    #[test]
    fn test_form_view_toggles() {
        assert_eq!(FormView::Login.toggle(), FormView::Register);
        assert_eq!(FormView::Register.toggle(), FormView::Login);
    }

    #[tokio::test]
    async fn test_startup_check_without_cache_skips_network() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(MockAuthApi::with_profile(sample_profile()));
        let mut session = session_with(Arc::clone(&auth), &dir);

        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);
        assert!(!controller.startup_check(&mut session).await);
        assert_eq!(auth.call_count(), 0);
    }

    #[tokio::test]
    async fn test_startup_check_confirms_valid_cache() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(MockAuthApi::with_profile(sample_profile()));

        // Seed the disk cache through a successful authentication.
        {
            let mut session = session_with(Arc::clone(&auth), &dir);
            session.authenticate().await.unwrap();
        }

        let mut session = session_with(Arc::clone(&auth), &dir);
        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);

        assert!(controller.startup_check(&mut session).await);
        assert_eq!(session.profile().unwrap().name, "Maria");
    }

    #[tokio::test]
    async fn test_startup_check_invalidates_on_failure() {
        let dir = TempDir::new().unwrap();

        {
            let seed = Arc::new(MockAuthApi::with_profile(sample_profile()));
            let mut session = session_with(Arc::clone(&seed), &dir);
            session.authenticate().await.unwrap();
        }

        let auth = Arc::new(MockAuthApi::failing(CalqError::network(
            "verificação de sessão expirou",
        )));
        let mut session = session_with(Arc::clone(&auth), &dir);
        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);

        assert!(!controller.startup_check(&mut session).await);
        assert!(session.cached_profile().is_none());
    }

    #[tokio::test]
    async fn test_login_caches_profile() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(MockAuthApi::with_profile(sample_profile()));
        let mut session = session_with(Arc::clone(&auth), &dir);

        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);
        let profile = controller
            .login(&mut session, " maria@exemplo.com ", "segredo123")
            .await
            .unwrap();

        assert_eq!(profile.name, "Maria");
        assert_eq!(session.profile().unwrap().id, profile.id);
        assert!(session.cached_profile().is_some());
    }

    #[tokio::test]
    async fn test_register_password_mismatch_short_circuits() {
        let auth = Arc::new(MockAuthApi::with_profile(sample_profile()));
        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);

        let err = controller
            .register("Maria", "maria@exemplo.com", "a", "b")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "As senhas não coincidem");
        assert_eq!(auth.call_count(), 0);
    }

    #[tokio::test]
    async fn test_register_success_returns_profile_without_caching() {
        let dir = TempDir::new().unwrap();
        let auth = Arc::new(MockAuthApi::with_profile(sample_profile()));
        let session = session_with(Arc::clone(&auth), &dir);

        let controller = LoginController::new(Arc::clone(&auth) as Arc<dyn AuthApi>);
        let profile = controller
            .register("Maria", "maria@exemplo.com", "segredo123", "segredo123")
            .await
            .unwrap();

        assert_eq!(profile.email, "maria@exemplo.com");
        assert!(session.profile().is_none());
    }
}
