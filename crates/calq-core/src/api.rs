//! Service traits for the remote API.
//!
//! These traits are the seam between the controllers and the HTTP
//! transport, decoupling the application's core logic from the specific
//! client implementation (reqwest in production, mocks in tests).

use async_trait::async_trait;

use crate::error::Result;
use crate::operation::Operation;
use crate::profile::{Profile, ProfileField};

/// Authentication and profile operations.
///
/// All calls are credentialed; mutating calls carry the CSRF token.
/// Implementations must map a 401 response to `CalqError::SessionExpired`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Posts credentials; returns the authenticated profile.
    async fn login(&self, email: &str, password: &str) -> Result<Profile>;

    /// Registers a new account; returns the created profile.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Profile>;

    /// Ends the server-side session.
    async fn logout(&self) -> Result<()>;

    /// Fetches the authenticated user's profile.
    async fn fetch_profile(&self) -> Result<Profile>;

    /// Fetches the profile under a bounded timeout, for verifying a cached
    /// profile on startup. A timeout is reported as a network error and
    /// treated identically to a failed verification.
    async fn verify_session(&self) -> Result<Profile>;

    /// Partially updates one profile field; returns the updated profile.
    async fn update_profile_field(
        &self,
        user_id: i64,
        field: ProfileField,
        value: &str,
    ) -> Result<Profile>;

    /// Irreversibly deletes the account and its data.
    async fn delete_account(&self) -> Result<()>;
}

/// Calculation and history operations.
#[async_trait]
pub trait OperationsApi: Send + Sync {
    /// Submits an expression for server-side evaluation.
    ///
    /// The expression is opaque text; the server is the sole source of
    /// operator precedence and numeric semantics.
    async fn calculate(&self, expression: &str) -> Result<Operation>;

    /// Fetches the full operation list, normalized from either response
    /// shape the endpoint produces.
    async fn list_operations(&self) -> Result<Vec<Operation>>;

    /// Deletes the user's history; returns the number of removed records.
    async fn clear_history(&self) -> Result<u64>;
}
