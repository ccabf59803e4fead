//! Mock service implementations shared by the controller tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use calq_core::api::{AuthApi, OperationsApi};
use calq_core::error::{CalqError, Result};
use calq_core::operation::Operation;
use calq_core::profile::{Profile, ProfileField};

pub(crate) fn sample_profile() -> Profile {
    Profile {
        id: 1,
        name: "Maria".to_string(),
        email: "maria@exemplo.com".to_string(),
        registered_at: "2024-03-10T12:00:00Z".to_string(),
        updated_at: None,
    }
}

pub(crate) fn sample_operation(expression: &str, result: &str) -> Operation {
    Operation {
        id: None,
        expression: expression.to_string(),
        result: result.to_string(),
        recorded_at: Some("2024-06-15T08:00:00Z".to_string()),
    }
}

/// Auth service double: answers every call with one preset outcome and
/// counts how many network calls were issued.
pub(crate) struct MockAuthApi {
    outcome: std::result::Result<Profile, CalqError>,
    calls: AtomicUsize,
}

impl MockAuthApi {
    pub(crate) fn with_profile(profile: Profile) -> Self {
        Self {
            outcome: Ok(profile),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(error: CalqError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn outcome(&self) -> Result<Profile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<Profile> {
        self.outcome()
    }

    async fn register(
        &self,
        _name: &str,
        _email: &str,
        _password: &str,
        _confirm_password: &str,
    ) -> Result<Profile> {
        self.outcome()
    }

    async fn logout(&self) -> Result<()> {
        self.outcome().map(|_| ())
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        self.outcome()
    }

    async fn verify_session(&self) -> Result<Profile> {
        self.outcome()
    }

    async fn update_profile_field(
        &self,
        _user_id: i64,
        field: ProfileField,
        value: &str,
    ) -> Result<Profile> {
        // Echo the update back the way the server would.
        self.outcome().map(|mut profile| {
            match field {
                ProfileField::Name => profile.name = value.to_string(),
                ProfileField::Email => profile.email = value.to_string(),
            }
            profile
        })
    }

    async fn delete_account(&self) -> Result<()> {
        self.outcome().map(|_| ())
    }
}

/// Operations service double.
pub(crate) struct MockOperationsApi {
    calculate_result: std::result::Result<String, CalqError>,
    operations: std::result::Result<Vec<Operation>, CalqError>,
    deleted: u64,
    calls: AtomicUsize,
}

impl MockOperationsApi {
    pub(crate) fn with_result(result: &str) -> Self {
        Self {
            calculate_result: Ok(result.to_string()),
            operations: Ok(Vec::new()),
            deleted: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_operations(operations: Vec<Operation>) -> Self {
        Self {
            calculate_result: Ok("0".to_string()),
            deleted: operations.len() as u64,
            operations: Ok(operations),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(error: CalqError) -> Self {
        Self {
            calculate_result: Err(error.clone()),
            operations: Err(error),
            deleted: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl OperationsApi for MockOperationsApi {
    async fn calculate(&self, expression: &str) -> Result<Operation> {
        self.bump();
        self.calculate_result
            .clone()
            .map(|result| sample_operation(expression, &result))
    }

    async fn list_operations(&self) -> Result<Vec<Operation>> {
        self.bump();
        self.operations.clone()
    }

    async fn clear_history(&self) -> Result<u64> {
        self.bump();
        self.operations.clone().map(|_| self.deleted)
    }
}
