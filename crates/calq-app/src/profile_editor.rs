//! Profile editor controller.
//!
//! In-place editing of single profile fields and the double-confirmation
//! account deletion. Edit mode is mutually exclusive (one field at a time)
//! and the flag is reset on every exit path — success, validation failure,
//! or network failure — so the UI can never lock up.

use std::sync::Arc;

use calq_core::api::AuthApi;
use calq_core::error::{CalqError, Result};
use calq_core::profile::{Profile, ProfileField};
use calq_core::validation;

use crate::session::Session;

/// The literal the user must type, exactly, to confirm account deletion.
pub const DELETE_CONFIRMATION: &str = "DELETAR";

/// Outcome of an account-deletion attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the first confirmation; nothing was sent.
    Declined,
    /// The typed confirmation did not match the literal; nothing was sent.
    ConfirmationMismatch,
    /// The account was deleted and the local session cleared.
    Deleted,
}

/// Drives the profile screen's field editing and account deletion.
pub struct ProfileEditor {
    auth: Arc<dyn AuthApi>,
    editing: Option<ProfileField>,
}

impl ProfileEditor {
    pub fn new(auth: Arc<dyn AuthApi>) -> Self {
        Self {
            auth,
            editing: None,
        }
    }

    /// The field currently in edit mode, if any.
    pub fn editing(&self) -> Option<ProfileField> {
        self.editing
    }

    /// Enters edit mode for `field`.
    ///
    /// Returns `false` (and changes nothing) when another edit is already
    /// in progress.
    pub fn begin_edit(&mut self, field: ProfileField) -> bool {
        if self.editing.is_some() {
            return false;
        }
        self.editing = Some(field);
        true
    }

    /// Restores the field's original value from the cached profile and
    /// exits edit mode. Returns the restored value.
    pub fn cancel(&mut self, session: &Session) -> Option<String> {
        let field = self.editing.take()?;
        session
            .profile()
            .map(|profile| field.value_of(profile).to_string())
    }

    /// Validates and saves the edited field.
    ///
    /// Validation failures stop before any network call. Whatever the
    /// outcome, edit mode is exited.
    pub async fn save(&mut self, session: &mut Session, value: &str) -> Result<Profile> {
        let field = self
            .editing
            .ok_or_else(|| CalqError::internal("save without an active edit"))?;

        let result = self.save_field(session, field, value).await;
        self.editing = None;
        result
    }

    async fn save_field(
        &self,
        session: &mut Session,
        field: ProfileField,
        value: &str,
    ) -> Result<Profile> {
        let value = value.trim();
        validation::validate_profile_field(field, value)?;

        let user_id = session
            .profile()
            .map(|profile| profile.id)
            .ok_or_else(|| CalqError::validation("Perfil não carregado"))?;

        let updated = self.auth.update_profile_field(user_id, field, value).await?;
        session.remember(updated.clone());
        Ok(updated)
    }

    /// Deletes the account after two confirmations: a yes/no answer and a
    /// typed literal that must match [`DELETE_CONFIRMATION`] exactly
    /// (case-sensitive). Anything short of both aborts without a network
    /// call.
    pub async fn delete_account(
        &self,
        session: &mut Session,
        first_confirm: bool,
        typed_confirmation: &str,
    ) -> Result<DeleteOutcome> {
        if !first_confirm {
            return Ok(DeleteOutcome::Declined);
        }

        if typed_confirmation != DELETE_CONFIRMATION {
            return Ok(DeleteOutcome::ConfirmationMismatch);
        }

        self.auth.delete_account().await?;
        session.invalidate();
        Ok(DeleteOutcome::Deleted)
    }
}
