//! Client-side validation, run before any network call.
//!
//! Failures here are `CalqError::Validation` and stop the action with an
//! inline message; nothing is sent to the server.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CalqError, Result};
use crate::profile::ProfileField;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Rejects empty (or whitespace-only) values.
pub fn require_non_empty(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CalqError::validation("O campo não pode estar vazio"));
    }
    Ok(())
}

/// Validates the basic email shape used across the product.
pub fn validate_email(value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(CalqError::validation("Por favor, insira um email válido"));
    }
    Ok(())
}

/// Password and confirmation must match exactly before registering.
pub fn validate_password_match(password: &str, confirmation: &str) -> Result<()> {
    if password != confirmation {
        return Err(CalqError::validation("As senhas não coincidem"));
    }
    Ok(())
}

/// Validates a profile field value for an in-place save.
pub fn validate_profile_field(field: ProfileField, value: &str) -> Result<()> {
    require_non_empty(value)?;
    if field == ProfileField::Email {
        validate_email(value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("x").is_ok());
        assert!(require_non_empty("").is_err());
        assert!(require_non_empty("   ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("usuario@exemplo.com").is_ok());
        assert!(validate_email("USUARIO@EXEMPLO.COM").is_ok());
        assert!(validate_email("sem-arroba.com").is_err());
        assert!(validate_email("x@y").is_err());
    }

    #[test]
    fn test_validate_password_match() {
        assert!(validate_password_match("segredo1", "segredo1").is_ok());

        let err = validate_password_match("a", "b").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_profile_field() {
        assert!(validate_profile_field(ProfileField::Name, "Maria").is_ok());
        assert!(validate_profile_field(ProfileField::Name, "").is_err());
        assert!(validate_profile_field(ProfileField::Email, "maria@exemplo.com").is_ok());
        assert!(validate_profile_field(ProfileField::Email, "maria").is_err());
    }
}
