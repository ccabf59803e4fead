//! User profile domain model.
//!
//! The profile is the authenticated user's identity record as known to the
//! client. The server is the source of truth; the client holds a cached copy
//! (memory plus persistent store) that is only trusted after a successful
//! profile fetch.

use serde::{Deserialize, Serialize};

use crate::timestamp;

/// The authenticated user's identity record.
///
/// Field names follow the wire format of the API (`nome`, `data_cadastro`),
/// renamed to the domain vocabulary on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Server-assigned numeric identifier
    pub id: i64,
    /// Display name
    #[serde(rename = "nome")]
    pub name: String,
    /// Login email
    pub email: String,
    /// Registration timestamp (ISO 8601)
    #[serde(rename = "data_cadastro")]
    pub registered_at: String,
    /// Last-update timestamp, when the server includes it
    #[serde(rename = "data_atualizacao", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Profile {
    /// Derives the avatar glyph: the first character of the name, uppercased.
    pub fn avatar_initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    /// Formats the registration date as a month/year string.
    pub fn member_since(&self) -> String {
        timestamp::month_year(&self.registered_at)
    }
}

/// The profile fields the client can edit in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
}

impl ProfileField {
    /// The field name used on the wire (PATCH body key).
    pub fn wire_name(&self) -> &'static str {
        match self {
            ProfileField::Name => "nome",
            ProfileField::Email => "email",
        }
    }

    /// The label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Nome",
            ProfileField::Email => "Email",
        }
    }

    /// Reads the field's current value out of a profile.
    pub fn value_of<'a>(&self, profile: &'a Profile) -> &'a str {
        match self {
            ProfileField::Name => &profile.name,
            ProfileField::Email => &profile.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Profile {
        Profile {
            id: 7,
            name: "maria silva".to_string(),
            email: "maria@exemplo.com".to_string(),
            registered_at: "2024-03-10T12:00:00Z".to_string(),
            updated_at: None,
        }
    }

    #[test]
    fn test_avatar_initial() {
        assert_eq!(sample().avatar_initial(), "M");

        let mut empty = sample();
        empty.name.clear();
        assert_eq!(empty.avatar_initial(), "?");
    }

    #[test]
    fn test_member_since() {
        assert_eq!(sample().member_since(), "março de 2024");
    }

    #[test]
    fn test_wire_deserialization() {
        let json = r#"{
            "id": 3,
            "nome": "João",
            "email": "joao@exemplo.com",
            "data_cadastro": "2023-11-02T08:15:00Z",
            "data_atualizacao": "2024-01-05T09:00:00Z"
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, 3);
        assert_eq!(profile.name, "João");
        assert_eq!(profile.updated_at.as_deref(), Some("2024-01-05T09:00:00Z"));
    }

    #[test]
    fn test_field_accessors() {
        let profile = sample();
        assert_eq!(ProfileField::Name.wire_name(), "nome");
        assert_eq!(ProfileField::Email.value_of(&profile), "maria@exemplo.com");
    }
}
