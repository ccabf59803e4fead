//! Operation record domain model.

use serde::{Deserialize, Serialize};

use crate::timestamp;

/// A completed, server-computed calculation.
///
/// Records are created only by the server in response to a calculate call;
/// the client never mutates one, it only displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Server-assigned identifier, absent for entries echoed straight from
    /// a calculate response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// The expression exactly as submitted
    #[serde(rename = "operacao")]
    pub expression: String,
    /// The server-computed result, kept as opaque text
    #[serde(rename = "resultado")]
    pub result: String,
    /// Creation timestamp (ISO 8601), when the server includes it
    #[serde(rename = "data_inclusao", default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
}

impl Operation {
    /// Builds the three display lines for a history entry:
    /// expression, `= result`, and the localized timestamp.
    pub fn display_lines(&self) -> [String; 3] {
        let when = match &self.recorded_at {
            Some(ts) => timestamp::format_short(ts),
            None => timestamp::UNAVAILABLE.to_string(),
        };

        [
            self.expression.clone(),
            format!("= {}", self.result),
            when,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_deserialization() {
        let json = r#"{
            "id": 42,
            "operacao": "2+2",
            "resultado": "4",
            "tipo_operacao": "soma",
            "data_inclusao": "2024-01-15T10:30:45Z",
            "usuario": 3,
            "usuario_nome": "João"
        }"#;

        let op: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(op.expression, "2+2");
        assert_eq!(op.result, "4");
        assert_eq!(op.recorded_at.as_deref(), Some("2024-01-15T10:30:45Z"));
    }

    #[test]
    fn test_display_lines() {
        let op = Operation {
            id: None,
            expression: "10*5".to_string(),
            result: "50".to_string(),
            recorded_at: None,
        };

        let [expr, result, when] = op.display_lines();
        assert_eq!(expr, "10*5");
        assert_eq!(result, "= 50");
        assert_eq!(when, timestamp::UNAVAILABLE);
    }
}
