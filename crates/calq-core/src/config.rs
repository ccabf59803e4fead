//! Client configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_verify_timeout_secs() -> u64 {
    5
}

/// Settings loaded from `config.toml`; every field has a compiled-in
/// default, so the file is optional.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the Calculadora API server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to every request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Tighter bound for the cached-profile verification on startup
    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            verify_timeout_secs: default_verify_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(r#"base_url = "https://calc.example""#).unwrap();
        assert_eq!(config.base_url, "https://calc.example");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.verify_timeout_secs, 5);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
