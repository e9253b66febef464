//! Push delivery gateway configuration.

use serde::{Deserialize, Serialize};

/// Push delivery gateway configuration.
///
/// When `enabled` is false the dispatcher persists notifications but
/// skips push fan-out entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the provider service-account key file (JSON).
    #[serde(default = "default_service_account_path")]
    pub service_account_path: String,
    /// Override for the provider API endpoint. Used by tests; defaults to
    /// the production endpoint when absent.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Timeout for a single multicast send call, in seconds. Bounds only
    /// the HTTP round-trip, never notification persistence.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Error-code classification overrides, merged over the built-in
    /// defaults.
    #[serde(default)]
    pub classification: ClassificationOverrides,
}

/// Additional provider error codes to classify as permanent or transient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationOverrides {
    /// Codes treated as permanent failures (token evicted).
    #[serde(default)]
    pub permanent: Vec<String>,
    /// Codes treated as transient failures (token left alone).
    #[serde(default)]
    pub transient: Vec<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_account_path: default_service_account_path(),
            endpoint: None,
            request_timeout_seconds: default_request_timeout(),
            classification: ClassificationOverrides::default(),
        }
    }
}

fn default_service_account_path() -> String {
    "secrets/fcm-service-account.json".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: PushConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.request_timeout_seconds, 10);
        assert!(config.endpoint.is_none());
        assert!(config.classification.permanent.is_empty());
    }
}
