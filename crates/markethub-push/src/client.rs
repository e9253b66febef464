//! FCM HTTP v1 client.
//!
//! One [`PushSender::send`] call is one logical multicast: every token
//! gets its own `messages:send` request, issued concurrently, and the
//! call returns one outcome per token. Per-token failures never abort
//! the rest of the set and are never retried within a call.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use markethub_core::config::PushConfig;
use markethub_core::error::{AppError, ErrorKind};
use markethub_core::result::AppResult;
use markethub_core::traits::push::{
    DeliveryResult, FailureClass, PushMessage, PushSender, SendOutcome,
};

use crate::classify::ErrorClassifier;
use crate::credentials::{ServiceAccountKey, TokenProvider};

/// Production FCM endpoint. Overridable via configuration for tests.
const DEFAULT_ENDPOINT: &str = "https://fcm.googleapis.com";

/// FCM HTTP v1 push client.
#[derive(Debug)]
pub struct FcmClient {
    http: reqwest::Client,
    auth: TokenProvider,
    project_id: String,
    endpoint: String,
    classifier: ErrorClassifier,
}

impl FcmClient {
    /// Build a client from configuration: loads the service-account key
    /// and prepares an HTTP client whose timeout bounds each send call.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let key = ServiceAccountKey::from_file(&config.service_account_path)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        let project_id = key.project_id.clone();
        let auth = TokenProvider::new(key, http.clone())?;

        Ok(Self {
            http,
            auth,
            project_id,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            classifier: ErrorClassifier::new(&config.classification),
        })
    }

    #[instrument(skip(self, url, bearer, message))]
    async fn send_one(
        &self,
        url: &str,
        bearer: &str,
        token: &str,
        message: &PushMessage,
    ) -> SendOutcome {
        let body = json!({
            "message": {
                "token": token,
                "notification": {
                    "title": message.title,
                    "body": message.body,
                },
                "data": message.data,
            }
        });

        let response = match self.http.post(url).bearer_auth(bearer).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Push request failed to reach provider");
                return SendOutcome {
                    token: token.to_string(),
                    result: DeliveryResult::Failed {
                        class: FailureClass::Transient,
                        code: "NETWORK_ERROR".to_string(),
                    },
                };
            }
        };

        let status = response.status();
        let payload: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            let message_id = payload
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            debug!(message_id = %message_id, "Push delivered");
            return SendOutcome {
                token: token.to_string(),
                result: DeliveryResult::Delivered { message_id },
            };
        }

        let code = error_code(status, &payload);
        let class = self.classifier.classify(&code);
        warn!(code = %code, ?class, "Push delivery failed for token");
        SendOutcome {
            token: token.to_string(),
            result: DeliveryResult::Failed { class, code },
        }
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, message: &PushMessage) -> AppResult<Vec<SendOutcome>> {
        if message.tokens.is_empty() {
            return Ok(Vec::new());
        }

        // A refresh failure abandons the whole attempt for this call;
        // per-token failures below never do.
        let bearer = self.auth.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.project_id
        );

        let sends = message
            .tokens
            .iter()
            .map(|token| self.send_one(&url, &bearer, token, message));

        Ok(join_all(sends).await)
    }
}

/// Extract the most specific provider error code available: the FCM
/// detail `errorCode`, else the RPC `status`, else a fallback derived
/// from the HTTP status.
fn error_code(status: StatusCode, payload: &Value) -> String {
    let error = &payload["error"];

    if let Some(details) = error["details"].as_array() {
        for detail in details {
            if let Some(code) = detail["errorCode"].as_str() {
                return code.to_string();
            }
        }
    }

    if let Some(code) = error["status"].as_str() {
        return code.to_string();
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => "QUOTA_EXCEEDED".to_string(),
        s if s.is_server_error() => "UNAVAILABLE".to_string(),
        s => format!("HTTP_{}", s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_prefers_fcm_detail() {
        let payload = json!({
            "error": {
                "status": "NOT_FOUND",
                "details": [
                    { "@type": "type.googleapis.com/google.firebase.fcm.v1.FcmError",
                      "errorCode": "UNREGISTERED" }
                ]
            }
        });
        assert_eq!(error_code(StatusCode::NOT_FOUND, &payload), "UNREGISTERED");
    }

    #[test]
    fn error_code_falls_back_to_rpc_status() {
        let payload = json!({ "error": { "status": "INVALID_ARGUMENT" } });
        assert_eq!(
            error_code(StatusCode::BAD_REQUEST, &payload),
            "INVALID_ARGUMENT"
        );
    }

    #[test]
    fn error_code_falls_back_to_http_status() {
        assert_eq!(
            error_code(StatusCode::TOO_MANY_REQUESTS, &Value::Null),
            "QUOTA_EXCEEDED"
        );
        assert_eq!(
            error_code(StatusCode::SERVICE_UNAVAILABLE, &Value::Null),
            "UNAVAILABLE"
        );
        assert_eq!(error_code(StatusCode::FORBIDDEN, &Value::Null), "HTTP_403");
    }
}
