//! Push delivery trait for pluggable provider backends.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::result::AppResult;

/// One logical multicast: a set of device tokens plus the rendered
/// display text and a string-valued data map (the wire format requires
/// string values).
#[derive(Debug, Clone)]
pub struct PushMessage {
    /// Target device tokens.
    pub tokens: Vec<String>,
    /// Display title.
    pub title: String,
    /// Display body.
    pub body: String,
    /// Structured data delivered alongside the display text.
    pub data: BTreeMap<String, String>,
}

/// Whether a per-token failure can ever succeed on a later attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A future attempt may succeed; the token is left registered.
    Transient,
    /// The token will never succeed again and must be evicted.
    Permanent,
}

/// Per-token delivery result.
#[derive(Debug, Clone)]
pub enum DeliveryResult {
    /// The provider accepted the message for this token.
    Delivered {
        /// Provider-assigned message name/ID.
        message_id: String,
    },
    /// Delivery to this token failed.
    Failed {
        /// Failure classification.
        class: FailureClass,
        /// Provider error code, for logging.
        code: String,
    },
}

/// Outcome of one token within a multicast send.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    /// The device token this outcome refers to.
    pub token: String,
    /// What happened for this token.
    pub result: DeliveryResult,
}

impl SendOutcome {
    /// Whether this outcome is a permanent failure, i.e. the token
    /// should be evicted from the device registry.
    pub fn is_permanent_failure(&self) -> bool {
        matches!(
            self.result,
            DeliveryResult::Failed {
                class: FailureClass::Permanent,
                ..
            }
        )
    }
}

/// Trait for push provider backends.
///
/// A send is one logical multicast with independent per-token outcomes;
/// one token's failure never affects delivery to the others, and the
/// implementation performs no per-token retry within a call. The only
/// call-level error is failing to reach the provider at all (e.g. a
/// credential refresh failure).
#[async_trait]
pub trait PushSender: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver `message` to every token, returning one outcome per token.
    async fn send(&self, message: &PushMessage) -> AppResult<Vec<SendOutcome>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_failure_is_detected() {
        let outcome = SendOutcome {
            token: "t1".to_string(),
            result: DeliveryResult::Failed {
                class: FailureClass::Permanent,
                code: "UNREGISTERED".to_string(),
            },
        };
        assert!(outcome.is_permanent_failure());
    }

    #[test]
    fn transient_failure_and_delivery_are_not_permanent() {
        let failed = SendOutcome {
            token: "t1".to_string(),
            result: DeliveryResult::Failed {
                class: FailureClass::Transient,
                code: "UNAVAILABLE".to_string(),
            },
        };
        let delivered = SendOutcome {
            token: "t2".to_string(),
            result: DeliveryResult::Delivered {
                message_id: "projects/demo/messages/1".to_string(),
            },
        };
        assert!(!failed.is_permanent_failure());
        assert!(!delivered.is_permanent_failure());
    }
}
