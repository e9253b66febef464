//! The notification dispatcher.
//!
//! Single entry point for creating a notification. The dispatcher owns
//! the dedup policy and orchestrates push fan-out; the ordering
//! guarantee is that the notification row commits before any push
//! attempt, and no push failure can undo that commit.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use markethub_core::error::AppError;
use markethub_core::result::AppResult;
use markethub_core::traits::AccountDirectory;
use markethub_core::traits::push::{PushMessage, PushSender, SendOutcome};
use markethub_database::repositories::device::DeviceRepository;
use markethub_database::repositories::notification::{NewNotification, NotificationRepository};
use markethub_entity::notification::kind::NotificationKind;
use markethub_entity::notification::model::Notification;

use super::content;

/// Creates notifications and fans them out to registered devices.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
    /// Device repository, for token lookup and eviction.
    device_repo: Arc<DeviceRepository>,
    /// Account directory, for recipient validation and vendor broadcasts.
    directory: Arc<dyn AccountDirectory>,
    /// Push gateway. `None` when push delivery is disabled; persistence
    /// is never gated on it.
    push: Option<Arc<dyn PushSender>>,
}

impl NotificationDispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        notif_repo: Arc<NotificationRepository>,
        device_repo: Arc<DeviceRepository>,
        directory: Arc<dyn AccountDirectory>,
        push: Option<Arc<dyn PushSender>>,
    ) -> Self {
        Self {
            notif_repo,
            device_repo,
            directory,
            push,
        }
    }

    /// Create a notification for a user and attempt push delivery.
    ///
    /// Returns `Ok(None)` when an identical notification already exists,
    /// either by the caller's `dedup_key` or by the derived
    /// (user, kind, payload) signature. The storage-level unique index
    /// decides; a conflict raced in by a concurrent identical event is
    /// "already delivered", not an error.
    ///
    /// Everything after the insert is best-effort: missing devices,
    /// transport failures, and invalid tokens are logged, never
    /// propagated.
    pub async fn notify(
        &self,
        user_id: Uuid,
        message: &str,
        kind: NotificationKind,
        payload: Value,
        dedup_key: Option<String>,
    ) -> AppResult<Option<Notification>> {
        if !self.directory.exists(user_id).await? {
            return Err(AppError::not_found(format!(
                "No account for recipient {user_id}"
            )));
        }

        let dedup_key = dedup_key.unwrap_or_else(|| dedup_signature(user_id, &kind, &payload));

        let created = self
            .notif_repo
            .create(&NewNotification {
                user_id,
                kind: &kind,
                message,
                payload: &payload,
                dedup_key: &dedup_key,
            })
            .await?;

        let Some(notification) = created else {
            debug!(%user_id, kind = %kind, "Duplicate notification suppressed");
            return Ok(None);
        };

        info!(
            notification_id = %notification.id,
            %user_id,
            kind = %notification.kind,
            "Notification created"
        );

        self.fan_out(&notification).await;
        Ok(Some(notification))
    }

    /// Broadcast one notification to many users.
    ///
    /// Users who already have an identical (kind, payload) notification
    /// are silently skipped; a conflicting subset never fails the batch.
    pub async fn notify_many(
        &self,
        user_ids: &[Uuid],
        message: &str,
        kind: NotificationKind,
        payload: Value,
    ) -> AppResult<Vec<Notification>> {
        let mut created = Vec::new();
        for &user_id in user_ids {
            let dedup_key = dedup_signature(user_id, &kind, &payload);
            let inserted = self
                .notif_repo
                .create(&NewNotification {
                    user_id,
                    kind: &kind,
                    message,
                    payload: &payload,
                    dedup_key: &dedup_key,
                })
                .await?;

            match inserted {
                Some(notification) => {
                    self.fan_out(&notification).await;
                    created.push(notification);
                }
                None => {
                    debug!(%user_id, kind = %kind, "Skipping user with identical notification");
                }
            }
        }

        info!(
            requested = user_ids.len(),
            created = created.len(),
            kind = %kind,
            "Broadcast notifications created"
        );
        Ok(created)
    }

    /// Broadcast to every vendor account.
    pub async fn notify_vendors(
        &self,
        message: &str,
        kind: NotificationKind,
        payload: Value,
    ) -> AppResult<Vec<Notification>> {
        let vendors = self.directory.vendor_user_ids().await?;
        self.notify_many(&vendors, message, kind, payload).await
    }

    /// Best-effort push fan-out. The notification row is already
    /// committed; nothing in here may fail the dispatch.
    async fn fan_out(&self, notification: &Notification) {
        let Some(push) = &self.push else {
            return;
        };

        let tokens = match self.device_repo.tokens_for(notification.user_id).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(
                    error = %e,
                    notification_id = %notification.id,
                    "Device lookup failed, skipping push"
                );
                return;
            }
        };

        if tokens.is_empty() {
            debug!(
                user_id = %notification.user_id,
                "No registered devices, push skipped"
            );
            return;
        }

        let (title, body) = content::resolve(&notification.kind, &notification.payload);
        let message = PushMessage {
            tokens,
            title,
            body,
            data: push_data(notification),
        };

        match push.send(&message).await {
            Ok(outcomes) => self.evict_dead_tokens(&outcomes).await,
            Err(e) => {
                warn!(
                    error = %e,
                    notification_id = %notification.id,
                    "Push delivery failed"
                );
            }
        }
    }

    async fn evict_dead_tokens(&self, outcomes: &[SendOutcome]) {
        for token in permanent_failures(outcomes) {
            match self.device_repo.evict(token).await {
                Ok(_) => info!(token, "Evicted permanently invalid device token"),
                Err(e) => warn!(error = %e, token, "Failed to evict invalid token"),
            }
        }
    }
}

/// Derived duplicate signature for a notification without a caller key:
/// SHA-256 over the recipient, kind, and canonicalized payload.
pub fn dedup_signature(user_id: Uuid, kind: &NotificationKind, payload: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0x1f]);
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0x1f]);
    hasher.update(canonical_json(payload).as_bytes());
    hex::encode(hasher.finalize())
}

/// Render JSON with object keys sorted at every level, so that two
/// semantically equal payloads hash identically regardless of key order.
pub(crate) fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

/// Build the push `data` map: payload values coerced to strings (the
/// wire format requires string values), plus the notification id and
/// kind. The id and kind entries win on key collision.
pub(crate) fn push_data(notification: &Notification) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    if let Value::Object(map) = &notification.payload {
        for (key, value) in map {
            data.insert(key.clone(), coerce_to_string(value));
        }
    }
    data.insert(
        "notification_id".to_string(),
        notification.id.to_string(),
    );
    data.insert("kind".to_string(), notification.kind.as_str().to_string());
    data
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Tokens whose outcome says they will never succeed again.
pub(crate) fn permanent_failures(outcomes: &[SendOutcome]) -> Vec<&str> {
    outcomes
        .iter()
        .filter(|outcome| outcome.is_permanent_failure())
        .map(|outcome| outcome.token.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use markethub_core::traits::push::{DeliveryResult, FailureClass};
    use serde_json::json;

    fn notification_with_payload(payload: Value) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: NotificationKind::OrderConfirmation,
            message: "Order confirmed".to_string(),
            payload,
            dedup_key: "key".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn signature_is_stable_across_key_order() {
        let user = Uuid::new_v4();
        let kind = NotificationKind::DiscountOffer;
        let a = json!({"deal_id": 9, "region": "west"});
        let b = json!({"region": "west", "deal_id": 9});
        assert_eq!(
            dedup_signature(user, &kind, &a),
            dedup_signature(user, &kind, &b)
        );
    }

    #[test]
    fn signature_differs_by_user_kind_and_payload() {
        let user = Uuid::new_v4();
        let payload = json!({"order_id": 5});
        let base = dedup_signature(user, &NotificationKind::OrderConfirmation, &payload);

        assert_ne!(
            base,
            dedup_signature(Uuid::new_v4(), &NotificationKind::OrderConfirmation, &payload)
        );
        assert_ne!(
            base,
            dedup_signature(user, &NotificationKind::PaymentSuccess, &payload)
        );
        assert_ne!(
            base,
            dedup_signature(user, &NotificationKind::OrderConfirmation, &json!({"order_id": 6}))
        );
    }

    #[test]
    fn canonical_json_sorts_nested_objects() {
        let value = json!({"b": {"y": 1, "x": [2, {"q": 3, "p": 4}]}, "a": true});
        assert_eq!(
            canonical_json(&value),
            r#"{"a":true,"b":{"x":[2,{"p":4,"q":3}],"y":1}}"#
        );
    }

    #[test]
    fn push_data_coerces_values_to_strings() {
        let notification = notification_with_payload(json!({
            "order_id": 5,
            "vendor": "Mama's Kitchen",
            "express": true,
        }));
        let data = push_data(&notification);
        assert_eq!(data["order_id"], "5");
        assert_eq!(data["vendor"], "Mama's Kitchen");
        assert_eq!(data["express"], "true");
        assert_eq!(data["notification_id"], notification.id.to_string());
        assert_eq!(data["kind"], "order_confirmation");
    }

    #[test]
    fn push_data_reserved_keys_win_over_payload() {
        let notification = notification_with_payload(json!({"kind": "spoofed"}));
        let data = push_data(&notification);
        assert_eq!(data["kind"], "order_confirmation");
    }

    #[test]
    fn permanent_failures_selects_only_evictable_tokens() {
        let outcomes = vec![
            SendOutcome {
                token: "dead".to_string(),
                result: DeliveryResult::Failed {
                    class: FailureClass::Permanent,
                    code: "UNREGISTERED".to_string(),
                },
            },
            SendOutcome {
                token: "busy".to_string(),
                result: DeliveryResult::Failed {
                    class: FailureClass::Transient,
                    code: "UNAVAILABLE".to_string(),
                },
            },
            SendOutcome {
                token: "ok".to_string(),
                result: DeliveryResult::Delivered {
                    message_id: "m1".to_string(),
                },
            },
        ];
        assert_eq!(permanent_failures(&outcomes), vec!["dead"]);
    }
}
