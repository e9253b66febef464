//! Records order-related notifications with immutable snapshots and a
//! status-transition audit trail.

use std::sync::Arc;

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use markethub_core::error::AppError;
use markethub_core::result::AppResult;
use markethub_core::types::order::OrderDetails;
use markethub_database::repositories::notification::NotificationRepository;
use markethub_database::repositories::order_notification::OrderNotificationRepository;
use markethub_entity::notification::kind::NotificationKind;
use markethub_entity::notification::model::Notification;
use markethub_entity::notification::order::{OrderAuditEntry, OrderSnapshot, STATUS_UNKNOWN};

use crate::dispatch::NotificationDispatcher;
use crate::dispatch::service::canonical_json;

/// Creates order notifications through the dispatcher's persistence path
/// and maintains their 1:1 audit records.
#[derive(Debug, Clone)]
pub struct OrderEventRecorder {
    /// The dispatcher; order notifications share its table and dedup
    /// semantics.
    dispatcher: Arc<NotificationDispatcher>,
    /// Notification repository, to recover the existing row on a dedup
    /// hit.
    notif_repo: Arc<NotificationRepository>,
    /// Audit record repository.
    order_repo: Arc<OrderNotificationRepository>,
}

impl OrderEventRecorder {
    /// Creates a new recorder.
    pub fn new(
        dispatcher: Arc<NotificationDispatcher>,
        notif_repo: Arc<NotificationRepository>,
        order_repo: Arc<OrderNotificationRepository>,
    ) -> Self {
        Self {
            dispatcher,
            notif_repo,
            order_repo,
        }
    }

    /// Record an order event: create the notification (customer-owned)
    /// and upsert its audit record.
    ///
    /// The snapshot defaults to a fresh capture of the order view;
    /// `status_before` defaults to the `"unknown"` sentinel, never null.
    /// Two calls describing two different transitions (or carrying two
    /// different snapshots) are two distinct notification rows; the same
    /// transition reported twice collapses onto one row, whose audit
    /// fields are rewritten in place.
    pub async fn record_order_event(
        &self,
        order: &OrderDetails,
        message: &str,
        kind: NotificationKind,
        snapshot: Option<OrderSnapshot>,
        status_before: Option<String>,
    ) -> AppResult<Notification> {
        let snapshot = snapshot.unwrap_or_else(|| OrderSnapshot::capture(order));
        let snapshot_value = serde_json::to_value(&snapshot)?;
        let status_before = status_before.unwrap_or_else(|| STATUS_UNKNOWN.to_string());
        let status_after = order.delivery_status.clone();

        let payload = order_payload(order);
        let dedup_key = event_key(
            order.customer_user_id,
            &kind,
            &payload,
            &snapshot_value,
            &status_before,
            &status_after,
        );

        let notification = match self
            .dispatcher
            .notify(
                order.customer_user_id,
                message,
                kind,
                payload,
                Some(dedup_key.clone()),
            )
            .await?
        {
            Some(notification) => notification,
            None => {
                // Same transition reported again: reuse the existing row
                // and rewrite its audit fields below.
                debug!(order_id = %order.id, "Order event already recorded, updating audit record");
                self.notif_repo
                    .find_by_dedup_key(&dedup_key)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal("Deduplicated notification row disappeared")
                    })?
            }
        };

        self.order_repo
            .upsert(
                notification.id,
                order.id,
                &status_before,
                &status_after,
                &snapshot_value,
            )
            .await?;

        Ok(notification)
    }

    /// The order's notification history, ordered by notification
    /// creation time, which is the canonical status timeline.
    pub async fn history(&self, order_id: Uuid) -> AppResult<Vec<OrderAuditEntry>> {
        self.order_repo.history(order_id).await
    }
}

/// Payload summarizing the order, carried on the notification so a
/// client can correlate a push with specific catalog entries without a
/// second fetch.
pub(crate) fn order_payload(order: &OrderDetails) -> Value {
    let mut payload = json!({
        "order_id": order.id,
        "total": order.total(),
        "item_count": order.items.len(),
        "product_ids": order.product_ids(),
    });
    if let Some(vendor_id) = order.vendor_id {
        payload["vendor_id"] = json!(vendor_id);
    }
    payload
}

/// Dedup key for an order event. Folds the snapshot and the status
/// transition into the signature so that distinct transitions (and
/// distinct explicit snapshots) stay distinct rows, while an identical
/// double-fired event collapses onto one.
pub(crate) fn event_key(
    user_id: Uuid,
    kind: &NotificationKind,
    payload: &Value,
    snapshot: &Value,
    status_before: &str,
    status_after: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0x1f]);
    hasher.update(kind.as_str().as_bytes());
    hasher.update([0x1f]);
    hasher.update(canonical_json(payload).as_bytes());
    hasher.update([0x1f]);
    hasher.update(canonical_json(snapshot).as_bytes());
    hasher.update([0x1f]);
    hasher.update(status_before.as_bytes());
    hasher.update([0x1f]);
    hasher.update(status_after.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markethub_core::types::order::{OrderLine, PaymentStatus};
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn sample_order() -> OrderDetails {
        let product = Uuid::new_v4();
        OrderDetails {
            id: Uuid::new_v4(),
            customer_user_id: Uuid::new_v4(),
            vendor_id: Some(Uuid::new_v4()),
            vendor_user_id: Some(Uuid::new_v4()),
            vendor_name: Some("Green Grocer".to_string()),
            delivery_address: "5 Pier Ave".to_string(),
            delivery_status: "preparing".to_string(),
            payment_status: PaymentStatus::Pending,
            items: vec![
                OrderLine {
                    product_id: product,
                    product_title: "Apples".to_string(),
                    quantity: 3,
                    unit_price: dec("2.00"),
                },
                OrderLine {
                    product_id: product,
                    product_title: "Apples".to_string(),
                    quantity: 1,
                    unit_price: dec("2.00"),
                },
            ],
        }
    }

    #[test]
    fn payload_summarizes_the_order() {
        let order = sample_order();
        let payload = order_payload(&order);

        assert_eq!(payload["order_id"], json!(order.id));
        assert_eq!(payload["total"], json!("8.00"));
        assert_eq!(payload["item_count"], json!(2));
        assert_eq!(payload["product_ids"].as_array().unwrap().len(), 1);
        assert_eq!(payload["vendor_id"], json!(order.vendor_id.unwrap()));
    }

    #[test]
    fn payload_omits_vendor_when_absent() {
        let mut order = sample_order();
        order.vendor_id = None;
        let payload = order_payload(&order);
        assert!(payload.get("vendor_id").is_none());
    }

    #[test]
    fn event_key_is_stable_for_identical_events() {
        let order = sample_order();
        let payload = order_payload(&order);
        let snapshot = serde_json::to_value(OrderSnapshot::capture(&order)).unwrap();
        let kind = NotificationKind::NewOrder;

        let a = event_key(
            order.customer_user_id,
            &kind,
            &payload,
            &snapshot,
            "unknown",
            "preparing",
        );
        let b = event_key(
            order.customer_user_id,
            &kind,
            &payload,
            &snapshot,
            "unknown",
            "preparing",
        );
        assert_eq!(a, b);
    }

    #[test]
    fn event_key_differs_for_different_snapshots_and_transitions() {
        let order = sample_order();
        let payload = order_payload(&order);
        let snapshot_one = serde_json::to_value(OrderSnapshot::capture(&order)).unwrap();

        let mut changed = order.clone();
        changed.items.pop();
        let snapshot_two = serde_json::to_value(OrderSnapshot::capture(&changed)).unwrap();

        let kind = NotificationKind::OrderStatusChange;
        let base = event_key(
            order.customer_user_id,
            &kind,
            &payload,
            &snapshot_one,
            "preparing",
            "on_route",
        );

        assert_ne!(
            base,
            event_key(
                order.customer_user_id,
                &kind,
                &payload,
                &snapshot_two,
                "preparing",
                "on_route",
            )
        );
        assert_ne!(
            base,
            event_key(
                order.customer_user_id,
                &kind,
                &payload,
                &snapshot_one,
                "on_route",
                "delivered",
            )
        );
    }
}
