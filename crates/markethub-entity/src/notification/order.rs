//! Order audit records and snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use markethub_core::types::order::{OrderDetails, PaymentStatus};

use super::kind::NotificationKind;

/// Sentinel recorded as `status_before` when no prior status was
/// supplied. The field must always be queryable for audit
/// reconstruction, so it is never null.
pub const STATUS_UNKNOWN: &str = "unknown";

/// Order audit record attached 1:1 to an order-related notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderNotification {
    /// The owning notification.
    pub notification_id: Uuid,
    /// The order this audit record describes.
    pub order_id: Uuid,
    /// Order status before the recorded transition.
    pub status_before: String,
    /// Order status after the recorded transition.
    pub status_after: String,
    /// Immutable order capture, serialized from [`OrderSnapshot`].
    pub snapshot: serde_json::Value,
}

/// One entry of an order's notification history: the audit record joined
/// with its parent notification's kind, message, and timestamp. History
/// is ordered by the parent's creation time; there is no separate
/// sequence field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderAuditEntry {
    /// The owning notification.
    pub notification_id: Uuid,
    /// The order.
    pub order_id: Uuid,
    /// Status before the transition.
    pub status_before: String,
    /// Status after the transition.
    pub status_after: String,
    /// The captured snapshot.
    pub snapshot: serde_json::Value,
    /// Parent notification kind.
    pub kind: NotificationKind,
    /// Parent notification message.
    pub message: String,
    /// Parent notification creation time.
    pub created_at: DateTime<Utc>,
}

/// One captured line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotItem {
    /// Catalog product ID.
    pub product_id: Uuid,
    /// Product title at capture time.
    pub product: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price at capture time.
    pub unit_price: Decimal,
}

/// Immutable capture of order state at notification-creation time.
///
/// Captured once and stored whole; it is never recomputed from the live
/// order, so it stays correct after the order's items change or
/// disappear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Captured line items.
    pub items: Vec<SnapshotItem>,
    /// Captured total (sum of quantity × unit price, 2 dp).
    pub total: Decimal,
    /// Delivery address at capture time.
    pub delivery_address: String,
    /// Payment status at capture time.
    pub payment_status: PaymentStatus,
    /// Vendor display name, if any.
    pub vendor: Option<String>,
}

impl OrderSnapshot {
    /// Capture the given order view.
    pub fn capture(order: &OrderDetails) -> Self {
        Self {
            items: order
                .items
                .iter()
                .map(|item| SnapshotItem {
                    product_id: item.product_id,
                    product: item.product_title.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
            total: order.total(),
            delivery_address: order.delivery_address.clone(),
            payment_status: order.payment_status,
            vendor: order.vendor_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markethub_core::types::order::OrderLine;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn sample_order() -> OrderDetails {
        OrderDetails {
            id: Uuid::new_v4(),
            customer_user_id: Uuid::new_v4(),
            vendor_id: Some(Uuid::new_v4()),
            vendor_user_id: Some(Uuid::new_v4()),
            vendor_name: Some("Mama's Kitchen".to_string()),
            delivery_address: "14 Harbour Rd".to_string(),
            delivery_status: "preparing".to_string(),
            payment_status: PaymentStatus::Pending,
            items: vec![
                OrderLine {
                    product_id: Uuid::new_v4(),
                    product_title: "Pad Thai".to_string(),
                    quantity: 2,
                    unit_price: dec("8.50"),
                },
                OrderLine {
                    product_id: Uuid::new_v4(),
                    product_title: "Spring Rolls".to_string(),
                    quantity: 1,
                    unit_price: dec("4.25"),
                },
            ],
        }
    }

    #[test]
    fn capture_totals_match_line_items() {
        let snapshot = OrderSnapshot::capture(&sample_order());
        let expected: Decimal = snapshot
            .items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        assert_eq!(snapshot.total, expected.round_dp(2));
        assert_eq!(snapshot.total, dec("21.25"));
    }

    #[test]
    fn capture_is_independent_of_later_order_mutation() {
        let mut order = sample_order();
        let snapshot = OrderSnapshot::capture(&order);

        order.items.clear();
        order.delivery_address = "somewhere else".to_string();

        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.total, dec("21.25"));
        assert_eq!(snapshot.delivery_address, "14 Harbour Rd");
    }

    #[test]
    fn snapshot_serializes_money_as_strings() {
        let snapshot = OrderSnapshot::capture(&sample_order());
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["total"], serde_json::json!("21.25"));
    }
}
