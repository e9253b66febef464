//! Event-time view of an order aggregate.
//!
//! The order domain itself lives outside this subsystem; emitting
//! collaborators hand over this read-only view at event time. Nothing in
//! the notification subsystem ever reads the live order back, which is
//! what keeps captured snapshots valid after the order changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment state of an order, as reported by the order domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment has not yet been resolved.
    Pending,
    /// Payment completed successfully.
    Complete,
    /// Payment failed; the order is treated as cancelled.
    Failed,
}

impl PaymentStatus {
    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single order line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Catalog product ID.
    pub product_id: Uuid,
    /// Product title at order time.
    pub product_title: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price at order time.
    pub unit_price: Decimal,
}

/// Read-only view of an order handed over by the order domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Order ID.
    pub id: Uuid,
    /// Account of the customer who placed the order.
    pub customer_user_id: Uuid,
    /// Vendor profile ID, if the order targets a single vendor.
    pub vendor_id: Option<Uuid>,
    /// Account of the vendor, for vendor-facing notifications.
    pub vendor_user_id: Option<Uuid>,
    /// Vendor display name at order time.
    pub vendor_name: Option<String>,
    /// Delivery address captured at order time.
    pub delivery_address: String,
    /// Current delivery status (free-form, owned by the order domain).
    pub delivery_status: String,
    /// Current payment status.
    pub payment_status: PaymentStatus,
    /// Line items.
    pub items: Vec<OrderLine>,
}

impl OrderDetails {
    /// Compute the order total: sum of quantity × unit price over all
    /// line items, rounded to currency precision (2 dp).
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum::<Decimal>()
            .round_dp(2)
    }

    /// Distinct product IDs across all line items, in first-seen order.
    pub fn product_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(self.items.len());
        for item in &self.items {
            if !ids.contains(&item.product_id) {
                ids.push(item.product_id);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("valid decimal literal")
    }

    fn order_with(items: Vec<OrderLine>) -> OrderDetails {
        OrderDetails {
            id: Uuid::new_v4(),
            customer_user_id: Uuid::new_v4(),
            vendor_id: None,
            vendor_user_id: None,
            vendor_name: None,
            delivery_address: "1 Market St".to_string(),
            delivery_status: "preparing".to_string(),
            payment_status: PaymentStatus::Pending,
            items,
        }
    }

    fn line(product_id: Uuid, quantity: u32, unit_price: &str) -> OrderLine {
        OrderLine {
            product_id,
            product_title: "Widget".to_string(),
            quantity,
            unit_price: dec(unit_price),
        }
    }

    #[test]
    fn total_sums_quantity_times_unit_price() {
        let order = order_with(vec![
            line(Uuid::new_v4(), 2, "3.50"),
            line(Uuid::new_v4(), 1, "10.00"),
        ]);
        assert_eq!(order.total(), dec("17.00"));
    }

    #[test]
    fn total_rounds_to_currency_precision() {
        let order = order_with(vec![line(Uuid::new_v4(), 3, "0.333")]);
        assert_eq!(order.total(), dec("1.00"));
    }

    #[test]
    fn total_of_empty_order_is_zero() {
        let order = order_with(Vec::new());
        assert_eq!(order.total(), Decimal::ZERO);
    }

    #[test]
    fn product_ids_are_distinct_and_ordered() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let order = order_with(vec![line(a, 1, "1.00"), line(b, 1, "1.00"), line(a, 2, "1.00")]);
        assert_eq!(order.product_ids(), vec![a, b]);
    }
}
