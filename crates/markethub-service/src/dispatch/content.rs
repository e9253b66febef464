//! Display-text resolution.
//!
//! Pure mapping from (kind, context) to a title/body pair via a static
//! table. Unknown kinds fall back to a generic pair. No side effects,
//! no I/O; this exists purely to keep display-text decisions out of the
//! dispatcher.

use serde_json::Value;

use markethub_entity::notification::kind::NotificationKind;

const GENERIC_TITLE: &str = "MarketHub";
const GENERIC_BODY: &str = "You have a new notification.";

/// Resolve the display title and body for a notification.
pub fn resolve(kind: &NotificationKind, context: &Value) -> (String, String) {
    let order = field(context, "order_id");
    let vendor = field(context, "vendor");

    let (title, body) = match kind {
        NotificationKind::OrderConfirmation => (
            "Order confirmed",
            order.map(|id| format!("Your order {id} has been confirmed.")),
        ),
        NotificationKind::OrderStatusChange => (
            "Order update",
            match (order.as_deref(), field(context, "to")) {
                (Some(id), Some(to)) => Some(format!("Order {id} is now {to}.")),
                (Some(id), None) => Some(format!("Order {id} was updated.")),
                _ => None,
            },
        ),
        NotificationKind::DeliveryDelay => (
            "Delivery delay",
            order.map(|id| format!("Order {id} is running late. Sorry for the wait.")),
        ),
        NotificationKind::OrderCancellation => (
            "Order cancelled",
            order.map(|id| format!("Order {id} has been cancelled.")),
        ),
        NotificationKind::PaymentSuccess => (
            "Payment received",
            order.map(|id| format!("Payment for order {id} went through.")),
        ),
        NotificationKind::PaymentFailed => (
            "Payment failed",
            order.map(|id| {
                format!("Payment for order {id} failed. Please update your payment method.")
            }),
        ),
        NotificationKind::RefundProcessed => (
            "Refund processed",
            order.map(|id| format!("Your refund for order {id} has been processed.")),
        ),
        NotificationKind::DiscountOffer => (
            "New offer",
            Some("A new discount is waiting for you.".to_string()),
        ),
        NotificationKind::NewVendor => (
            "New on MarketHub",
            vendor.map(|name| format!("{name} just joined MarketHub.")),
        ),
        NotificationKind::ReviewReminder => (
            "How was it?",
            Some("Tell us about your recent order.".to_string()),
        ),
        NotificationKind::VendorReply => (
            "Reply to your review",
            vendor.map(|name| format!("{name} replied to your review.")),
        ),
        NotificationKind::NewOrder => (
            "New order",
            order.map(|id| format!("You received order {id}.")),
        ),
        NotificationKind::VendorOrderCancellation => (
            "Order cancelled",
            order.map(|id| format!("Order {id} was cancelled.")),
        ),
        NotificationKind::NewReview => (
            "New review",
            Some("A customer reviewed one of your products.".to_string()),
        ),
        NotificationKind::LowStock => (
            "Low stock",
            field(context, "product").map(|name| format!("{name} is running low.")),
        ),
        NotificationKind::PaymentReceived => (
            "Payment received",
            order.map(|id| format!("Payment for order {id} has been received.")),
        ),
        NotificationKind::Account => (
            "Account update",
            Some("There is an update on your account.".to_string()),
        ),
        NotificationKind::Other(_) => (GENERIC_TITLE, None),
    };

    (
        title.to_string(),
        body.unwrap_or_else(|| GENERIC_BODY.to_string()),
    )
}

/// Look up a context field and coerce it to display text.
fn field(context: &Value, key: &str) -> Option<String> {
    match context.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn order_confirmation_interpolates_order_id() {
        let (title, body) = resolve(
            &NotificationKind::OrderConfirmation,
            &json!({"order_id": 5}),
        );
        assert_eq!(title, "Order confirmed");
        assert_eq!(body, "Your order 5 has been confirmed.");
    }

    #[test]
    fn status_change_uses_target_status() {
        let (_, body) = resolve(
            &NotificationKind::OrderStatusChange,
            &json!({"order_id": "42", "from": "preparing", "to": "on_route"}),
        );
        assert_eq!(body, "Order 42 is now on_route.");
    }

    #[test]
    fn missing_context_falls_back_to_generic_body() {
        let (title, body) = resolve(&NotificationKind::OrderConfirmation, &json!({}));
        assert_eq!(title, "Order confirmed");
        assert_eq!(body, GENERIC_BODY);
    }

    #[test]
    fn unknown_kind_renders_generic_pair() {
        let kind = NotificationKind::from("loyalty_tier_upgrade");
        let (title, body) = resolve(&kind, &json!({"anything": 1}));
        assert_eq!(title, GENERIC_TITLE);
        assert_eq!(body, GENERIC_BODY);
    }

    #[test]
    fn vendor_fields_render_when_present() {
        let (_, body) = resolve(
            &NotificationKind::NewVendor,
            &json!({"vendor": "Mama's Kitchen"}),
        );
        assert_eq!(body, "Mama's Kitchen just joined MarketHub.");
    }
}
