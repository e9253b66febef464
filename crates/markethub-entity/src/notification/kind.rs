//! Notification kind enumeration.

/// Kind of a notification, for display-text selection and inbox filtering.
///
/// The set is fixed but extensible: values that arrive from newer event
/// producers and are not recognized here are carried as [`Self::Other`]
/// and render with the generic fallback text rather than being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    // Customer-facing
    /// Order placed and confirmed.
    OrderConfirmation,
    /// Delivery status changed.
    OrderStatusChange,
    /// Delivery is running late.
    DeliveryDelay,
    /// Order was cancelled.
    OrderCancellation,
    /// Payment completed.
    PaymentSuccess,
    /// Payment failed.
    PaymentFailed,
    /// A refund was processed.
    RefundProcessed,
    /// Discount or coupon offer.
    DiscountOffer,
    /// A new vendor joined the marketplace.
    NewVendor,
    /// Reminder to review a delivered order.
    ReviewReminder,
    /// A vendor replied to a review.
    VendorReply,
    // Vendor-facing
    /// A new order came in.
    NewOrder,
    /// An order was cancelled (vendor side).
    VendorOrderCancellation,
    /// A review was posted on one of the vendor's products.
    NewReview,
    /// Product stock is running low.
    LowStock,
    /// Payment for an order was received.
    PaymentReceived,
    // Account
    /// Account-level notice (verification, activation).
    Account,
    /// Unrecognized kind, accepted verbatim.
    Other(String),
}

impl NotificationKind {
    /// Return the kind as its wire/storage string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OrderConfirmation => "order_confirmation",
            Self::OrderStatusChange => "order_status_change",
            Self::DeliveryDelay => "delivery_delay",
            Self::OrderCancellation => "order_cancellation",
            Self::PaymentSuccess => "payment_success",
            Self::PaymentFailed => "payment_failed",
            Self::RefundProcessed => "refund_processed",
            Self::DiscountOffer => "discount_offer",
            Self::NewVendor => "new_vendor",
            Self::ReviewReminder => "review_reminder",
            Self::VendorReply => "vendor_reply",
            Self::NewOrder => "new_order",
            Self::VendorOrderCancellation => "vendor_order_cancellation",
            Self::NewReview => "new_review",
            Self::LowStock => "low_stock",
            Self::PaymentReceived => "payment_received",
            Self::Account => "account",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(value: &str) -> Self {
        match value {
            "order_confirmation" => Self::OrderConfirmation,
            "order_status_change" => Self::OrderStatusChange,
            "delivery_delay" => Self::DeliveryDelay,
            "order_cancellation" => Self::OrderCancellation,
            "payment_success" => Self::PaymentSuccess,
            "payment_failed" => Self::PaymentFailed,
            "refund_processed" => Self::RefundProcessed,
            "discount_offer" => Self::DiscountOffer,
            "new_vendor" => Self::NewVendor,
            "review_reminder" => Self::ReviewReminder,
            "vendor_reply" => Self::VendorReply,
            "new_order" => Self::NewOrder,
            "vendor_order_cancellation" => Self::VendorOrderCancellation,
            "new_review" => Self::NewReview,
            "low_stock" => Self::LowStock,
            "payment_received" => Self::PaymentReceived,
            "account" => Self::Account,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for NotificationKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl serde::Serialize for NotificationKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for NotificationKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from(value))
    }
}

impl sqlx::Type<sqlx::Postgres> for NotificationKind {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <&str as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

impl sqlx::Encode<'_, sqlx::Postgres> for NotificationKind {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        buf.extend_from_slice(self.as_str().as_bytes());
        Ok(sqlx::encode::IsNull::No)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for NotificationKind {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <String as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
        Ok(Self::from(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_round_trip() {
        for raw in [
            "order_confirmation",
            "payment_failed",
            "new_review",
            "account",
        ] {
            let kind = NotificationKind::from(raw);
            assert!(!matches!(kind, NotificationKind::Other(_)));
            assert_eq!(kind.as_str(), raw);
        }
    }

    #[test]
    fn unrecognized_kind_is_carried_verbatim() {
        let kind = NotificationKind::from("loyalty_tier_upgrade");
        assert_eq!(
            kind,
            NotificationKind::Other("loyalty_tier_upgrade".to_string())
        );
        assert_eq!(kind.as_str(), "loyalty_tier_upgrade");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&NotificationKind::NewOrder).unwrap();
        assert_eq!(json, "\"new_order\"");
        let back: NotificationKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NotificationKind::NewOrder);
    }
}
