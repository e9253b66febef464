//! Order lifecycle events.

use serde::{Deserialize, Serialize};

use crate::types::order::{OrderDetails, PaymentStatus};

/// Events emitted by the order domain.
///
/// Each variant carries the full event-time order view so that the
/// notification subsystem can build payloads and snapshots without
/// reading the live order back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderEvent {
    /// A new order was placed.
    Placed {
        /// The order as placed.
        order: OrderDetails,
    },
    /// The delivery status changed.
    StatusChanged {
        /// The order after the change.
        order: OrderDetails,
        /// Delivery status before the change.
        previous: String,
    },
    /// The payment was resolved (completed or failed).
    PaymentResolved {
        /// The order after resolution.
        order: OrderDetails,
        /// Payment status before resolution.
        previous: PaymentStatus,
    },
}

impl OrderEvent {
    /// The order view carried by this event.
    pub fn order(&self) -> &OrderDetails {
        match self {
            Self::Placed { order }
            | Self::StatusChanged { order, .. }
            | Self::PaymentResolved { order, .. } => order,
        }
    }
}
