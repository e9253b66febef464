//! Domain events emitted by marketplace operations.
//!
//! Emitting aggregates (orders, reviews, accounts) publish these events
//! explicitly; the notification subsystem consumes them synchronously
//! through its event router. There is no hidden save-implies-notify
//! coupling.

pub mod account;
pub mod order;
pub mod review;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use account::AccountEvent;
pub use order::OrderEvent;
pub use review::ReviewEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// An order-related event.
    Order(OrderEvent),
    /// A review-related event.
    Review(ReviewEvent),
    /// An account-related event.
    Account(AccountEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}
