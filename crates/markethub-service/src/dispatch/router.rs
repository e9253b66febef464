//! Synchronous consumption of marketplace domain events.
//!
//! Emitting aggregates publish events explicitly; this router translates
//! each into dispatcher and recorder calls. Only a failure to persist a
//! primary notification row propagates back to the emitter.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use markethub_core::events::{AccountEvent, DomainEvent, EventPayload, OrderEvent, ReviewEvent};
use markethub_core::result::AppResult;
use markethub_core::types::order::{OrderDetails, PaymentStatus};
use markethub_entity::notification::kind::NotificationKind;

use crate::order::OrderEventRecorder;

use super::service::NotificationDispatcher;

/// Routes domain events into notification dispatch.
#[derive(Debug, Clone)]
pub struct EventRouter {
    dispatcher: Arc<NotificationDispatcher>,
    recorder: Arc<OrderEventRecorder>,
}

impl EventRouter {
    /// Creates a new router.
    pub fn new(dispatcher: Arc<NotificationDispatcher>, recorder: Arc<OrderEventRecorder>) -> Self {
        Self {
            dispatcher,
            recorder,
        }
    }

    /// Handle one domain event to completion.
    pub async fn handle(&self, event: &DomainEvent) -> AppResult<()> {
        match &event.payload {
            EventPayload::Order(order_event) => self.handle_order(order_event).await,
            EventPayload::Review(review_event) => self.handle_review(review_event).await,
            EventPayload::Account(account_event) => self.handle_account(account_event).await,
        }
    }

    async fn handle_order(&self, event: &OrderEvent) -> AppResult<()> {
        match event {
            OrderEvent::Placed { order } => {
                self.recorder
                    .record_order_event(
                        order,
                        &placed_message(order.id),
                        NotificationKind::NewOrder,
                        None,
                        None,
                    )
                    .await?;
                self.dispatcher
                    .notify(
                        order.customer_user_id,
                        &confirmation_message(order.id),
                        NotificationKind::OrderConfirmation,
                        json!({ "order_id": order.id }),
                        None,
                    )
                    .await?;
                Ok(())
            }
            OrderEvent::StatusChanged { order, previous } => {
                let message = status_change_message(order.id, previous, &order.delivery_status);
                self.recorder
                    .record_order_event(
                        order,
                        &message,
                        NotificationKind::OrderStatusChange,
                        None,
                        Some(previous.clone()),
                    )
                    .await?;
                self.dispatcher
                    .notify(
                        order.customer_user_id,
                        &message,
                        NotificationKind::OrderStatusChange,
                        json!({
                            "order_id": order.id,
                            "from": previous,
                            "to": order.delivery_status,
                        }),
                        None,
                    )
                    .await?;
                Ok(())
            }
            OrderEvent::PaymentResolved { order, previous } => {
                self.handle_payment(order, *previous).await
            }
        }
    }

    async fn handle_payment(&self, order: &OrderDetails, previous: PaymentStatus) -> AppResult<()> {
        match order.payment_status {
            PaymentStatus::Complete => {
                self.dispatcher
                    .notify(
                        order.customer_user_id,
                        &payment_success_message(order.id),
                        NotificationKind::PaymentSuccess,
                        json!({ "order_id": order.id }),
                        None,
                    )
                    .await?;
                if let Some(vendor) = order.vendor_user_id {
                    self.dispatcher
                        .notify(
                            vendor,
                            &payment_success_message(order.id),
                            NotificationKind::PaymentReceived,
                            json!({ "order_id": order.id }),
                            None,
                        )
                        .await?;
                }
            }
            PaymentStatus::Failed => {
                if previous != PaymentStatus::Failed {
                    self.recorder
                        .record_order_event(
                            order,
                            &cancelled_message(order.id),
                            NotificationKind::OrderCancellation,
                            None,
                            Some(previous.as_str().to_string()),
                        )
                        .await?;
                }
                self.dispatcher
                    .notify(
                        order.customer_user_id,
                        &payment_failed_message(order.id),
                        NotificationKind::PaymentFailed,
                        json!({ "order_id": order.id }),
                        None,
                    )
                    .await?;
                if let Some(vendor) = order.vendor_user_id {
                    self.dispatcher
                        .notify(
                            vendor,
                            &payment_failed_message(order.id),
                            NotificationKind::VendorOrderCancellation,
                            json!({ "order_id": order.id }),
                            None,
                        )
                        .await?;
                }
            }
            PaymentStatus::Pending => {
                debug!(order_id = %order.id, "Payment still pending, nothing to dispatch");
            }
        }
        Ok(())
    }

    async fn handle_review(&self, event: &ReviewEvent) -> AppResult<()> {
        match event {
            ReviewEvent::Posted {
                review_id,
                product_id,
                vendor_user_id,
                rating,
            } => {
                self.dispatcher
                    .notify(
                        *vendor_user_id,
                        "A new review was posted on one of your products",
                        NotificationKind::NewReview,
                        json!({
                            "review_id": review_id,
                            "product_id": product_id,
                            "rating": rating,
                        }),
                        None,
                    )
                    .await?;
                Ok(())
            }
        }
    }

    async fn handle_account(&self, event: &AccountEvent) -> AppResult<()> {
        match event {
            AccountEvent::SellerVerified {
                user_id,
                vendor_id,
                approved,
            } => {
                let message = if *approved {
                    "Your seller account has been verified!"
                } else {
                    "Your seller verification was rejected. Please check your details."
                };
                self.dispatcher
                    .notify(
                        *user_id,
                        message,
                        NotificationKind::Account,
                        json!({ "vendor_id": vendor_id }),
                        None,
                    )
                    .await?;
                Ok(())
            }
            AccountEvent::Activated { user_id } => {
                self.dispatcher
                    .notify(
                        *user_id,
                        "Your account has been activated successfully!",
                        NotificationKind::Account,
                        json!({}),
                        None,
                    )
                    .await?;
                Ok(())
            }
        }
    }
}

fn placed_message(order_id: Uuid) -> String {
    format!("New order {order_id} placed")
}

fn confirmation_message(order_id: Uuid) -> String {
    format!("Order {order_id} confirmed!")
}

fn status_change_message(order_id: Uuid, from: &str, to: &str) -> String {
    format!("Order {order_id} status changed: {from} -> {to}")
}

fn payment_success_message(order_id: Uuid) -> String {
    format!("Payment for order {order_id} received")
}

fn payment_failed_message(order_id: Uuid) -> String {
    format!("Payment failed for order {order_id}")
}

fn cancelled_message(order_id: Uuid) -> String {
    format!("Order {order_id} cancelled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_order_reference() {
        let id = Uuid::new_v4();
        assert_eq!(placed_message(id), format!("New order {id} placed"));
        assert_eq!(confirmation_message(id), format!("Order {id} confirmed!"));
        assert_eq!(
            status_change_message(id, "preparing", "on_route"),
            format!("Order {id} status changed: preparing -> on_route")
        );
        assert_eq!(
            payment_failed_message(id),
            format!("Payment failed for order {id}")
        );
    }
}
