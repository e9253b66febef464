//! Order audit record repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use markethub_core::error::{AppError, ErrorKind};
use markethub_core::result::AppResult;
use markethub_entity::notification::order::{OrderAuditEntry, OrderNotification};

/// Repository for order audit records.
#[derive(Debug, Clone)]
pub struct OrderNotificationRepository {
    pool: PgPool,
}

impl OrderNotificationRepository {
    /// Create a new order-notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create or replace the audit record for a notification.
    ///
    /// Keyed by `notification_id` (1:1 with the parent). A later pass over
    /// the same notification rewrites the status fields and replaces the
    /// snapshot whole; snapshots are never merged.
    pub async fn upsert(
        &self,
        notification_id: Uuid,
        order_id: Uuid,
        status_before: &str,
        status_after: &str,
        snapshot: &serde_json::Value,
    ) -> AppResult<OrderNotification> {
        sqlx::query_as::<_, OrderNotification>(
            "INSERT INTO order_notifications \
                 (notification_id, order_id, status_before, status_after, snapshot) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (notification_id) DO UPDATE SET \
                 status_before = EXCLUDED.status_before, \
                 status_after = EXCLUDED.status_after, \
                 snapshot = EXCLUDED.snapshot \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(order_id)
        .bind(status_before)
        .bind(status_after)
        .bind(snapshot)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert order audit record", e)
        })
    }

    /// Find the audit record for a notification.
    pub async fn find_by_notification(
        &self,
        notification_id: Uuid,
    ) -> AppResult<Option<OrderNotification>> {
        sqlx::query_as::<_, OrderNotification>(
            "SELECT * FROM order_notifications WHERE notification_id = $1",
        )
        .bind(notification_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find order audit record", e)
        })
    }

    /// An order's notification history, ordered by the parent
    /// notification's creation time. This ordering is the canonical
    /// timeline; there is no separate sequence field.
    pub async fn history(&self, order_id: Uuid) -> AppResult<Vec<OrderAuditEntry>> {
        sqlx::query_as::<_, OrderAuditEntry>(
            "SELECT o.notification_id, o.order_id, o.status_before, o.status_after, \
                    o.snapshot, n.kind, n.message, n.created_at \
             FROM order_notifications o \
             JOIN notifications n ON n.id = o.notification_id \
             WHERE o.order_id = $1 \
             ORDER BY n.created_at ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load order history", e)
        })
    }
}
