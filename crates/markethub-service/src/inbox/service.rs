//! Read/update façade over persisted notification rows, consumed by the
//! (external) web layer.

use std::sync::Arc;

use uuid::Uuid;

use markethub_core::error::AppError;
use markethub_core::result::AppResult;
use markethub_core::types::pagination::{PageRequest, PageResponse};
use markethub_database::repositories::notification::NotificationRepository;
use markethub_database::repositories::order_notification::OrderNotificationRepository;
use markethub_entity::notification::kind::NotificationKind;
use markethub_entity::notification::model::Notification;
use markethub_entity::notification::order::OrderAuditEntry;

use crate::context::RequestContext;

/// Per-user inbox over persisted notifications.
#[derive(Debug, Clone)]
pub struct NotificationInbox {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
    /// Audit record repository, for per-order history.
    order_repo: Arc<OrderNotificationRepository>,
}

impl NotificationInbox {
    /// Creates a new inbox service.
    pub fn new(
        notif_repo: Arc<NotificationRepository>,
        order_repo: Arc<OrderNotificationRepository>,
    ) -> Self {
        Self {
            notif_repo,
            order_repo,
        }
    }

    /// List the user's notifications, newest first, optionally filtered
    /// by kind.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        kind: Option<NotificationKind>,
        page: PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notif_repo
            .find_by_user(ctx.user_id, kind.as_ref(), &page)
            .await
    }

    /// Count the user's unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notif_repo.count_unread(ctx.user_id).await
    }

    /// Retrieve one notification and mark it read in the same step.
    pub async fn read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> AppResult<Notification> {
        self.notif_repo
            .mark_read(notification_id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No notification {notification_id}")))
    }

    /// Mark all of the user's notifications as read. Returns the number
    /// of rows changed; other users' notifications are untouched.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notif_repo.mark_all_read(ctx.user_id).await
    }

    /// Delete every notification owned by the user.
    pub async fn clear_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notif_repo.clear_all(ctx.user_id).await
    }

    /// An order's notification history via its linked audit records.
    pub async fn order_history(&self, order_id: Uuid) -> AppResult<Vec<OrderAuditEntry>> {
        self.order_repo.history(order_id).await
    }
}
