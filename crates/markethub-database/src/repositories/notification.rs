//! Notification repository implementation.
//!
//! Deduplication lives here, in the unique index on `dedup_key`: the
//! insert uses `ON CONFLICT DO NOTHING`, so a duplicate (whether found
//! by an earlier existence check or raced in by a concurrent identical
//! event) comes back as "no row returned" rather than an error.

use sqlx::PgPool;
use uuid::Uuid;

use markethub_core::error::{AppError, ErrorKind};
use markethub_core::result::AppResult;
use markethub_core::types::pagination::{PageRequest, PageResponse};
use markethub_entity::notification::kind::NotificationKind;
use markethub_entity::notification::model::Notification;

/// Column values for inserting a notification.
#[derive(Debug)]
pub struct NewNotification<'a> {
    /// Recipient user.
    pub user_id: Uuid,
    /// Notification kind.
    pub kind: &'a NotificationKind,
    /// Message text.
    pub message: &'a str,
    /// Structured payload.
    pub payload: &'a serde_json::Value,
    /// Resolved dedup key (caller-supplied or derived signature).
    pub dedup_key: &'a str,
}

/// Repository for notification rows.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification unless its dedup key already exists.
    ///
    /// Returns `None` when the insert was suppressed by the uniqueness
    /// constraint: the "already delivered" case, by design not an error.
    pub async fn create(&self, new: &NewNotification<'_>) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, kind, message, payload, dedup_key) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (dedup_key) DO NOTHING \
             RETURNING *",
        )
        .bind(new.user_id)
        .bind(new.kind)
        .bind(new.message)
        .bind(new.payload)
        .bind(new.dedup_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    /// Find a notification by its dedup key.
    pub async fn find_by_dedup_key(&self, dedup_key: &str) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE dedup_key = $1")
            .bind(dedup_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find notification", e)
            })
    }

    /// List notifications for a user, newest first, optionally filtered
    /// by kind.
    pub async fn find_by_user(
        &self,
        user_id: Uuid,
        kind: Option<&NotificationKind>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let kind_str = kind.map(NotificationKind::as_str);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE user_id = $1 AND ($2::text IS NULL OR kind = $2)",
        )
        .bind(user_id)
        .bind(kind_str)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count notifications", e))?;

        let notifs = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE user_id = $1 AND ($2::text IS NULL OR kind = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(kind_str)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))?;

        Ok(PageResponse::new(
            notifs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    /// Mark one notification as read, scoped to its owner. Returns the
    /// updated row, or `None` if no matching row exists.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE \
             WHERE id = $1 AND user_id = $2 \
             RETURNING *",
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    /// Mark all of a user's notifications as read. Returns how many rows
    /// changed; other users' rows are untouched.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to mark all read", e)
                })?;
        Ok(result.rows_affected())
    }

    /// Delete every notification owned by a user. Used both for the
    /// user's explicit inbox clear and by the account-deletion cleanup
    /// path. Order audit rows cascade with their parents.
    pub async fn clear_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear notifications", e)
            })?;
        Ok(result.rows_affected())
    }
}
