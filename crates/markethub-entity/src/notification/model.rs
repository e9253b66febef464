//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A durable notification record, one row per delivered-or-attempted
/// notification.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Message text.
    pub message: String,
    /// Structured payload, used for display context and push `data`.
    pub payload: serde_json::Value,
    /// Caller-supplied idempotency key, or the derived duplicate
    /// signature of (user, kind, payload) when none was supplied.
    pub dedup_key: String,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was created. Set once by the database.
    pub created_at: DateTime<Utc>,
}
