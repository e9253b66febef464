//! Device registration entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::platform::DevicePlatform;

/// A push-capable device registration.
///
/// A token belongs to at most one user at any time; re-registering a
/// token under a different user replaces the prior owner's row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserDevice {
    /// Registration ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Provider-issued device token. Globally unique.
    pub token: String,
    /// Platform the token was issued for.
    pub platform: DevicePlatform,
    /// When the registration was created.
    pub registered_at: DateTime<Utc>,
}
