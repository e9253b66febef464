//! Device registration repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use markethub_core::error::{AppError, ErrorKind};
use markethub_core::result::AppResult;
use markethub_entity::device::model::UserDevice;
use markethub_entity::device::platform::DevicePlatform;

/// Repository for push device registrations.
#[derive(Debug, Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a token for a user.
    ///
    /// The delete-then-insert runs in one transaction so a token never
    /// maps to zero or two owners mid-registration, regardless of the
    /// token's current owner.
    pub async fn register(
        &self,
        user_id: Uuid,
        token: &str,
        platform: &DevicePlatform,
    ) -> AppResult<UserDevice> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin registration", e)
        })?;

        sqlx::query("DELETE FROM user_devices WHERE token = $1")
            .bind(token)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to replace device token", e)
            })?;

        let device = sqlx::query_as::<_, UserDevice>(
            "INSERT INTO user_devices (user_id, token, platform) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .bind(platform)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to register device", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit registration", e)
        })?;

        Ok(device)
    }

    /// Delete a registration, only if it is owned by `user_id`. Returns
    /// `false` when no owned row matched (a mismatched owner is a no-op,
    /// not an error).
    pub async fn unregister(&self, user_id: Uuid, token: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_devices WHERE user_id = $1 AND token = $2")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to unregister device", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Device tokens registered for a user, oldest registration first.
    pub async fn tokens_for(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT token FROM user_devices WHERE user_id = $1 ORDER BY registered_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list device tokens", e))
    }

    /// Remove every registration for a token, for any user. Called when
    /// the push provider reports the token permanently invalid.
    pub async fn evict(&self, token: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM user_devices WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to evict device token", e)
            })?;
        Ok(result.rows_affected())
    }
}
