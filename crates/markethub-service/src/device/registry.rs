//! Owns the mapping from user to push tokens.
//!
//! The uniqueness and atomicity guarantees live in the repository's
//! transactional delete-then-insert; this service adds validation and
//! the inbound-facing registration surface.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use markethub_core::error::AppError;
use markethub_core::result::AppResult;
use markethub_database::repositories::device::DeviceRepository;
use markethub_entity::device::model::UserDevice;
use markethub_entity::device::platform::DevicePlatform;

/// Manages push device registrations.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    /// Device repository.
    repo: Arc<DeviceRepository>,
}

impl DeviceRegistry {
    /// Creates a new registry.
    pub fn new(repo: Arc<DeviceRepository>) -> Self {
        Self { repo }
    }

    /// Register a token for a user. Any prior registration of the same
    /// token, under any user, is replaced in the same transaction.
    pub async fn register(
        &self,
        user_id: Uuid,
        token: &str,
        platform: &str,
    ) -> AppResult<UserDevice> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("Device token must not be empty"));
        }

        let platform = DevicePlatform::from(platform);
        let device = self.repo.register(user_id, token, &platform).await?;
        info!(%user_id, platform = %device.platform, "Device registered");
        Ok(device)
    }

    /// Remove a registration, only if `user_id` owns it. A mismatched
    /// owner is a no-op, not an error.
    pub async fn unregister(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let removed = self.repo.unregister(user_id, token).await?;
        if removed {
            info!(%user_id, "Device unregistered");
        } else {
            debug!(%user_id, "Unregister skipped, token not owned by user");
        }
        Ok(())
    }

    /// Tokens registered for a user.
    pub async fn tokens_for(&self, user_id: Uuid) -> AppResult<Vec<String>> {
        self.repo.tokens_for(user_id).await
    }

    /// Remove every registration for a token. Called when the push
    /// provider reports it permanently invalid.
    pub async fn evict(&self, token: &str) -> AppResult<()> {
        let removed = self.repo.evict(token).await?;
        if removed > 0 {
            info!("Evicted invalid device token");
        }
        Ok(())
    }
}
