//! Account directory trait.
//!
//! Accounts are owned by the marketplace's user domain; the notification
//! subsystem only needs to confirm a recipient exists and to enumerate
//! vendor accounts for broadcasts.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Read-only view over the marketplace account store.
#[async_trait]
pub trait AccountDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Whether an account with this ID exists.
    async fn exists(&self, user_id: Uuid) -> AppResult<bool>;

    /// Account IDs of every vendor, for vendor-wide broadcasts.
    async fn vendor_user_ids(&self) -> AppResult<Vec<Uuid>>;
}
