//! Account lifecycle events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted by the accounts domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    /// A seller's verification request was resolved.
    SellerVerified {
        /// The seller's account.
        user_id: Uuid,
        /// The seller's vendor profile.
        vendor_id: Uuid,
        /// Whether verification was approved or rejected.
        approved: bool,
    },
    /// A previously inactive account was activated.
    Activated {
        /// The activated account.
        user_id: Uuid,
    },
}
