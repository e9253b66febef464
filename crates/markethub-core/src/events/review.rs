//! Review events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events emitted when customers review products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    /// A review was posted on a vendor's product.
    Posted {
        /// Review ID.
        review_id: Uuid,
        /// Reviewed product.
        product_id: Uuid,
        /// Account of the vendor who owns the product.
        vendor_user_id: Uuid,
        /// Star rating (1–5).
        rating: i16,
    },
}
