//! # markethub-service
//!
//! Business logic for the MarketHub notification subsystem: the
//! dispatcher (dedup + push fan-out), the order event recorder
//! (immutable snapshots + status audit), the device registry, the
//! inbox read surface, and the domain-event router.

pub mod context;
pub mod device;
pub mod dispatch;
pub mod inbox;
pub mod order;

pub use context::RequestContext;
pub use device::DeviceRegistry;
pub use dispatch::{EventRouter, NotificationDispatcher};
pub use inbox::NotificationInbox;
pub use order::OrderEventRecorder;
