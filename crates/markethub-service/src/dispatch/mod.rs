//! Notification dispatch: dedup policy, persistence, push fan-out, and
//! domain-event routing.

pub mod content;
pub mod router;
pub mod service;

pub use router::EventRouter;
pub use service::NotificationDispatcher;
