//! Notification inbox read surface.

pub mod service;

pub use service::NotificationInbox;
