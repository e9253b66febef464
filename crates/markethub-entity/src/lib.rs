//! # markethub-entity
//!
//! Persisted entity models for the MarketHub notification subsystem:
//! notifications, their order audit records, and device registrations.

pub mod device;
pub mod notification;

pub use device::{DevicePlatform, UserDevice};
pub use notification::{
    Notification, NotificationKind, OrderAuditEntry, OrderNotification, OrderSnapshot,
    SnapshotItem,
};
