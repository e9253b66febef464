//! Repository implementations for all MarketHub notification entities.

pub mod device;
pub mod notification;
pub mod order_notification;

pub use device::DeviceRepository;
pub use notification::{NewNotification, NotificationRepository};
pub use order_notification::OrderNotificationRepository;
