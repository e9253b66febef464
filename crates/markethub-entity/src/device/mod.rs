//! Device registration entity models.

pub mod model;
pub mod platform;

pub use model::UserDevice;
pub use platform::DevicePlatform;
