//! Device registry service.

pub mod registry;

pub use registry::DeviceRegistry;
