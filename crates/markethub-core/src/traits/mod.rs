//! Core traits defined in `markethub-core` and implemented by other crates.

pub mod directory;
pub mod push;

pub use directory::AccountDirectory;
pub use push::{DeliveryResult, FailureClass, PushMessage, PushSender, SendOutcome};
