//! Order snapshot recording.

pub mod recorder;

pub use recorder::OrderEventRecorder;
