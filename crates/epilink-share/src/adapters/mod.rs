//! # Adapters Module
//!
//! Reference implementations of the outbound ports.

pub mod handlers;
pub mod registry;

pub use handlers::{HandlerRegistry, RecordingEntityHandler};
pub use registry::InMemoryShareRegistry;
