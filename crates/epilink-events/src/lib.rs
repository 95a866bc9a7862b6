//! # EpiLink System Events
//!
//! Append-only audit trail of lifecycle outcomes, with two read contracts:
//! the most recent success of a type (drives periodic sweeps) and a
//! change-date range used by retention cleanup.
//!
//! Events are created at the conclusion of a lifecycle-affecting operation
//! and never mutated afterward. Retention deletes by *change date*, not
//! occurrence date.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod event;
pub mod recorder;
pub mod retention;

pub use event::{SystemEvent, SystemEventStatus, SystemEventType};
pub use recorder::{InMemorySystemEventLog, SystemEventRecorder};
pub use retention::RetentionConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
