//! # EpiLink Shared Types
//!
//! Value types shared by every EpiLink crate: the data-type tag carried on
//! every exchanged entity, the organization identifier, and wall-clock helpers.
//!
//! Anything subsystem-specific (share statuses, event types) lives in the
//! owning crate, not here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data_type;
pub mod organization;
pub mod time;

pub use data_type::ShareDataType;
pub use organization::OrganizationId;
pub use time::unix_now;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
