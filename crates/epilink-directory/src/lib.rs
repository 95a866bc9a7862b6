//! # EpiLink Organization Directory
//!
//! Read-mostly lookup of configured partner instances. Membership is an
//! administrative, config-time concern: the lifecycle manager only ever reads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;

pub use directory::{DirectoryError, InMemoryDirectory, OrganizationDirectory, OrganizationRef};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
