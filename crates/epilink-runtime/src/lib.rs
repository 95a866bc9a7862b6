//! # EpiLink Runtime
//!
//! Assembles one exchange instance from configuration:
//!
//! - `config` - environment-driven runtime configuration
//! - `container` - dependency wiring over the in-memory adapters
//! - `transport` - partner delivery adapter
//!
//! The `epilink` binary initializes telemetry, validates the configuration,
//! builds the container, and drives the periodic maintenance loop.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod transport;

pub use config::{ConfigError, RuntimeConfig};
pub use container::ExchangeContainer;
pub use transport::LoggingPartnerTransport;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
