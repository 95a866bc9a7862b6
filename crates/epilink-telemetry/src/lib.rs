//! # EpiLink Telemetry
//!
//! Structured logging setup shared by all EpiLink services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use epilink_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EL_SERVICE_NAME` | `epilink` | Service name on log lines |
//! | `EL_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` fallback) |
//! | `EL_JSON_LOGS` | `false` | JSON formatted output |
//! | `EL_CONSOLE_OUTPUT` | `true` | Human-readable console output |

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;

pub use config::TelemetryConfig;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log level filter could not be parsed.
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected filter expression.
        filter: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// Call once at process start; a second call fails with
/// `AlreadyInitialized`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::InvalidFilter {
            filter: config.log_level.clone(),
            reason: e.to_string(),
        })?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logs {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
    } else if config.console_output {
        registry.with(fmt::layer().with_target(true)).try_init()
    } else {
        registry.try_init()
    };
    result.map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        json = config.json_logs,
        "telemetry initialized"
    );
    Ok(())
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
