//! The `epilink` exchange service binary.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load configuration from the environment
//! 3. Validate the envelope key is not the zero default
//! 4. Build the exchange container
//! 5. Run the maintenance loop until shutdown

use anyhow::{Context, Result};
use epilink_runtime::{ExchangeContainer, RuntimeConfig};
use epilink_telemetry::{init_telemetry, TelemetryConfig};
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("failed to load configuration")?;
    if let Err(e) = config.validate_for_production() {
        error!("{e}");
        return Err(e.into());
    }

    info!(
        version = epilink_runtime::VERSION,
        local_org = %config.local_org,
        "starting EpiLink exchange service"
    );

    let tick = Duration::from_secs(config.maintenance_tick_secs.max(1));
    let container = ExchangeContainer::new(config);

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                container.maintenance_tick();
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    info!("EpiLink exchange service stopped");
    Ok(())
}
