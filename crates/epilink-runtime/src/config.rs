//! # Runtime Configuration
//!
//! All deployment parameters for one exchange instance, loaded from the
//! environment.
//!
//! ## Security Requirements
//!
//! - `envelope_key` MUST NOT be the default zero value in production

use epilink_directory::OrganizationRef;
use epilink_events::RetentionConfig;
use epilink_types::OrganizationId;
use std::env;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Envelope key is not set (zero value).
    #[error(
        "SECURITY VIOLATION: envelope key is the default zero value. \
         Set the EL_ENVELOPE_KEY environment variable."
    )]
    InsecureEnvelopeKey,

    /// Envelope key is not 64 hex characters.
    #[error("Invalid envelope key: {0}")]
    InvalidEnvelopeKey(String),

    /// A partner entry could not be parsed.
    #[error("Invalid partner entry '{0}': expected id=endpoint")]
    InvalidPartner(String),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Identifier of this instance in partner directories.
    pub local_org: OrganizationId,
    /// Master switch for instance-to-instance exchange.
    pub feature_enabled: bool,
    /// Shared envelope key (32 bytes). MUST NOT be default in production.
    pub envelope_key: [u8; 32],
    /// Configured partner instances.
    pub organizations: Vec<OrganizationRef>,
    /// System event retention policy.
    pub retention: RetentionConfig,
    /// Minimum seconds between reconciliation sweeps.
    pub reconciliation_interval_secs: u64,
    /// Seconds between maintenance loop ticks.
    pub maintenance_tick_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            local_org: OrganizationId::new("epilink-local"),
            feature_enabled: true,
            envelope_key: [0u8; 32], // MUST be overridden in production
            organizations: Vec::new(),
            retention: RetentionConfig::default(),
            reconciliation_interval_secs: 300,
            maintenance_tick_secs: 30,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EL_LOCAL_ORG`: This instance's organization id (default: epilink-local)
    /// - `EL_FEATURE_ENABLED`: Exchange master switch (default: true)
    /// - `EL_ENVELOPE_KEY`: Shared key, 64 hex characters
    /// - `EL_PARTNERS`: Comma-separated `id=endpoint` pairs
    /// - `EL_EVENT_RETENTION_DAYS`: Enable event retention with this horizon
    /// - `EL_RECONCILIATION_INTERVAL_SECS`: Sweep cadence (default: 300)
    /// - `EL_MAINTENANCE_TICK_SECS`: Maintenance loop tick (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let envelope_key = match env::var("EL_ENVELOPE_KEY") {
            Ok(hex_key) => parse_envelope_key(&hex_key)?,
            Err(_) => defaults.envelope_key,
        };

        let organizations = match env::var("EL_PARTNERS") {
            Ok(raw) => parse_partners(&raw)?,
            Err(_) => Vec::new(),
        };

        let retention = match env::var("EL_EVENT_RETENTION_DAYS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            Some(days) => RetentionConfig {
                days,
                enabled: true,
            },
            None => defaults.retention,
        };

        Ok(Self {
            local_org: env::var("EL_LOCAL_ORG")
                .map(|v| OrganizationId::new(&v))
                .unwrap_or(defaults.local_org),

            feature_enabled: env::var("EL_FEATURE_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            envelope_key,
            organizations,
            retention,

            reconciliation_interval_secs: env::var("EL_RECONCILIATION_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.reconciliation_interval_secs),

            maintenance_tick_secs: env::var("EL_MAINTENANCE_TICK_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.maintenance_tick_secs),
        })
    }

    /// Validate configuration for production readiness.
    ///
    /// Returns `Err` if the envelope key is the default zero value.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.envelope_key == [0u8; 32] {
            return Err(ConfigError::InsecureEnvelopeKey);
        }
        Ok(())
    }
}

fn parse_envelope_key(hex_key: &str) -> Result<[u8; 32], ConfigError> {
    let bytes =
        hex::decode(hex_key.trim()).map_err(|e| ConfigError::InvalidEnvelopeKey(e.to_string()))?;
    bytes.try_into().map_err(|v: Vec<u8>| {
        ConfigError::InvalidEnvelopeKey(format!("expected 32 bytes, got {}", v.len()))
    })
}

fn parse_partners(raw: &str) -> Result<Vec<OrganizationRef>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, endpoint) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidPartner(entry.to_string()))?;
            if id.is_empty() || endpoint.is_empty() {
                return Err(ConfigError::InvalidPartner(entry.to_string()));
            }
            Ok(OrganizationRef {
                id: OrganizationId::new(id),
                name: id.to_string(),
                endpoint: endpoint.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_fails_production_validation() {
        let config = RuntimeConfig::default();
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_nonzero_key_passes_production_validation() {
        let config = RuntimeConfig {
            envelope_key: [7u8; 32],
            ..Default::default()
        };
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_parse_envelope_key_roundtrip() {
        let key = parse_envelope_key(&"ab".repeat(32)).unwrap();
        assert_eq!(key, [0xab; 32]);
    }

    #[test]
    fn test_parse_envelope_key_wrong_length() {
        assert!(matches!(
            parse_envelope_key("abcd"),
            Err(ConfigError::InvalidEnvelopeKey(_))
        ));
    }

    #[test]
    fn test_parse_partners() {
        let partners =
            parse_partners("hd-north=https://north.example.org, hd-south=https://south.example.org")
                .unwrap();
        assert_eq!(partners.len(), 2);
        assert_eq!(partners[0].id.as_str(), "hd-north");
        assert_eq!(partners[1].endpoint, "https://south.example.org");
    }

    #[test]
    fn test_parse_partners_rejects_malformed_entry() {
        assert!(matches!(
            parse_partners("hd-north"),
            Err(ConfigError::InvalidPartner(_))
        ));
    }
}
