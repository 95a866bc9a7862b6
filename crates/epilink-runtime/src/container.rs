//! # Exchange Container
//!
//! Builds the wired lifecycle service over the in-memory adapters and owns
//! the periodic maintenance work.

use crate::config::RuntimeConfig;
use crate::transport::LoggingPartnerTransport;
use epilink_directory::InMemoryDirectory;
use epilink_envelope::SecretKey;
use epilink_events::{InMemorySystemEventLog, SystemEventRecorder};
use epilink_share::{
    HandlerRegistry, InMemoryShareRegistry, RecordingEntityHandler, ShareConfig,
    ShareLifecycleService,
};
use epilink_types::{unix_now, ShareDataType};
use std::sync::Arc;
use tracing::{debug, info};

/// The assembled exchange instance.
pub struct ExchangeContainer {
    /// Runtime configuration.
    pub config: RuntimeConfig,
    /// The share lifecycle manager.
    pub service: Arc<ShareLifecycleService>,
    /// The system event log, shared with the service.
    pub events: Arc<InMemorySystemEventLog>,
}

impl ExchangeContainer {
    /// Wire every collaborator from configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        info!(
            local_org = %config.local_org,
            partners = config.organizations.len(),
            feature_enabled = config.feature_enabled,
            "building exchange container"
        );

        let registry = Arc::new(InMemoryShareRegistry::new());
        let directory = Arc::new(InMemoryDirectory::new(config.organizations.clone()));
        let transport = Arc::new(LoggingPartnerTransport::new());
        let events = Arc::new(InMemorySystemEventLog::new());

        let mut handlers = HandlerRegistry::new();
        for data_type in ShareDataType::all() {
            handlers = handlers.register(Arc::new(RecordingEntityHandler::new(data_type)));
        }

        let service = Arc::new(ShareLifecycleService::new(
            ShareConfig {
                feature_enabled: config.feature_enabled,
                reconciliation_interval_secs: config.reconciliation_interval_secs,
            },
            SecretKey::from_bytes(config.envelope_key),
            config.local_org.clone(),
            registry,
            directory,
            transport,
            events.clone(),
            handlers,
        ));

        Self {
            config,
            service,
            events,
        }
    }

    /// One maintenance pass: reconciliation sweep when due, then the event
    /// retention purge when enabled.
    pub fn maintenance_tick(&self) {
        let now = unix_now();
        if self.service.reconciliation_due(now) {
            self.service.run_reconciliation(now);
        }
        if let Some(cutoff) = self.config.retention.cutoff(now) {
            let purged = self.events.purge_unchanged_before(cutoff);
            if purged > 0 {
                info!(purged, cutoff, "system events purged");
            }
        } else {
            debug!("event retention disabled, skipping purge");
        }
    }
}
