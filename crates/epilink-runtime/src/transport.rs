//! Partner transport adapter.
//!
//! Network delivery to partner deployments is an external collaborator; this
//! adapter logs each delivery and succeeds, which keeps the lifecycle
//! observable end to end in a single-process deployment.

use async_trait::async_trait;
use epilink_directory::OrganizationRef;
use epilink_envelope::EncryptedEnvelope;
use epilink_share::{PartnerTransport, ShareError};
use tracing::info;
use uuid::Uuid;

/// Transport that records deliveries in the log stream.
#[derive(Default)]
pub struct LoggingPartnerTransport;

impl LoggingPartnerTransport {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PartnerTransport for LoggingPartnerTransport {
    async fn send_share(
        &self,
        target: &OrganizationRef,
        envelope: &EncryptedEnvelope,
    ) -> Result<(), ShareError> {
        info!(
            uuid = %envelope.uuid,
            data_type = %envelope.data_type,
            target = %target.id,
            endpoint = %target.endpoint,
            bytes = envelope.ciphertext.len(),
            "share delivered"
        );
        Ok(())
    }

    async fn notify_accepted(
        &self,
        origin: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        info!(%uuid, origin = %origin.id, "acceptance notified");
        Ok(())
    }

    async fn notify_rejected(
        &self,
        origin: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        info!(%uuid, origin = %origin.id, "rejection notified");
        Ok(())
    }

    async fn notify_revoked(
        &self,
        target: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        info!(%uuid, target = %target.id, "revocation notified");
        Ok(())
    }
}
