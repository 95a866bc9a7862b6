//! # Outbound Ports
//!
//! Traits for external dependencies: the durable share registry, the
//! partner transport, and the per-data-type entity handlers.

use crate::domain::{ShareError, ShareRequest};
use crate::ports::inbound::ShareCriteria;
use async_trait::async_trait;
use epilink_directory::OrganizationRef;
use epilink_envelope::EncryptedEnvelope;
use epilink_types::ShareDataType;
use uuid::Uuid;

/// A share request together with its registry version.
#[derive(Clone, Debug)]
pub struct VersionedShare {
    /// The stored record.
    pub record: ShareRequest,
    /// Version observed at load time; `save` requires it unchanged.
    pub version: u64,
}

/// Registry error types.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Another writer moved the record since it was loaded. The caller
    /// reloads and re-evaluates; it never overwrites blindly.
    #[error("Version conflict on {uuid}: expected {expected}, actual {actual}")]
    VersionConflict {
        /// The contested uuid.
        uuid: Uuid,
        /// Version the writer expected.
        expected: u64,
        /// Version actually stored.
        actual: u64,
    },

    /// Backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Durable store of share requests - outbound port.
///
/// `save` is an upsert keyed by uuid, serialized per uuid via optimistic
/// versioning. Operations on different uuids proceed fully in parallel.
pub trait ShareRegistry: Send + Sync {
    /// Load a request with its current version.
    fn find(&self, uuid: Uuid) -> Option<VersionedShare>;

    /// Persist a record. `expected_version` of `None` inserts a new record
    /// (fails on an existing uuid); `Some(v)` updates only if the stored
    /// version is still `v`. Returns the new version.
    fn save(
        &self,
        record: ShareRequest,
        expected_version: Option<u64>,
    ) -> Result<u64, RegistryError>;

    /// Filtered, paginated listing ordered by most recent activity first,
    /// ties broken by uuid ascending.
    fn list(&self, criteria: &ShareCriteria, offset: usize, limit: usize) -> Vec<ShareRequest>;

    /// Number of requests not yet in a terminal state.
    fn count_non_terminal(&self) -> usize;
}

/// Network channel to partner instances - outbound port.
///
/// Calls may block or time out. A failure here never rolls back a local
/// transition that already persisted.
#[async_trait]
pub trait PartnerTransport: Send + Sync {
    /// Deliver a sealed share to the target instance.
    async fn send_share(
        &self,
        target: &OrganizationRef,
        envelope: &EncryptedEnvelope,
    ) -> Result<(), ShareError>;

    /// Tell the origin instance its share was accepted.
    async fn notify_accepted(&self, origin: &OrganizationRef, uuid: Uuid)
        -> Result<(), ShareError>;

    /// Tell the origin instance its share was rejected.
    async fn notify_rejected(&self, origin: &OrganizationRef, uuid: Uuid)
        -> Result<(), ShareError>;

    /// Tell the recipient instance that access must be withdrawn.
    async fn notify_revoked(&self, target: &OrganizationRef, uuid: Uuid)
        -> Result<(), ShareError>;
}

/// Per-data-type persistence hook - outbound port.
///
/// Resolved from an explicit map at startup; validation failures surface as
/// `ShareError::Validation` and leave the request pending.
pub trait SharedEntityHandler: Send + Sync {
    /// The kind this handler accepts.
    fn data_type(&self) -> ShareDataType;

    /// Validate and persist one shared entity. This is an idempotent
    /// upsert keyed by uuid: persisting the same entity again is a no-op.
    fn persist(&self, uuid: Uuid, entity: &[u8]) -> Result<(), ShareError>;

    /// Undo a persist whose acceptance did not commit. Called when the
    /// accepting writer loses the version race to a terminal transition.
    fn remove(&self, uuid: Uuid) -> Result<(), ShareError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock transport for testing.
#[derive(Default)]
pub struct MockPartnerTransport {
    /// Should all calls fail?
    pub should_fail: bool,
    /// Shares delivered via `send_share`.
    pub sent: parking_lot::Mutex<Vec<(String, EncryptedEnvelope)>>,
    /// Notifications delivered, as `(kind, uuid)` pairs.
    pub notified: parking_lot::Mutex<Vec<(&'static str, Uuid)>>,
}

impl MockPartnerTransport {
    /// A transport where every call fails.
    pub fn unreachable() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), ShareError> {
        if self.should_fail {
            return Err(ShareError::Transport("partner unreachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PartnerTransport for MockPartnerTransport {
    async fn send_share(
        &self,
        target: &OrganizationRef,
        envelope: &EncryptedEnvelope,
    ) -> Result<(), ShareError> {
        self.check()?;
        self.sent
            .lock()
            .push((target.id.to_string(), envelope.clone()));
        Ok(())
    }

    async fn notify_accepted(
        &self,
        _origin: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        self.check()?;
        self.notified.lock().push(("accepted", uuid));
        Ok(())
    }

    async fn notify_rejected(
        &self,
        _origin: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        self.check()?;
        self.notified.lock().push(("rejected", uuid));
        Ok(())
    }

    async fn notify_revoked(
        &self,
        _target: &OrganizationRef,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        self.check()?;
        self.notified.lock().push(("revoked", uuid));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epilink_envelope::{seal, SecretKey};
    use epilink_types::OrganizationId;

    fn org() -> OrganizationRef {
        OrganizationRef {
            id: OrganizationId::new("hd-north"),
            name: "Health Dept North".to_string(),
            endpoint: "https://hd-north.example.org".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_transport_records_sends() {
        let transport = MockPartnerTransport::default();
        let key = SecretKey::generate();
        let envelope = seal(&key, ShareDataType::Case, Uuid::new_v4(), b"x").unwrap();

        transport.send_share(&org(), &envelope).await.unwrap();
        assert_eq!(transport.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_transport_failure() {
        let transport = MockPartnerTransport::unreachable();
        let result = transport.notify_revoked(&org(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(ShareError::Transport(_))));
        assert!(transport.notified.lock().is_empty());
    }
}
