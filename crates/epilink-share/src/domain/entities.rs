//! Domain entities for the share lifecycle.

use super::errors::ShareError;
use super::value_objects::{ShareDirection, ShareStatus};
use epilink_envelope::EncryptedEnvelope;
use epilink_types::{OrganizationId, ShareDataType};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Decoded body of a share envelope.
///
/// The header fields repeat the envelope header so a forged header cannot
/// redirect a payload: both copies must agree after decryption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    /// Share request uuid.
    pub uuid: Uuid,
    /// Kind of shared entity.
    pub data_type: ShareDataType,
    /// Organization that produced the payload.
    pub sender: OrganizationId,
    /// Serialized entity body, handed to the typed entity handler on accept.
    pub entity: Vec<u8>,
}

/// Decoded body of a bulk-revoke envelope.
///
/// A sharer withdraws several requests in one message; every member is
/// processed independently on the receiving side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeBatch {
    /// Organization withdrawing its shares.
    pub sender: OrganizationId,
    /// The share request uuids being withdrawn.
    pub uuids: Vec<Uuid>,
}

/// Fingerprint of a sealed payload, used by the re-send conflict policy.
pub fn payload_digest(envelope: &EncryptedEnvelope) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(envelope.nonce.as_bytes());
    hasher.update(&envelope.ciphertext);
    hasher.finalize().into()
}

/// A tracked unit of data exchange with one partner instance.
///
/// Created on issuance or inbound receipt; mutated only by accept, reject,
/// and revoke; never deleted, only status-flipped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareRequest {
    /// Globally unique identifier, immutable once created.
    pub uuid: Uuid,
    /// Kind of shared entity.
    pub data_type: ShareDataType,
    /// The counterparty organization.
    pub organization_id: OrganizationId,
    /// Which side of the exchange we are on.
    pub direction: ShareDirection,
    /// Current lifecycle state.
    pub status: ShareStatus,
    /// Sealed payload, retained on inbound requests until accept.
    pub payload: Option<EncryptedEnvelope>,
    /// Fingerprint of the sealed payload.
    pub payload_digest: Option<[u8; 32]>,
    /// Creation timestamp (Unix seconds).
    pub created_at: u64,
    /// Last-activity timestamp; bumped on every status change.
    pub change_date: u64,
}

impl ShareRequest {
    /// Create an outbound request (we shared). The sealed payload is not
    /// retained locally; only its fingerprint is.
    pub fn new_outbound(
        uuid: Uuid,
        data_type: ShareDataType,
        target: OrganizationId,
        digest: [u8; 32],
        now: u64,
    ) -> Self {
        Self {
            uuid,
            data_type,
            organization_id: target,
            direction: ShareDirection::Outbound,
            status: ShareStatus::Pending,
            payload: None,
            payload_digest: Some(digest),
            created_at: now,
            change_date: now,
        }
    }

    /// Create an inbound request (a partner shared with us), retaining the
    /// sealed payload until accept.
    pub fn new_inbound(envelope: EncryptedEnvelope, sender: OrganizationId, now: u64) -> Self {
        let digest = payload_digest(&envelope);
        Self {
            uuid: envelope.uuid,
            data_type: envelope.data_type,
            organization_id: sender,
            direction: ShareDirection::Inbound,
            status: ShareStatus::Pending,
            payload: Some(envelope),
            payload_digest: Some(digest),
            created_at: now,
            change_date: now,
        }
    }

    /// Transition to a new status, bumping the activity timestamp.
    pub fn transition_to(&mut self, next: ShareStatus, now: u64) -> Result<(), ShareError> {
        if !self.status.can_transition_to(next, self.direction) {
            return Err(ShareError::InvalidTransition {
                uuid: self.uuid,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.change_date = now;
        Ok(())
    }

    /// Check if the request is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epilink_envelope::{seal, SecretKey};

    fn inbound_request() -> ShareRequest {
        let key = SecretKey::generate();
        let envelope = seal(&key, ShareDataType::Case, Uuid::new_v4(), b"body").unwrap();
        ShareRequest::new_inbound(envelope, OrganizationId::new("hd-north"), 1000)
    }

    #[test]
    fn test_new_inbound_is_pending_with_payload() {
        let request = inbound_request();
        assert_eq!(request.status, ShareStatus::Pending);
        assert_eq!(request.direction, ShareDirection::Inbound);
        assert!(request.payload.is_some());
        assert!(request.payload_digest.is_some());
    }

    #[test]
    fn test_new_outbound_keeps_digest_only() {
        let request = ShareRequest::new_outbound(
            Uuid::new_v4(),
            ShareDataType::Contact,
            OrganizationId::new("hd-south"),
            [7u8; 32],
            1000,
        );
        assert!(request.payload.is_none());
        assert_eq!(request.payload_digest, Some([7u8; 32]));
    }

    #[test]
    fn test_transition_bumps_change_date() {
        let mut request = inbound_request();
        request.transition_to(ShareStatus::Accepted, 2000).unwrap();
        assert_eq!(request.status, ShareStatus::Accepted);
        assert_eq!(request.change_date, 2000);
    }

    #[test]
    fn test_illegal_transition_fails() {
        let mut request = inbound_request();
        request.transition_to(ShareStatus::Rejected, 2000).unwrap();
        let result = request.transition_to(ShareStatus::Revoked, 3000);
        assert!(matches!(result, Err(ShareError::InvalidTransition { .. })));
        // Status unchanged on failure
        assert_eq!(request.status, ShareStatus::Rejected);
        assert_eq!(request.change_date, 2000);
    }

    #[test]
    fn test_payload_digest_is_stable_and_content_sensitive() {
        let key = SecretKey::generate();
        let e1 = seal(&key, ShareDataType::Case, Uuid::new_v4(), b"a").unwrap();
        let e2 = seal(&key, ShareDataType::Case, Uuid::new_v4(), b"a").unwrap();

        assert_eq!(payload_digest(&e1), payload_digest(&e1));
        // Fresh nonce means a re-seal never collides
        assert_ne!(payload_digest(&e1), payload_digest(&e2));
    }
}
