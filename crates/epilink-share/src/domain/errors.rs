//! Share lifecycle error types.

use super::value_objects::ShareStatus;
use epilink_directory::DirectoryError;
use epilink_envelope::EnvelopeError;
use epilink_types::OrganizationId;
use thiserror::Error;
use uuid::Uuid;

/// Share lifecycle error taxonomy.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Referenced organization is not configured.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(OrganizationId),

    /// Share request does not exist (or is already revoked).
    #[error("Share request not found: {0}")]
    NotFound(Uuid),

    /// Operation is not legal from the current status.
    #[error("Invalid transition for {uuid}: {from} -> {to}")]
    InvalidTransition {
        /// Share request uuid.
        uuid: Uuid,
        /// Current status.
        from: ShareStatus,
        /// Attempted status.
        to: ShareStatus,
    },

    /// Payload content fails domain validation. The request stays pending so
    /// the caller can retry after remediation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Partner unreachable. Local state is unaffected by this failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Envelope malformed or key mismatch. Nothing inside was processed.
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// The instance-to-instance exchange feature is switched off.
    #[error("Instance-to-instance exchange is disabled")]
    FeatureDisabled,

    /// Registry failure other than a version conflict.
    #[error("Registry error: {0}")]
    Registry(String),
}

impl From<DirectoryError> for ShareError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(id) => ShareError::OrganizationNotFound(id),
        }
    }
}

impl From<EnvelopeError> for ShareError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::DecryptionFailed(_) | EnvelopeError::UnsupportedVersion { .. } => {
                ShareError::Decryption(err.to_string())
            }
            other => ShareError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = ShareError::InvalidTransition {
            uuid: Uuid::nil(),
            from: ShareStatus::Rejected,
            to: ShareStatus::Revoked,
        };
        assert!(err.to_string().contains("rejected -> revoked"));
    }

    #[test]
    fn test_directory_error_maps_to_organization_not_found() {
        let err: ShareError = DirectoryError::NotFound(OrganizationId::new("x")).into();
        assert!(matches!(err, ShareError::OrganizationNotFound(_)));
    }

    #[test]
    fn test_envelope_decryption_maps_to_decryption() {
        let err: ShareError = EnvelopeError::DecryptionFailed("aead".into()).into();
        assert!(matches!(err, ShareError::Decryption(_)));
    }

    #[test]
    fn test_envelope_encoding_maps_to_validation() {
        let err: ShareError = EnvelopeError::PayloadEncoding("truncated".into()).into();
        assert!(matches!(err, ShareError::Validation(_)));
    }
}
