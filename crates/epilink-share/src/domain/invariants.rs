//! Business rules for the share lifecycle.

use super::entities::ShareRequest;
use super::errors::ShareError;
use super::value_objects::{ShareDirection, ShareStatus};
use uuid::Uuid;

/// Invariant: accept and reject are recipient operations.
///
/// Only `Inbound` requests may be accepted or rejected locally.
pub fn invariant_recipient_operation(
    request: &ShareRequest,
    attempted: ShareStatus,
) -> Result<(), ShareError> {
    if request.direction != ShareDirection::Inbound {
        return Err(ShareError::InvalidTransition {
            uuid: request.uuid,
            from: request.status,
            to: attempted,
        });
    }
    Ok(())
}

/// Invariant: local revocation is a sharer operation.
///
/// Only `Outbound` requests may be revoked by a local caller; partner
/// initiated revokes arrive through the batch endpoint and target our
/// inbound copies.
pub fn invariant_sharer_operation(request: &ShareRequest) -> Result<(), ShareError> {
    if request.direction != ShareDirection::Outbound {
        return Err(ShareError::InvalidTransition {
            uuid: request.uuid,
            from: request.status,
            to: ShareStatus::Revoked,
        });
    }
    Ok(())
}

/// Invariant: a re-sent payload must be byte-identical to the retained one.
///
/// A partner re-sending a share for a uuid we already hold, with different
/// content, is a conflict surfaced as a validation failure, never a silent
/// overwrite.
pub fn invariant_payload_unchanged(
    uuid: Uuid,
    existing: Option<[u8; 32]>,
    incoming: [u8; 32],
) -> Result<(), ShareError> {
    match existing {
        Some(digest) if digest == incoming => Ok(()),
        _ => Err(ShareError::Validation(format!(
            "re-sent share {uuid} carries different payload content"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epilink_types::{OrganizationId, ShareDataType};

    fn outbound() -> ShareRequest {
        ShareRequest::new_outbound(
            Uuid::new_v4(),
            ShareDataType::Case,
            OrganizationId::new("hd-north"),
            [0u8; 32],
            1000,
        )
    }

    #[test]
    fn test_accept_requires_inbound() {
        let request = outbound();
        assert!(invariant_recipient_operation(&request, ShareStatus::Accepted).is_err());
    }

    #[test]
    fn test_revoke_requires_outbound() {
        let request = outbound();
        assert!(invariant_sharer_operation(&request).is_ok());
    }

    #[test]
    fn test_payload_unchanged_matches() {
        let uuid = Uuid::new_v4();
        assert!(invariant_payload_unchanged(uuid, Some([1u8; 32]), [1u8; 32]).is_ok());
    }

    #[test]
    fn test_payload_changed_is_validation_error() {
        let uuid = Uuid::new_v4();
        let result = invariant_payload_unchanged(uuid, Some([1u8; 32]), [2u8; 32]);
        assert!(matches!(result, Err(ShareError::Validation(_))));
    }

    #[test]
    fn test_missing_digest_is_validation_error() {
        let result = invariant_payload_unchanged(Uuid::new_v4(), None, [2u8; 32]);
        assert!(result.is_err());
    }
}
