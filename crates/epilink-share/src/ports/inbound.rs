//! # Inbound Ports
//!
//! API trait defining what the share lifecycle subsystem can do, for both
//! local callers (UI/API layer) and the remote-peer transport layer.

use crate::domain::{ShareDirection, ShareError, ShareRequest, ShareStatus};
use async_trait::async_trait;
use epilink_directory::OrganizationRef;
use epilink_envelope::EncryptedEnvelope;
use epilink_types::{OrganizationId, ShareDataType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter for the share index view. `None` fields match everything.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShareCriteria {
    /// Restrict to one counterparty.
    pub organization_id: Option<OrganizationId>,
    /// Restrict to one entity kind.
    pub data_type: Option<ShareDataType>,
    /// Restrict to one lifecycle state.
    pub status: Option<ShareStatus>,
    /// Restrict to one direction.
    pub direction: Option<ShareDirection>,
}

impl ShareCriteria {
    /// Check whether a request matches this filter.
    pub fn matches(&self, request: &ShareRequest) -> bool {
        self.organization_id
            .as_ref()
            .is_none_or(|o| *o == request.organization_id)
            && self.data_type.is_none_or(|d| d == request.data_type)
            && self.status.is_none_or(|s| s == request.status)
            && self.direction.is_none_or(|d| d == request.direction)
    }
}

/// Index row for the share overview. No payload material.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Share request uuid.
    pub uuid: Uuid,
    /// Kind of shared entity.
    pub data_type: ShareDataType,
    /// Counterparty organization.
    pub organization_id: OrganizationId,
    /// Direction of the exchange.
    pub direction: ShareDirection,
    /// Current lifecycle state.
    pub status: ShareStatus,
    /// Last-activity timestamp.
    pub change_date: u64,
}

impl From<&ShareRequest> for ShareInfo {
    fn from(request: &ShareRequest) -> Self {
        Self {
            uuid: request.uuid,
            data_type: request.data_type,
            organization_id: request.organization_id.clone(),
            direction: request.direction,
            status: request.status,
            change_date: request.change_date,
        }
    }
}

/// Per-member result of a bulk revoke.
#[derive(Debug)]
pub struct RevokeOutcome {
    /// The member uuid.
    pub uuid: Uuid,
    /// What happened to this member. Failures here never abort the batch.
    pub result: Result<(), ShareError>,
}

/// Share lifecycle API - inbound port.
#[async_trait]
pub trait ShareLifecycleApi: Send + Sync {
    /// Configured partner instances. Empty when nothing is configured.
    fn available_organizations(&self) -> Vec<OrganizationRef>;

    /// Resolve one partner instance.
    fn organization_ref(&self, id: &OrganizationId) -> Result<OrganizationRef, ShareError>;

    /// Paginated index of share requests, most recent activity first, ties
    /// broken by uuid.
    fn share_info_index(
        &self,
        criteria: &ShareCriteria,
        offset: usize,
        limit: usize,
    ) -> Vec<ShareInfo>;

    /// Create and transmit a new outbound share. On transport failure the
    /// local request stays `Pending`; the caller retries or revokes, the
    /// manager never auto-retries.
    async fn issue_share(
        &self,
        data_type: ShareDataType,
        target: &OrganizationId,
        entity: Vec<u8>,
    ) -> Result<ShareInfo, ShareError>;

    /// Register a share received from a partner. Re-delivery with identical
    /// content is a no-op; changed content for a known uuid fails validation.
    async fn receive_share_request(&self, envelope: EncryptedEnvelope) -> Result<(), ShareError>;

    /// Accept a pending inbound share: decrypt, validate, persist via the
    /// typed entity handler, flip to `Accepted`. Accepting an already
    /// accepted request is an idempotent no-op.
    async fn accept_share_request(
        &self,
        data_type: ShareDataType,
        uuid: Uuid,
    ) -> Result<(), ShareError>;

    /// Reject a pending inbound share. Rejecting an already rejected request
    /// is an idempotent no-op.
    async fn reject_share_request(
        &self,
        data_type: ShareDataType,
        uuid: Uuid,
    ) -> Result<(), ShareError>;

    /// Revoke an outbound share from `Pending` or `Accepted`. Unknown or
    /// already revoked uuids fail with `NotFound`; revoking a rejected
    /// request fails with `InvalidTransition`.
    async fn revoke_share(&self, uuid: Uuid) -> Result<(), ShareError>;

    /// Partner-initiated bulk revoke. Fails only when the envelope itself
    /// cannot be opened; member failures are reported per member.
    async fn revoke_requests(
        &self,
        envelope: EncryptedEnvelope,
    ) -> Result<Vec<RevokeOutcome>, ShareError>;

    /// Pure configuration check.
    fn is_feature_enabled(&self) -> bool;
}
