//! # Share Lifecycle Service
//!
//! The lifecycle manager behind [`ShareLifecycleApi`]. Every status change
//! goes through the registry's optimistic version check; a losing writer
//! reloads and re-evaluates against the fresh record instead of overwriting.

mod maintenance;


use crate::adapters::HandlerRegistry;
use crate::domain::{
    invariant_payload_unchanged, invariant_recipient_operation, invariant_sharer_operation,
    payload_digest, RevokeBatch, ShareError, SharePayload, ShareRequest, ShareStatus,
};
use crate::ports::inbound::{RevokeOutcome, ShareCriteria, ShareInfo, ShareLifecycleApi};
use crate::ports::outbound::{PartnerTransport, RegistryError, ShareRegistry, VersionedShare};
use async_trait::async_trait;
use epilink_directory::{OrganizationDirectory, OrganizationRef};
use epilink_envelope::{open_value, seal_value, EncryptedEnvelope, SecretKey};
use epilink_events::{SystemEvent, SystemEventRecorder, SystemEventType};
use epilink_types::{unix_now, OrganizationId, ShareDataType};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle manager configuration.
#[derive(Clone, Debug)]
pub struct ShareConfig {
    /// Master switch for instance-to-instance exchange. Off means every
    /// mutating operation fails with `FeatureDisabled`.
    pub feature_enabled: bool,
    /// Minimum seconds between reconciliation sweeps.
    pub reconciliation_interval_secs: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            feature_enabled: true,
            reconciliation_interval_secs: 300,
        }
    }
}

/// The share lifecycle manager.
pub struct ShareLifecycleService {
    config: ShareConfig,
    key: SecretKey,
    local_org: OrganizationId,
    registry: Arc<dyn ShareRegistry>,
    directory: Arc<dyn OrganizationDirectory>,
    transport: Arc<dyn PartnerTransport>,
    recorder: Arc<dyn SystemEventRecorder>,
    handlers: HandlerRegistry,
}

impl ShareLifecycleService {
    /// Wire the manager over its collaborators.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ShareConfig,
        key: SecretKey,
        local_org: OrganizationId,
        registry: Arc<dyn ShareRegistry>,
        directory: Arc<dyn OrganizationDirectory>,
        transport: Arc<dyn PartnerTransport>,
        recorder: Arc<dyn SystemEventRecorder>,
        handlers: HandlerRegistry,
    ) -> Self {
        Self {
            config,
            key,
            local_org,
            registry,
            directory,
            transport,
            recorder,
            handlers,
        }
    }

    fn ensure_enabled(&self) -> Result<(), ShareError> {
        if !self.config.feature_enabled {
            return Err(ShareError::FeatureDisabled);
        }
        Ok(())
    }

    fn load(&self, uuid: Uuid) -> Result<VersionedShare, ShareError> {
        self.registry.find(uuid).ok_or(ShareError::NotFound(uuid))
    }

    /// Persist an updated record under the loaded version. `Ok(true)` means
    /// the write landed; `Ok(false)` means another writer won and the caller
    /// must reload and re-evaluate.
    fn try_save(&self, record: ShareRequest, version: u64) -> Result<bool, ShareError> {
        match self.registry.save(record, Some(version)) {
            Ok(_) => Ok(true),
            Err(RegistryError::VersionConflict { uuid, .. }) => {
                debug!(%uuid, "lost version race, re-evaluating");
                Ok(false)
            }
            Err(RegistryError::Storage(e)) => Err(ShareError::Registry(e)),
        }
    }

    fn record_success(&self, event_type: SystemEventType, info: String) {
        self.recorder
            .record(SystemEvent::success(event_type, unix_now(), info));
    }

    fn record_error(&self, event_type: SystemEventType, info: String) {
        self.recorder
            .record(SystemEvent::error(event_type, unix_now(), info));
    }

    /// Notify the counterparty after a local transition landed. The local
    /// state stands either way; a delivery failure surfaces to the caller
    /// and is recorded as an error event.
    async fn notify(
        &self,
        event_type: SystemEventType,
        counterparty: &OrganizationRef,
        uuid: Uuid,
        delivery: Result<(), ShareError>,
    ) -> Result<(), ShareError> {
        match delivery {
            Ok(()) => {
                self.record_success(event_type, format!("uuid={uuid}"));
                Ok(())
            }
            Err(e) => {
                warn!(%uuid, partner = %counterparty.id, error = %e, "partner notification failed");
                self.record_error(event_type, format!("uuid={uuid} notify failed: {e}"));
                Err(e)
            }
        }
    }

    /// Apply one partner-initiated revoke to our inbound copy.
    fn revoke_inbound_member(&self, sender: &OrganizationId, uuid: Uuid) -> Result<(), ShareError> {
        let mut versioned = self.load(uuid)?;
        loop {
            let current = &versioned.record;
            // A batch only reaches the shares its sender gave us.
            if current.organization_id != *sender
                || current.direction != crate::domain::ShareDirection::Inbound
            {
                return Err(ShareError::NotFound(uuid));
            }
            match current.status {
                ShareStatus::Revoked => return Err(ShareError::NotFound(uuid)),
                _ => {
                    let mut updated = current.clone();
                    updated.transition_to(ShareStatus::Revoked, unix_now())?;
                    updated.payload = None;
                    if self.try_save(updated, versioned.version)? {
                        self.record_success(
                            SystemEventType::ShareRevoked,
                            format!("uuid={uuid} partner-initiated"),
                        );
                        return Ok(());
                    }
                    versioned = self.load(uuid)?;
                }
            }
        }
    }
}

#[async_trait]
impl ShareLifecycleApi for ShareLifecycleService {
    fn available_organizations(&self) -> Vec<OrganizationRef> {
        self.directory.list_all()
    }

    fn organization_ref(&self, id: &OrganizationId) -> Result<OrganizationRef, ShareError> {
        Ok(self.directory.resolve(id)?)
    }

    fn share_info_index(
        &self,
        criteria: &ShareCriteria,
        offset: usize,
        limit: usize,
    ) -> Vec<ShareInfo> {
        self.registry
            .list(criteria, offset, limit)
            .iter()
            .map(ShareInfo::from)
            .collect()
    }

    async fn issue_share(
        &self,
        data_type: ShareDataType,
        target: &OrganizationId,
        entity: Vec<u8>,
    ) -> Result<ShareInfo, ShareError> {
        self.ensure_enabled()?;
        let target_ref = self.directory.resolve(target)?;
        if entity.is_empty() {
            return Err(ShareError::Validation("entity body is empty".to_string()));
        }

        let uuid = Uuid::new_v4();
        let payload = SharePayload {
            uuid,
            data_type,
            sender: self.local_org.clone(),
            entity,
        };
        let envelope = seal_value(&self.key, data_type, uuid, &payload)?;
        let record = ShareRequest::new_outbound(
            uuid,
            data_type,
            target.clone(),
            payload_digest(&envelope),
            unix_now(),
        );
        let info = ShareInfo::from(&record);
        self.registry
            .save(record, None)
            .map_err(|e| ShareError::Registry(e.to_string()))?;

        // Local first: the request exists as Pending before any network hop,
        // so a transport failure leaves a retryable record behind.
        match self.transport.send_share(&target_ref, &envelope).await {
            Ok(()) => {
                info!(%uuid, target = %target, %data_type, "share issued");
                self.record_success(SystemEventType::ShareIssued, format!("uuid={uuid}"));
                Ok(info)
            }
            Err(e) => {
                warn!(%uuid, target = %target, error = %e, "share transmission failed");
                self.record_error(
                    SystemEventType::ShareIssued,
                    format!("uuid={uuid} send failed: {e}"),
                );
                Err(e)
            }
        }
    }

    async fn receive_share_request(&self, envelope: EncryptedEnvelope) -> Result<(), ShareError> {
        self.ensure_enabled()?;
        let payload: SharePayload = open_value(&self.key, &envelope).map_err(|e| {
            self.record_error(
                SystemEventType::ShareReceived,
                format!("uuid={} open failed: {e}", envelope.uuid),
            );
            ShareError::from(e)
        })?;
        if payload.uuid != envelope.uuid || payload.data_type != envelope.data_type {
            return Err(ShareError::Validation(
                "envelope header disagrees with payload body".to_string(),
            ));
        }
        let sender = self.directory.resolve(&payload.sender)?;
        let digest = payload_digest(&envelope);

        if let Some(existing) = self.registry.find(envelope.uuid) {
            // At-least-once delivery: identical content is a no-op, changed
            // content for a known uuid is a declared conflict.
            invariant_payload_unchanged(envelope.uuid, existing.record.payload_digest, digest)?;
            debug!(uuid = %envelope.uuid, "duplicate delivery ignored");
            return Ok(());
        }

        let record = ShareRequest::new_inbound(envelope, sender.id.clone(), unix_now());
        let uuid = record.uuid;
        match self.registry.save(record, None) {
            Ok(_) => {}
            Err(RegistryError::VersionConflict { .. }) => {
                // Concurrent duplicate delivery: defer to whichever landed.
                let existing = self.load(uuid)?;
                invariant_payload_unchanged(uuid, existing.record.payload_digest, digest)?;
                return Ok(());
            }
            Err(RegistryError::Storage(e)) => return Err(ShareError::Registry(e)),
        }
        info!(%uuid, sender = %sender.id, "share request received");
        self.record_success(SystemEventType::ShareReceived, format!("uuid={uuid}"));
        Ok(())
    }

    async fn accept_share_request(
        &self,
        data_type: ShareDataType,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        self.ensure_enabled()?;
        let mut versioned = self.load(uuid)?;
        if versioned.record.data_type != data_type {
            return Err(ShareError::NotFound(uuid));
        }

        let origin = self.directory.resolve(&versioned.record.organization_id)?;
        loop {
            if versioned.record.status == ShareStatus::Accepted {
                debug!(%uuid, "already accepted, nothing to do");
                return Ok(());
            }
            invariant_recipient_operation(&versioned.record, ShareStatus::Accepted)?;
            if versioned.record.status != ShareStatus::Pending {
                return Err(ShareError::InvalidTransition {
                    uuid,
                    from: versioned.record.status,
                    to: ShareStatus::Accepted,
                });
            }

            let sealed = versioned.record.payload.clone().ok_or_else(|| {
                ShareError::Validation(format!("sealed payload for {uuid} is no longer retained"))
            })?;
            let payload: SharePayload = open_value(&self.key, &sealed)?;
            let handler = self.handlers.resolve(data_type)?;

            // Handler failure leaves the request Pending for a later retry.
            handler.persist(uuid, &payload.entity)?;

            let mut updated = versioned.record.clone();
            updated.transition_to(ShareStatus::Accepted, unix_now())?;
            updated.payload = None;
            if self.try_save(updated, versioned.version)? {
                break;
            }
            versioned = self.load(uuid)?;
            // A concurrent writer moved the request to a terminal state:
            // the entity persisted above must not outlive this acceptance.
            if versioned.record.is_terminal() {
                handler.remove(uuid)?;
            }
        }

        info!(%uuid, %data_type, "share request accepted");
        let delivery = self.transport.notify_accepted(&origin, uuid).await;
        self.notify(SystemEventType::ShareAccepted, &origin, uuid, delivery)
            .await
    }

    async fn reject_share_request(
        &self,
        data_type: ShareDataType,
        uuid: Uuid,
    ) -> Result<(), ShareError> {
        self.ensure_enabled()?;
        let mut versioned = self.load(uuid)?;
        if versioned.record.data_type != data_type {
            return Err(ShareError::NotFound(uuid));
        }

        let origin = self.directory.resolve(&versioned.record.organization_id)?;
        loop {
            if versioned.record.status == ShareStatus::Rejected {
                debug!(%uuid, "already rejected, nothing to do");
                return Ok(());
            }
            invariant_recipient_operation(&versioned.record, ShareStatus::Rejected)?;

            let mut updated = versioned.record.clone();
            updated.transition_to(ShareStatus::Rejected, unix_now())?;
            updated.payload = None;
            if self.try_save(updated, versioned.version)? {
                break;
            }
            versioned = self.load(uuid)?;
        }

        info!(%uuid, %data_type, "share request rejected");
        let delivery = self.transport.notify_rejected(&origin, uuid).await;
        self.notify(SystemEventType::ShareRejected, &origin, uuid, delivery)
            .await
    }

    async fn revoke_share(&self, uuid: Uuid) -> Result<(), ShareError> {
        self.ensure_enabled()?;
        let mut versioned = self.load(uuid)?;
        let target = self.directory.resolve(&versioned.record.organization_id)?;

        loop {
            // A withdrawn share reads as gone, so a repeated revoke reports
            // NotFound rather than success.
            if versioned.record.status == ShareStatus::Revoked {
                return Err(ShareError::NotFound(uuid));
            }
            invariant_sharer_operation(&versioned.record)?;

            let mut updated = versioned.record.clone();
            updated.transition_to(ShareStatus::Revoked, unix_now())?;
            if self.try_save(updated, versioned.version)? {
                break;
            }
            versioned = self.load(uuid)?;
        }

        info!(%uuid, target = %target.id, "share revoked");
        let delivery = self.transport.notify_revoked(&target, uuid).await;
        self.notify(SystemEventType::ShareRevoked, &target, uuid, delivery)
            .await
    }

    async fn revoke_requests(
        &self,
        envelope: EncryptedEnvelope,
    ) -> Result<Vec<RevokeOutcome>, ShareError> {
        self.ensure_enabled()?;
        let batch: RevokeBatch = open_value(&self.key, &envelope).map_err(|e| {
            self.record_error(
                SystemEventType::ShareRevoked,
                format!("batch open failed: {e}"),
            );
            ShareError::from(e)
        })?;
        // Sender must be a configured partner before any member is touched.
        let sender = self.directory.resolve(&batch.sender)?;

        let mut outcomes = Vec::with_capacity(batch.uuids.len());
        for uuid in batch.uuids {
            let result = self.revoke_inbound_member(&sender.id, uuid);
            if let Err(e) = &result {
                debug!(%uuid, error = %e, "batch revoke member failed");
            }
            outcomes.push(RevokeOutcome { uuid, result });
        }
        info!(
            sender = %sender.id,
            members = outcomes.len(),
            failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
            "bulk revoke processed"
        );
        Ok(outcomes)
    }

    fn is_feature_enabled(&self) -> bool {
        self.config.feature_enabled
    }
}
