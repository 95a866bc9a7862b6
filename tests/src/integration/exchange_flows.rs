//! # Two-Instance Exchange Flows
//!
//! Each test stands up two independently wired lifecycle services sharing
//! one envelope key, and moves sealed envelopes between them the way the
//! wire would: whatever instance A's transport captured is handed verbatim
//! to instance B's receiving endpoint.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use epilink_directory::{InMemoryDirectory, OrganizationRef};
    use epilink_envelope::{seal_value, EncryptedEnvelope, SecretKey};
    use epilink_events::{InMemorySystemEventLog, SystemEventRecorder, SystemEventType};
    use epilink_share::{
        HandlerRegistry, InMemoryShareRegistry, MockPartnerTransport, RecordingEntityHandler,
        RevokeBatch, ShareConfig, ShareCriteria, ShareDirection, ShareError, ShareLifecycleApi,
        ShareLifecycleService, ShareRegistry, ShareStatus,
    };
    use epilink_types::{OrganizationId, ShareDataType};
    use uuid::Uuid;

    const ALICE: &str = "hd-alice";
    const BOB: &str = "hd-bob";

    /// One fully wired exchange instance.
    struct Instance {
        service: Arc<ShareLifecycleService>,
        transport: Arc<MockPartnerTransport>,
        registry: Arc<InMemoryShareRegistry>,
        events: Arc<InMemorySystemEventLog>,
        case_handler: Arc<RecordingEntityHandler>,
    }

    fn org(id: &str) -> OrganizationRef {
        OrganizationRef {
            id: OrganizationId::new(id),
            name: format!("Health Department {id}"),
            endpoint: format!("https://{id}.example.org"),
        }
    }

    fn instance(key: &SecretKey, local: &str, partner: &str) -> Instance {
        let transport = Arc::new(MockPartnerTransport::default());
        let registry = Arc::new(InMemoryShareRegistry::new());
        let events = Arc::new(InMemorySystemEventLog::new());
        let case_handler = Arc::new(RecordingEntityHandler::new(ShareDataType::Case));

        let mut handlers = HandlerRegistry::new().register(case_handler.clone());
        for data_type in [
            ShareDataType::Contact,
            ShareDataType::Event,
            ShareDataType::Sample,
        ] {
            handlers = handlers.register(Arc::new(RecordingEntityHandler::new(data_type)));
        }

        let service = Arc::new(ShareLifecycleService::new(
            ShareConfig::default(),
            key.clone(),
            OrganizationId::new(local),
            registry.clone(),
            Arc::new(InMemoryDirectory::new(vec![org(partner)])),
            transport.clone(),
            events.clone(),
            handlers,
        ));
        Instance {
            service,
            transport,
            registry,
            events,
            case_handler,
        }
    }

    /// The envelope most recently captured by an instance's transport.
    fn last_sent(instance: &Instance) -> EncryptedEnvelope {
        instance
            .transport
            .sent
            .lock()
            .last()
            .expect("no envelope was transmitted")
            .1
            .clone()
    }

    #[tokio::test]
    async fn test_issue_receive_accept_across_instances() {
        let key = SecretKey::generate();
        let alice = instance(&key, ALICE, BOB);
        let bob = instance(&key, BOB, ALICE);

        let info = alice
            .service
            .issue_share(
                ShareDataType::Case,
                &OrganizationId::new(BOB),
                b"case record".to_vec(),
            )
            .await
            .unwrap();

        // The wire hop.
        bob.service
            .receive_share_request(last_sent(&alice))
            .await
            .unwrap();

        let inbound = bob.service.share_info_index(
            &ShareCriteria {
                direction: Some(ShareDirection::Inbound),
                ..Default::default()
            },
            0,
            10,
        );
        assert_eq!(inbound.len(), 1);
        assert_eq!(inbound[0].uuid, info.uuid);
        assert_eq!(inbound[0].organization_id.as_str(), ALICE);
        assert_eq!(inbound[0].status, ShareStatus::Pending);

        bob.service
            .accept_share_request(ShareDataType::Case, info.uuid)
            .await
            .unwrap();

        assert_eq!(
            bob.case_handler.entity(info.uuid),
            Some(b"case record".to_vec())
        );
        assert_eq!(bob.case_handler.persist_count(), 1);

        // Both sides audited their half of the flow.
        assert!(alice
            .events
            .latest_success_of(SystemEventType::ShareIssued)
            .is_some());
        assert!(bob
            .events
            .latest_success_of(SystemEventType::ShareAccepted)
            .is_some());

        // The sharer's copy stays Pending until its partner's answer is
        // delivered out of band.
        assert_eq!(
            alice.registry.find(info.uuid).unwrap().record.status,
            ShareStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_redelivery_after_rejection_is_harmless() {
        let key = SecretKey::generate();
        let alice = instance(&key, ALICE, BOB);
        let bob = instance(&key, BOB, ALICE);

        let info = alice
            .service
            .issue_share(ShareDataType::Case, &OrganizationId::new(BOB), b"x".to_vec())
            .await
            .unwrap();
        let envelope = last_sent(&alice);

        bob.service
            .receive_share_request(envelope.clone())
            .await
            .unwrap();
        bob.service
            .reject_share_request(ShareDataType::Case, info.uuid)
            .await
            .unwrap();

        // At-least-once delivery retries the same envelope.
        bob.service.receive_share_request(envelope).await.unwrap();

        assert_eq!(bob.registry.len(), 1);
        assert_eq!(
            bob.registry.find(info.uuid).unwrap().record.status,
            ShareStatus::Rejected
        );
        assert_eq!(bob.case_handler.persist_count(), 0);
    }

    #[tokio::test]
    async fn test_sharer_withdraws_an_accepted_share() {
        let key = SecretKey::generate();
        let alice = instance(&key, ALICE, BOB);
        let bob = instance(&key, BOB, ALICE);

        let info = alice
            .service
            .issue_share(ShareDataType::Case, &OrganizationId::new(BOB), b"x".to_vec())
            .await
            .unwrap();
        bob.service
            .receive_share_request(last_sent(&alice))
            .await
            .unwrap();
        bob.service
            .accept_share_request(ShareDataType::Case, info.uuid)
            .await
            .unwrap();

        // Alice withdraws her outbound copy and tells Bob.
        alice.service.revoke_share(info.uuid).await.unwrap();
        let batch = RevokeBatch {
            sender: OrganizationId::new(ALICE),
            uuids: vec![info.uuid],
        };
        let batch_envelope =
            seal_value(&key, ShareDataType::Case, Uuid::new_v4(), &batch).unwrap();

        let outcomes = bob.service.revoke_requests(batch_envelope).await.unwrap();
        assert!(outcomes[0].result.is_ok());

        assert_eq!(
            alice.registry.find(info.uuid).unwrap().record.status,
            ShareStatus::Revoked
        );
        assert_eq!(
            bob.registry.find(info.uuid).unwrap().record.status,
            ShareStatus::Revoked
        );
        assert!(bob
            .events
            .latest_success_of(SystemEventType::ShareRevoked)
            .is_some());
    }

    #[tokio::test]
    async fn test_mismatched_keys_cannot_exchange() {
        let alice = instance(&SecretKey::generate(), ALICE, BOB);
        let bob = instance(&SecretKey::generate(), BOB, ALICE);

        alice
            .service
            .issue_share(ShareDataType::Case, &OrganizationId::new(BOB), b"x".to_vec())
            .await
            .unwrap();

        let result = bob.service.receive_share_request(last_sent(&alice)).await;
        assert!(matches!(result, Err(ShareError::Decryption(_))));
        assert!(bob.registry.is_empty());
    }

    #[tokio::test]
    async fn test_parallel_issues_stay_independent() {
        let key = SecretKey::generate();
        let alice = instance(&key, ALICE, BOB);

        let mut tasks = Vec::new();
        for i in 0..8u8 {
            let service = alice.service.clone();
            tasks.push(tokio::spawn(async move {
                service
                    .issue_share(
                        ShareDataType::Contact,
                        &OrganizationId::new(BOB),
                        vec![i; 16],
                    )
                    .await
            }));
        }

        let mut uuids = Vec::new();
        for task in tasks {
            let info = task.await.unwrap().unwrap();
            uuids.push(info.uuid);
        }
        uuids.sort();
        uuids.dedup();
        assert_eq!(uuids.len(), 8);
        assert_eq!(alice.registry.len(), 8);
        assert_eq!(alice.transport.sent.lock().len(), 8);
    }
}
