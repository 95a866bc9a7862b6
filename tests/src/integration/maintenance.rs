//! # Maintenance Loop Scenarios
//!
//! Exercises the assembled runtime container: reconciliation sweeps driven
//! off the event log watermark plus event retention.

#[cfg(test)]
mod tests {
    use epilink_events::{
        SystemEvent, SystemEventRecorder, SystemEventStatus, SystemEventType,
    };
    use epilink_runtime::{ExchangeContainer, RuntimeConfig};
    use epilink_share::ShareLifecycleApi;
    use epilink_types::{unix_now, OrganizationId, ShareDataType};

    fn config() -> RuntimeConfig {
        RuntimeConfig {
            envelope_key: [9u8; 32],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sweep_counts_only_open_requests() {
        let mut cfg = config();
        cfg.organizations = vec![epilink_directory::OrganizationRef {
            id: OrganizationId::new("hd-north"),
            name: "Health Department North".to_string(),
            endpoint: "https://hd-north.example.org".to_string(),
        }];
        let container = ExchangeContainer::new(cfg);

        let info = container
            .service
            .issue_share(
                ShareDataType::Case,
                &OrganizationId::new("hd-north"),
                b"case".to_vec(),
            )
            .await
            .unwrap();

        assert_eq!(container.service.run_reconciliation(unix_now()), 1);

        container.service.revoke_share(info.uuid).await.unwrap();
        assert_eq!(container.service.run_reconciliation(unix_now()), 0);
    }

    #[test]
    fn test_sweep_watermark_respects_interval() {
        let container = ExchangeContainer::new(config());
        let now = unix_now();

        assert!(container.service.reconciliation_due(now));
        container.service.run_reconciliation(now);
        assert!(!container.service.reconciliation_due(now + 10));
        assert!(container
            .service
            .reconciliation_due(now + container.config.reconciliation_interval_secs));
    }

    #[test]
    fn test_retention_purges_stale_events_only() {
        let mut cfg = config();
        cfg.retention.enabled = true;
        cfg.retention.days = 30;
        let container = ExchangeContainer::new(cfg);

        // Stale: last touched far beyond the horizon.
        container.events.record(SystemEvent::success(
            SystemEventType::ShareIssued,
            1_000,
            "uuid=stale",
        ));
        // Fresh: touched now.
        container.events.record(SystemEvent::new(
            SystemEventType::ShareAccepted,
            unix_now(),
            None,
            SystemEventStatus::Success,
            None,
        ));

        container.maintenance_tick();

        assert!(container
            .events
            .of_type(SystemEventType::ShareIssued)
            .is_empty());
        assert_eq!(
            container
                .events
                .of_type(SystemEventType::ShareAccepted)
                .len(),
            1
        );
    }

    #[test]
    fn test_retention_disabled_keeps_everything() {
        let container = ExchangeContainer::new(config());

        container.events.record(SystemEvent::success(
            SystemEventType::ShareIssued,
            1_000,
            "uuid=ancient",
        ));
        container.maintenance_tick();

        assert_eq!(
            container.events.of_type(SystemEventType::ShareIssued).len(),
            1
        );
    }
}
