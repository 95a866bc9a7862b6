//! Periodic reconciliation sweep.
//!
//! The sweep is scheduled off the event log itself: the last successful
//! `ReconciliationSweep` event is the scheduling watermark, so a restarted
//! process resumes the cadence without separate bookkeeping.

use super::ShareLifecycleService;
use epilink_events::{SystemEvent, SystemEventType};
use tracing::info;

impl ShareLifecycleService {
    /// Whether enough time has passed since the last successful sweep.
    /// Always true when no sweep has ever succeeded.
    pub fn reconciliation_due(&self, now: u64) -> bool {
        match self
            .recorder
            .latest_success_of(SystemEventType::ReconciliationSweep)
        {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.config.reconciliation_interval_secs,
        }
    }

    /// Count the requests still awaiting a terminal outcome and record the
    /// sweep. Returns the open-request count.
    pub fn run_reconciliation(&self, now: u64) -> usize {
        let open = self.registry.count_non_terminal();
        info!(open_requests = open, "reconciliation sweep");
        self.recorder.record(SystemEvent::success(
            SystemEventType::ReconciliationSweep,
            now,
            format!("open_requests={open}"),
        ));
        open
    }
}
