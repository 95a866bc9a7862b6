//! Recorder trait and the in-memory log.

use crate::event::{SystemEvent, SystemEventStatus, SystemEventType};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Append-only write plus the two read contracts the lifecycle manager and
/// the retention sweep rely on.
pub trait SystemEventRecorder: Send + Sync {
    /// Append one event. Events are never updated after this call.
    fn record(&self, event: SystemEvent);

    /// `start_date` of the most recent `Success` event of the given type,
    /// regardless of insertion order. `None` when no success exists.
    fn latest_success_of(&self, event_type: SystemEventType) -> Option<u64>;

    /// Delete events whose change date is strictly before `cutoff`.
    /// Returns the number of deleted events.
    fn purge_unchanged_before(&self, cutoff: u64) -> usize;

    /// Number of retained events.
    fn len(&self) -> usize;

    /// True when no events are retained.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory event log.
///
/// Reference implementation; a durable deployment would back this with the
/// relational store.
#[derive(Default)]
pub struct InMemorySystemEventLog {
    events: RwLock<Vec<SystemEvent>>,
}

impl InMemorySystemEventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an event by uuid (diagnostics and tests).
    pub fn find(&self, uuid: Uuid) -> Option<SystemEvent> {
        self.events.read().iter().find(|e| e.uuid == uuid).cloned()
    }

    /// All events of a type, in insertion order.
    pub fn of_type(&self, event_type: SystemEventType) -> Vec<SystemEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }
}

impl SystemEventRecorder for InMemorySystemEventLog {
    fn record(&self, event: SystemEvent) {
        self.events.write().push(event);
    }

    fn latest_success_of(&self, event_type: SystemEventType) -> Option<u64> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type == event_type && e.status == SystemEventStatus::Success)
            .map(|e| e.start_date)
            .max()
    }

    fn purge_unchanged_before(&self, cutoff: u64) -> usize {
        let mut events = self.events.write();
        let before = events.len();
        events.retain(|e| e.change_date >= cutoff);
        let purged = before - events.len();
        debug!(purged, cutoff, "system event purge finished");
        purged
    }

    fn len(&self) -> usize {
        self.events.read().len()
    }
}
