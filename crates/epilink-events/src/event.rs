//! System event records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of lifecycle outcome being recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemEventType {
    /// A share was issued to a partner.
    ShareIssued,
    /// A share was received from a partner.
    ShareReceived,
    /// An inbound share was accepted.
    ShareAccepted,
    /// An inbound share was rejected.
    ShareRejected,
    /// An outbound share was revoked.
    ShareRevoked,
    /// The periodic reconciliation sweep ran.
    ReconciliationSweep,
}

/// Outcome status. Fixed at creation, never mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemEventStatus {
    /// Operation concluded successfully.
    Success,
    /// Operation concluded with an error.
    Error,
}

/// One audit record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SystemEvent {
    /// Unique identifier.
    pub uuid: Uuid,
    /// Kind of outcome.
    pub event_type: SystemEventType,
    /// When the operation started (Unix seconds).
    pub start_date: u64,
    /// When the operation ended, if it did. Must be >= `start_date`.
    pub end_date: Option<u64>,
    /// Outcome status.
    pub status: SystemEventStatus,
    /// Free-form diagnostic text.
    pub additional_info: Option<String>,
    /// Last-modified timestamp. Retention compares against this, not the
    /// occurrence dates.
    pub change_date: u64,
}

impl SystemEvent {
    /// Create a new event. `end_date` values before `start_date` are clamped.
    pub fn new(
        event_type: SystemEventType,
        start_date: u64,
        end_date: Option<u64>,
        status: SystemEventStatus,
        additional_info: Option<String>,
    ) -> Self {
        let end_date = end_date.map(|e| e.max(start_date));
        Self {
            uuid: Uuid::new_v4(),
            event_type,
            start_date,
            end_date,
            status,
            additional_info,
            change_date: end_date.unwrap_or(start_date),
        }
    }

    /// Shorthand for an instantaneous success event.
    pub fn success(event_type: SystemEventType, at: u64, info: impl Into<String>) -> Self {
        Self::new(event_type, at, Some(at), SystemEventStatus::Success, Some(info.into()))
    }

    /// Shorthand for an instantaneous error event.
    pub fn error(event_type: SystemEventType, at: u64, info: impl Into<String>) -> Self {
        Self::new(event_type, at, Some(at), SystemEventStatus::Error, Some(info.into()))
    }
}
