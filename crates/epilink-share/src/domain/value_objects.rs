//! Immutable value types for the share lifecycle.

use serde::{Deserialize, Serialize};

/// Share request state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareStatus {
    /// Created, awaiting accept/reject (inbound) or partner action (outbound).
    #[default]
    Pending,
    /// Recipient accepted and persisted the shared entity.
    Accepted,
    /// Recipient rejected the share.
    Rejected,
    /// Sharer withdrew access.
    Revoked,
}

/// Which side of the exchange this instance is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareDirection {
    /// We shared data with a partner.
    Outbound,
    /// A partner shared data with us.
    Inbound,
}

impl ShareStatus {
    /// Check if a transition is valid.
    ///
    /// Revocation is controlled by the sharer: a local caller revokes its
    /// `Outbound` requests, and a partner-initiated revoke lands on our
    /// `Inbound` copy of the same exchange. Accept and reject are recipient
    /// operations on `Inbound` requests.
    pub fn can_transition_to(&self, next: ShareStatus, direction: ShareDirection) -> bool {
        match (self, next) {
            (Self::Pending, Self::Accepted) => direction == ShareDirection::Inbound,
            (Self::Pending, Self::Rejected) => direction == ShareDirection::Inbound,
            (Self::Pending, Self::Revoked) => true,
            (Self::Accepted, Self::Revoked) => true,
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Revoked)
    }
}

impl std::fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShareStatus::Pending => "pending",
            ShareStatus::Accepted => "accepted",
            ShareStatus::Rejected => "rejected",
            ShareStatus::Revoked => "revoked",
        };
        write!(f, "{name}")
    }
}
