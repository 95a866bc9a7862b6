//! # EpiLink Share Lifecycle
//!
//! Lifecycle manager for data shared with external, independently
//! administered instances.
//!
//! ## Purpose
//!
//! Track the state of every share request exchanged with a partner
//! organization and enforce its lifecycle:
//!
//! ```text
//!         issue / inbound receipt
//!                    |
//!                    v
//!               [ Pending ] --accept--> [ Accepted ] --revoke--> [ Revoked ]
//!                    |                                               ^
//!                  reject                                            |
//!                    |                                    revoke (from Pending)
//!                    v
//!               [ Rejected ]  (terminal)
//! ```
//!
//! `Rejected` and `Revoked` are terminal. Delivery between instances is
//! at-least-once, so every terminal-reaching operation is a conditional
//! transition guarded by the current status, never a blind flip.
//!
//! ## Module Structure
//!
//! ```text
//! epilink-share/
//! ├── domain/          # ShareRequest, status machine, errors, invariants
//! ├── ports/           # ShareLifecycleApi, registry/transport/handler ports
//! ├── adapters/        # In-memory registry, entity handler registry
//! └── service/         # The lifecycle manager
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use domain::{
    payload_digest, RevokeBatch, ShareDirection, ShareError, SharePayload, ShareRequest,
    ShareStatus,
};
pub use ports::{
    MockPartnerTransport, PartnerTransport, RegistryError, RevokeOutcome, ShareCriteria,
    ShareInfo, ShareLifecycleApi, ShareRegistry, SharedEntityHandler, VersionedShare,
};
pub use adapters::{HandlerRegistry, InMemoryShareRegistry, RecordingEntityHandler};
pub use service::{ShareConfig, ShareLifecycleService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
