//! Partner organization lookup.

use epilink_types::OrganizationId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Reference data for one partner instance.
///
/// Immutable once loaded; the lifecycle manager never mutates directory
/// entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    /// Organization identifier.
    pub id: OrganizationId,
    /// Human-readable display name.
    pub name: String,
    /// Connection endpoint (URL).
    pub endpoint: String,
}

/// Directory error types.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Referenced organization is not configured.
    #[error("Organization not found: {0}")]
    NotFound(OrganizationId),
}

/// Read-only view of the configured partner set.
pub trait OrganizationDirectory: Send + Sync {
    /// All configured partners, sorted by id for determinism. Empty when
    /// nothing is configured.
    fn list_all(&self) -> Vec<OrganizationRef>;

    /// Resolve a single partner.
    fn resolve(&self, id: &OrganizationId) -> Result<OrganizationRef, DirectoryError>;
}

/// Directory backed by entries loaded at startup.
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<OrganizationId, OrganizationRef>>,
}

impl InMemoryDirectory {
    /// Build from configured entries. Later duplicates win.
    pub fn new(entries: Vec<OrganizationRef>) -> Self {
        let map = entries.into_iter().map(|e| (e.id.clone(), e)).collect();
        Self {
            entries: RwLock::new(map),
        }
    }

    /// Empty directory (no partners configured).
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl OrganizationDirectory for InMemoryDirectory {
    fn list_all(&self) -> Vec<OrganizationRef> {
        let mut all: Vec<OrganizationRef> = self.entries.read().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    fn resolve(&self, id: &OrganizationId) -> Result<OrganizationRef, DirectoryError> {
        self.entries
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))
    }
}
