//! In-memory share registry.

use crate::domain::ShareRequest;
use crate::ports::inbound::ShareCriteria;
use crate::ports::outbound::{RegistryError, ShareRegistry, VersionedShare};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory registry with per-uuid optimistic versioning.
///
/// Reference implementation; production durability lives behind the same
/// port in the deployment's relational store. The version check is what
/// serializes concurrent transitions on one uuid: the second writer sees
/// a conflict, reloads, and re-evaluates against the first writer's state.
#[derive(Default)]
pub struct InMemoryShareRegistry {
    shares: RwLock<HashMap<Uuid, (ShareRequest, u64)>>,
}

impl InMemoryShareRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests (tests and diagnostics).
    pub fn len(&self) -> usize {
        self.shares.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ShareRegistry for InMemoryShareRegistry {
    fn find(&self, uuid: Uuid) -> Option<VersionedShare> {
        self.shares.read().get(&uuid).map(|(record, version)| VersionedShare {
            record: record.clone(),
            version: *version,
        })
    }

    fn save(
        &self,
        record: ShareRequest,
        expected_version: Option<u64>,
    ) -> Result<u64, RegistryError> {
        let mut shares = self.shares.write();
        let uuid = record.uuid;

        match (shares.get(&uuid), expected_version) {
            (None, None) => {
                shares.insert(uuid, (record, 1));
                Ok(1)
            }
            (Some((_, actual)), None) => Err(RegistryError::VersionConflict {
                uuid,
                expected: 0,
                actual: *actual,
            }),
            (Some((_, actual)), Some(expected)) if *actual == expected => {
                let next = expected + 1;
                shares.insert(uuid, (record, next));
                Ok(next)
            }
            (Some((_, actual)), Some(expected)) => Err(RegistryError::VersionConflict {
                uuid,
                expected,
                actual: *actual,
            }),
            (None, Some(expected)) => Err(RegistryError::VersionConflict {
                uuid,
                expected,
                actual: 0,
            }),
        }
    }

    fn list(&self, criteria: &ShareCriteria, offset: usize, limit: usize) -> Vec<ShareRequest> {
        let shares = self.shares.read();
        let mut matching: Vec<ShareRequest> = shares
            .values()
            .map(|(record, _)| record)
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();

        // Most recent activity first, ties broken by uuid for determinism
        matching.sort_by(|a, b| {
            b.change_date
                .cmp(&a.change_date)
                .then_with(|| a.uuid.cmp(&b.uuid))
        });

        matching.into_iter().skip(offset).take(limit).collect()
    }

    fn count_non_terminal(&self) -> usize {
        self.shares
            .read()
            .values()
            .filter(|(record, _)| !record.is_terminal())
            .count()
    }
}
