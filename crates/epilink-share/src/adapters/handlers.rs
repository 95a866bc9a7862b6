//! Entity handler dispatch.
//!
//! The original per-entity persistence hooks resolved handlers dynamically;
//! here the mapping from data type to handler is an explicit map built at
//! startup, never runtime reflection.

use crate::domain::ShareError;
use crate::ports::outbound::SharedEntityHandler;
use epilink_types::ShareDataType;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Startup-time map from data type to its entity handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ShareDataType, Arc<dyn SharedEntityHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared data type. Later registrations
    /// for the same type win.
    pub fn register(mut self, handler: Arc<dyn SharedEntityHandler>) -> Self {
        self.handlers.insert(handler.data_type(), handler);
        self
    }

    /// Resolve the handler for a data type.
    pub fn resolve(&self, data_type: ShareDataType) -> Result<Arc<dyn SharedEntityHandler>, ShareError> {
        self.handlers
            .get(&data_type)
            .cloned()
            .ok_or_else(|| ShareError::Validation(format!("no entity handler for {data_type}")))
    }
}

/// In-memory entity handler for tests and the reference runtime.
///
/// Stores entity bytes per uuid and counts persists, so tests can assert
/// redelivery causes exactly one write. Rejects empty bodies.
pub struct RecordingEntityHandler {
    data_type: ShareDataType,
    entities: RwLock<HashMap<Uuid, Vec<u8>>>,
    persist_count: RwLock<usize>,
    /// Force validation failures for tests.
    pub fail_validation: bool,
}

impl RecordingEntityHandler {
    /// Create a handler for one data type.
    pub fn new(data_type: ShareDataType) -> Self {
        Self {
            data_type,
            entities: RwLock::new(HashMap::new()),
            persist_count: RwLock::new(0),
            fail_validation: false,
        }
    }

    /// Create a handler whose validation always fails.
    pub fn rejecting(data_type: ShareDataType) -> Self {
        Self {
            fail_validation: true,
            ..Self::new(data_type)
        }
    }

    /// Number of successful persists.
    pub fn persist_count(&self) -> usize {
        *self.persist_count.read()
    }

    /// Look up a persisted entity.
    pub fn entity(&self, uuid: Uuid) -> Option<Vec<u8>> {
        self.entities.read().get(&uuid).cloned()
    }
}

impl SharedEntityHandler for RecordingEntityHandler {
    fn data_type(&self) -> ShareDataType {
        self.data_type
    }

    fn persist(&self, uuid: Uuid, entity: &[u8]) -> Result<(), ShareError> {
        if self.fail_validation {
            return Err(ShareError::Validation(format!(
                "entity for {uuid} failed validation"
            )));
        }
        if entity.is_empty() {
            return Err(ShareError::Validation(format!("entity for {uuid} is empty")));
        }
        let mut entities = self.entities.write();
        if entities.get(&uuid).is_some_and(|stored| stored == entity) {
            return Ok(());
        }
        entities.insert(uuid, entity.to_vec());
        *self.persist_count.write() += 1;
        debug!(%uuid, data_type = %self.data_type, "shared entity persisted");
        Ok(())
    }

    fn remove(&self, uuid: Uuid) -> Result<(), ShareError> {
        self.entities.write().remove(&uuid);
        debug!(%uuid, data_type = %self.data_type, "shared entity removed");
        Ok(())
    }
}
