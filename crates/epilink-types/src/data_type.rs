//! Kinds of surveillance entities that can be shared between instances.

use serde::{Deserialize, Serialize};

/// Enumerated kind of shared entity.
///
/// The tag travels inside the encrypted envelope and selects the entity
/// handler on the receiving side. Adding a variant requires registering a
/// handler for it at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShareDataType {
    /// A disease case.
    Case,
    /// A contact of a case.
    Contact,
    /// An outbreak event.
    Event,
    /// A laboratory sample.
    Sample,
}

impl ShareDataType {
    /// Stable one-byte tag, bound into the envelope's associated data.
    pub fn tag(&self) -> u8 {
        match self {
            ShareDataType::Case => 1,
            ShareDataType::Contact => 2,
            ShareDataType::Event => 3,
            ShareDataType::Sample => 4,
        }
    }

    /// All known data types.
    pub fn all() -> [ShareDataType; 4] {
        [
            ShareDataType::Case,
            ShareDataType::Contact,
            ShareDataType::Event,
            ShareDataType::Sample,
        ]
    }
}

impl std::fmt::Display for ShareDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ShareDataType::Case => "case",
            ShareDataType::Contact => "contact",
            ShareDataType::Event => "event",
            ShareDataType::Sample => "sample",
        };
        write!(f, "{name}")
    }
}
