//! Cross-crate integration scenarios.

pub mod exchange_flows;
pub mod maintenance;
