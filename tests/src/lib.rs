//! # EpiLink Test Suite
//!
//! Unified test crate for cross-crate scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Two-instance exchange flows
//!     ├── exchange_flows.rs
//!     └── maintenance.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All integration tests
//! cargo test -p epilink-tests
//!
//! # By module
//! cargo test -p epilink-tests integration::exchange_flows
//! ```

pub mod integration;
