//! # EpiLink Envelope Codec
//!
//! Encrypted container for every payload exchanged between instances.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit random nonces, constant-time ARX design
//! - **Header binding**: `(version, data_type, uuid)` are AEAD associated
//!   data, so a tampered header fails decryption even though it is readable
//! - **Versioning**: the version field is checked before any decryption
//!
//! Partner instances are untrusted peers. Nothing inside an envelope is acted
//! on before `open` succeeds.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod errors;
pub mod key;

pub use codec::{open, open_value, seal, seal_value, EncryptedEnvelope, ENVELOPE_VERSION};
pub use errors::EnvelopeError;
pub use key::{Nonce, SecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
