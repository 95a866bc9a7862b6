//! Envelope codec error types.

use thiserror::Error;

/// Errors from sealing or opening envelopes.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered ciphertext, or tampered header)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Envelope version is not supported
    #[error("Unsupported envelope version: got {got}, supported {supported}")]
    UnsupportedVersion {
        /// Version found in the envelope
        got: u16,
        /// Version this build supports
        supported: u16,
    },

    /// Invalid key material
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Payload body could not be serialized or deserialized
    #[error("Payload encoding failed: {0}")]
    PayloadEncoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_version_message() {
        let err = EnvelopeError::UnsupportedVersion { got: 9, supported: 1 };
        assert!(err.to_string().contains("got 9"));
    }

    #[test]
    fn test_decryption_failed_message() {
        let err = EnvelopeError::DecryptionFailed("aead".to_string());
        assert!(err.to_string().contains("Decryption failed"));
    }
}
