//! Seal and open operations.

use crate::key::{Nonce, SecretKey};
use crate::EnvelopeError;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use epilink_types::ShareDataType;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

/// Current envelope format version.
pub const ENVELOPE_VERSION: u16 = 1;

/// The wire container for every instance-to-instance payload.
///
/// The header fields (`version`, `data_type`, `uuid`) are plaintext so the
/// receiver can route before decrypting, but they are bound into the AEAD
/// associated data: any modification fails `open`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    /// Format version. Checked before any decryption.
    pub version: u16,
    /// Kind of shared entity inside.
    pub data_type: ShareDataType,
    /// Share request uuid this payload belongs to.
    pub uuid: Uuid,
    /// Encryption nonce.
    pub nonce: Nonce,
    /// AEAD ciphertext (includes the Poly1305 tag).
    pub ciphertext: Vec<u8>,
}

/// Associated data binding the readable header to the ciphertext.
fn associated_data(version: u16, data_type: ShareDataType, uuid: &Uuid) -> Vec<u8> {
    let mut aad = Vec::with_capacity(2 + 1 + 16);
    aad.extend_from_slice(&version.to_le_bytes());
    aad.push(data_type.tag());
    aad.extend_from_slice(uuid.as_bytes());
    aad
}

/// Seal a plaintext into an envelope.
///
/// # Errors
///
/// Returns `EnvelopeError::EncryptionFailed` if encryption fails.
pub fn seal(
    key: &SecretKey,
    data_type: ShareDataType,
    uuid: Uuid,
    plaintext: &[u8],
) -> Result<EncryptedEnvelope, EnvelopeError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::generate();
    let aad = associated_data(ENVELOPE_VERSION, data_type, &uuid);

    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(nonce.as_bytes()),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|e| EnvelopeError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedEnvelope {
        version: ENVELOPE_VERSION,
        data_type,
        uuid,
        nonce,
        ciphertext,
    })
}

/// Open an envelope and return the plaintext.
///
/// # Errors
///
/// - `EnvelopeError::UnsupportedVersion` if the version is unknown
/// - `EnvelopeError::DecryptionFailed` on wrong key, tampered ciphertext,
///   or tampered header fields
pub fn open(key: &SecretKey, envelope: &EncryptedEnvelope) -> Result<Vec<u8>, EnvelopeError> {
    if envelope.version != ENVELOPE_VERSION {
        return Err(EnvelopeError::UnsupportedVersion {
            got: envelope.version,
            supported: ENVELOPE_VERSION,
        });
    }

    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let aad = associated_data(envelope.version, envelope.data_type, &envelope.uuid);

    cipher
        .decrypt(
            XNonce::from_slice(envelope.nonce.as_bytes()),
            Payload {
                msg: &envelope.ciphertext,
                aad: &aad,
            },
        )
        .map_err(|e| EnvelopeError::DecryptionFailed(e.to_string()))
}

/// Seal a serializable value (bincode-encoded body).
pub fn seal_value<T: Serialize>(
    key: &SecretKey,
    data_type: ShareDataType,
    uuid: Uuid,
    value: &T,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    let body = bincode::serialize(value).map_err(|e| EnvelopeError::PayloadEncoding(e.to_string()))?;
    seal(key, data_type, uuid, &body)
}

/// Open an envelope and decode its bincode body.
pub fn open_value<T: DeserializeOwned>(
    key: &SecretKey,
    envelope: &EncryptedEnvelope,
) -> Result<T, EnvelopeError> {
    let body = open(key, envelope)?;
    bincode::deserialize(&body).map_err(|e| EnvelopeError::PayloadEncoding(e.to_string()))
}
