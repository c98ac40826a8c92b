// crates/ccg-core/src/crypto.rs
//
// Authenticated encryption for everything ccg sends to the remote store.
//
// Blob layout: `nonce (12 bytes) || AES-256-GCM(plaintext || key)`, no
// associated data. The trailing copy of the key is checked on every decrypt
// and reported as `KeyMismatch` when it differs. GCM authentication already
// rejects a wrong key, so the trailer check only fires for a blob sealed
// under the right key around a different trailer; it stays an explicit part
// of the blob contract.
//
// Security review note: the trailer means the literal key value travels to
// the remote store inside every ciphertext.
//
// Nonces are drawn at random per call. With 96-bit nonces the collision
// probability under a single key becomes non-negligible after roughly 2^32
// encryptions; rotate keys well before that.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::CcgError;

/// Required key length in bytes (AES-256).
pub const KEY_SIZE: usize = 32;

/// GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm, CcgError> {
    if key.len() != KEY_SIZE {
        return Err(CcgError::Configuration(format!(
            "encryption key must be {} bytes, got {}",
            KEY_SIZE,
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key)
        .map_err(|e| CcgError::Configuration(format!("Failed to create cipher: {}", e)))
}

/// Encrypt `plaintext` under `key`, returning `nonce || sealed(plaintext || key)`.
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CcgError> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let mut data = Vec::with_capacity(plaintext.len() + key.len());
    data.extend_from_slice(plaintext);
    data.extend_from_slice(key);

    let sealed = cipher
        .encrypt(nonce, data.as_slice())
        .map_err(|e| CcgError::Configuration(format!("Encryption failed: {}", e)))?;

    let mut blob = Vec::with_capacity(NONCE_SIZE + sealed.len());
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`] and strip the key trailer.
pub fn decrypt(key: &[u8], blob: &[u8]) -> Result<Vec<u8>, CcgError> {
    let cipher = cipher_for(key)?;

    if blob.len() < NONCE_SIZE {
        return Err(CcgError::MalformedInput(format!(
            "ciphertext too short: {} bytes, nonce alone is {}",
            blob.len(),
            NONCE_SIZE
        )));
    }

    let (nonce_bytes, sealed) = blob.split_at(NONCE_SIZE);
    let mut data = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| CcgError::AuthenticationFailed)?;

    if data.len() < key.len() {
        return Err(CcgError::KeyMismatch);
    }
    let split = data.len() - key.len();
    if !bool::from(data[split..].ct_eq(key)) {
        return Err(CcgError::KeyMismatch);
    }

    data.truncate(split);
    Ok(data)
}

/// Compute SHA-256 hash of the given bytes.
///
/// Returns a 32-byte hash.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
