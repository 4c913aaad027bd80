//! Password-based AEAD envelope: `salt(16) || iv(12) || ciphertext+tag(n+16)`.
//!
//! Key derivation is PBKDF2-HMAC-SHA256 over the password, a random salt, and
//! 100,000 iterations, producing a 256-bit AES key. The AEAD is AES-256-GCM
//! with no associated data, a random 12-byte IV, and the 16-byte tag appended
//! to the ciphertext by the `aes-gcm` crate.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

use crate::config;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("encryption failed")]
    CryptoFailure,
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptionAuthFailure,
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; config::KEY_LEN] {
    let mut key = [0u8; config::KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, config::PBKDF2_ITERATIONS, &mut key);
    key
}

/// Encrypt `plaintext` under `password`, returning a self-contained envelope.
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; config::SALT_LEN];
    let mut iv = [0u8; config::IV_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut iv);

    let key = derive_key(password, &salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Nonce::from_slice(&iv);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::CryptoFailure)?;

    let mut envelope = Vec::with_capacity(config::SALT_LEN + config::IV_LEN + ciphertext.len());
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&iv);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Decrypt an envelope produced by [`encrypt`] under `password`.
pub fn decrypt(envelope: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < config::ENVELOPE_OVERHEAD {
        return Err(CryptoError::DecryptionAuthFailure);
    }

    let salt = &envelope[..config::SALT_LEN];
    let iv = &envelope[config::SALT_LEN..config::SALT_LEN + config::IV_LEN];
    let ciphertext = &envelope[config::SALT_LEN + config::IV_LEN..];

    let key = derive_key(password, salt);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Nonce::from_slice(iv);
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::DecryptionAuthFailure)
}
