//! AES-256-GCM sealing and opening.
//!
//! A sealed block is `ciphertext || 16-byte tag` plus the 96-bit nonce it was
//! sealed under. Tag verification happens inside `aes-gcm` in constant time,
//! and no plaintext is released unless the tag verifies.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

use super::key::DerivedKey;
use crate::error::{Result, VaultError};

/// Nonce size for AES-GCM (96 bits = 12 bytes)
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag size (128 bits = 16 bytes)
pub const TAG_LENGTH: usize = 16;

/// Output of one seal call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCiphertext {
    /// Nonce the block was sealed under
    pub nonce: [u8; NONCE_LENGTH],

    /// Ciphertext with the authentication tag appended
    pub sealed: Vec<u8>,
}

/// The block did not authenticate under the given key.
///
/// Callers translate this into a verification or corruption error depending
/// on which block failed; it is never returned from the public vault API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Authentication failed")]
pub struct AuthenticationError;

/// Draw a fresh random nonce from the OS CSPRNG.
pub fn generate_nonce() -> Result<[u8; NONCE_LENGTH]> {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| VaultError::Crypto(format!("Failed to generate nonce: {}", e)))?;
    Ok(nonce)
}

/// Seal `plaintext` under `key`.
///
/// When `nonce` is `None` a fresh random nonce is drawn. Passing an explicit
/// nonce is only safe when the caller guarantees it was never used with this
/// key before.
///
/// # Errors
///
/// Returns `VaultError::Crypto` if the CSPRNG fails or the plaintext exceeds
/// the AES-GCM message limit.
pub fn seal(
    plaintext: &[u8],
    key: &DerivedKey,
    nonce: Option<[u8; NONCE_LENGTH]>,
) -> Result<AuthenticatedCiphertext> {
    let nonce = match nonce {
        Some(nonce) => nonce,
        None => generate_nonce()?,
    };

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| VaultError::Crypto(format!("Encryption failed: {}", e)))?;

    Ok(AuthenticatedCiphertext { nonce, sealed })
}

/// Open a sealed block.
///
/// The returned plaintext is zeroized when dropped.
///
/// # Errors
///
/// Returns `AuthenticationError` if the block is shorter than a tag, or if the
/// key, nonce or sealed bytes do not match what was sealed.
pub fn open(
    ciphertext: &AuthenticatedCiphertext,
    key: &DerivedKey,
) -> std::result::Result<Zeroizing<Vec<u8>>, AuthenticationError> {
    if ciphertext.sealed.len() < TAG_LENGTH {
        return Err(AuthenticationError);
    }

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(
            Nonce::from_slice(&ciphertext.nonce),
            ciphertext.sealed.as_slice(),
        )
        .map(Zeroizing::new)
        .map_err(|_| AuthenticationError)
}
