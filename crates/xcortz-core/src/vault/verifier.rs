//! Unlocking a vault: verify first, decrypt second.

use subtle::ConstantTimeEq;

use super::types::{CredentialSet, PasskeyContainer, VaultContainer, VERIFICATION_MARKER};
use crate::crypto::{derive_key, open, DerivedKey};
use crate::error::{Result, VaultError};

/// Prove that `master_key` and `passkey` unlock `vault`.
///
/// Derives the key, opens the verification block and compares it with the
/// marker. The returned key is meant for the rest of the same operation only.
///
/// # Errors
///
/// Every failure, including a too-short master key, returns
/// `VaultError::CredentialVerification` with no further detail.
pub fn verify(
    master_key: &str,
    passkey: &PasskeyContainer,
    vault: &VaultContainer,
) -> Result<DerivedKey> {
    let key = derive_key(master_key, passkey.secret.as_bytes(), &vault.salt, &vault.kdf)
        .map_err(|_| rejected())?;

    let marker = open(&vault.verification, &key).map_err(|_| rejected())?;
    if !bool::from(marker.as_slice().ct_eq(VERIFICATION_MARKER)) {
        return Err(rejected());
    }

    tracing::debug!(file_version = vault.file_version, "vault verified");
    Ok(key)
}

/// Open the data block with an already verified key.
///
/// # Errors
///
/// Returns `VaultError::VaultCorruption` if the data block does not
/// authenticate, is not a JSON list of credentials, or contains duplicate ids.
pub fn decrypt_credentials(vault: &VaultContainer, key: &DerivedKey) -> Result<CredentialSet> {
    let plaintext = open(&vault.data, key).map_err(|_| {
        VaultError::VaultCorruption("Data block failed authentication".to_string())
    })?;

    let credentials: CredentialSet = serde_json::from_slice(&plaintext)
        .map_err(|e| VaultError::VaultCorruption(format!("Invalid credential data: {}", e)))?;
    if let Some(id) = credentials.duplicate_id() {
        return Err(VaultError::VaultCorruption(format!(
            "Duplicate credential id {}",
            id
        )));
    }

    tracing::debug!(count = credentials.len(), "credentials decrypted");
    Ok(credentials)
}

/// Verify and decrypt in one call; the key never leaves this function.
pub fn verify_and_decrypt(
    master_key: &str,
    passkey: &PasskeyContainer,
    vault: &VaultContainer,
) -> Result<CredentialSet> {
    let key = verify(master_key, passkey, vault)?;
    decrypt_credentials(vault, &key)
}

fn rejected() -> VaultError {
    tracing::debug!("vault verification failed");
    VaultError::CredentialVerification
}
