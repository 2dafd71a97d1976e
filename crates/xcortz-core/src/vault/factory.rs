//! Creation of new passkeys and empty vaults.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use super::types::{
    CredentialSet, PasskeyContainer, PasskeySecret, VaultContainer, FIRST_FILE_VERSION,
    FORMAT_VERSION, PASSKEY_LENGTH, SALT_LENGTH, VERIFICATION_MARKER,
};
use crate::crypto::{derive_key, seal, KdfParams};
use crate::error::{Result, VaultError};

/// Generate a new passkey with a fresh random 256-bit secret.
///
/// # Errors
///
/// Returns `VaultError::Crypto` if the OS random source is unavailable.
pub fn create_passkey() -> Result<PasskeyContainer> {
    let mut secret = PasskeySecret::from_bytes([0u8; PASSKEY_LENGTH]);
    fill_random(&mut secret.0)?;

    tracing::debug!("created passkey");
    Ok(PasskeyContainer {
        version: FORMAT_VERSION.to_string(),
        secret,
        created_at: Utc::now(),
    })
}

/// Create an empty vault bound to `master_key` and `passkey`, using the v1
/// key derivation parameters.
///
/// Nothing is persisted; the caller stores the returned container.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the master key is shorter than 8
/// characters.
pub fn create_vault(master_key: &str, passkey: &PasskeyContainer) -> Result<VaultContainer> {
    create_vault_with_params(master_key, passkey, KdfParams::V1)
}

/// Create an empty vault with explicit key derivation parameters.
///
/// The parameters are recorded in the vault and used for every later
/// derivation against it. They may be stronger than the v1 set, never weaker.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if `params` is weaker than
/// [`KdfParams::V1`] or the master key is shorter than 8 characters.
pub fn create_vault_with_params(
    master_key: &str,
    passkey: &PasskeyContainer,
    params: KdfParams,
) -> Result<VaultContainer> {
    params.check_new_vault()?;
    build_vault(master_key, passkey, params)
}

/// Assemble a vault without checking the cost floor. Tests use this to keep
/// derivations cheap.
pub(crate) fn build_vault(
    master_key: &str,
    passkey: &PasskeyContainer,
    params: KdfParams,
) -> Result<VaultContainer> {
    let mut salt = [0u8; SALT_LENGTH];
    fill_random(&mut salt)?;

    let key = derive_key(master_key, passkey.secret.as_bytes(), &salt, &params)?;

    // Two seal calls, two fresh nonces.
    let verification = seal(VERIFICATION_MARKER, &key, None)?;
    let empty = serde_json::to_vec(&CredentialSet::new())
        .map_err(|e| VaultError::Crypto(format!("Failed to encode credentials: {}", e)))?;
    let data = seal(&empty, &key, None)?;

    tracing::debug!(
        memory_kib = params.memory_kib(),
        iterations = params.iterations(),
        parallelism = params.parallelism(),
        "created vault"
    );

    Ok(VaultContainer {
        version: FORMAT_VERSION.to_string(),
        file_version: FIRST_FILE_VERSION,
        kdf: params,
        salt,
        verification,
        data,
    })
}

fn fill_random(bytes: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(bytes)
        .map_err(|e| VaultError::Crypto(format!("Failed to read random bytes: {}", e)))
}
