//! Mutations of a vault's credential set.
//!
//! Every operation re-derives the key, verifies, decrypts, mutates and
//! re-seals. The returned container is a new value; the caller decides
//! whether and where to persist it.

use chrono::{DateTime, Duration, Utc};

use super::types::{
    Credential, CredentialSet, CredentialUpdate, NewCredential, PasskeyContainer, VaultContainer,
};
use super::verifier::{decrypt_credentials, verify};
use crate::crypto::{seal, DerivedKey};
use crate::error::{Result, VaultError};

/// Add a credential with the next free id.
///
/// Ids are never reused: the new id is one more than the highest id present,
/// regardless of how many credentials were deleted.
///
/// # Errors
///
/// Returns `VaultError::CredentialVerification` on a bad master key or
/// passkey, and `VaultError::VaultCorruption` if the data block is unreadable.
pub fn add_credential(
    vault: &VaultContainer,
    passkey: &PasskeyContainer,
    master_key: &str,
    mut new: NewCredential,
) -> Result<(CredentialSet, VaultContainer)> {
    let key = verify(master_key, passkey, vault)?;
    let mut credentials = decrypt_credentials(vault, &key)?;

    let now = Utc::now();
    let id = credentials.next_id()?;
    credentials.push(Credential {
        id,
        name: std::mem::take(&mut new.name),
        description: std::mem::take(&mut new.description),
        secret: std::mem::take(&mut new.secret),
        created_at: now,
        updated_at: now,
    });

    tracing::debug!(id, "credential added");
    let updated = reseal(vault, &key, &credentials)?;
    Ok((credentials, updated))
}

/// Apply `update` to the credential with `id`.
///
/// `updated_at` always moves forward, even when the update changes nothing
/// or the clock has not advanced since the last change.
///
/// # Errors
///
/// Returns `VaultError::CredentialNotFound` if no credential has `id`.
pub fn edit_credential(
    vault: &VaultContainer,
    passkey: &PasskeyContainer,
    master_key: &str,
    id: u64,
    mut update: CredentialUpdate,
) -> Result<(CredentialSet, VaultContainer)> {
    let key = verify(master_key, passkey, vault)?;
    let mut credentials = decrypt_credentials(vault, &key)?;

    let credential = credentials
        .get_mut(id)
        .ok_or(VaultError::CredentialNotFound(id))?;
    if let Some(name) = update.name.take() {
        credential.name = name;
    }
    if let Some(description) = update.description.take() {
        credential.description = description;
    }
    if let Some(secret) = update.secret.take() {
        credential.secret = secret;
    }
    credential.updated_at = next_timestamp(credential.updated_at);

    tracing::debug!(id, "credential edited");
    let updated = reseal(vault, &key, &credentials)?;
    Ok((credentials, updated))
}

/// Remove the credential with `id`.
///
/// # Errors
///
/// Returns `VaultError::CredentialNotFound` if no credential has `id`.
pub fn delete_credential(
    vault: &VaultContainer,
    passkey: &PasskeyContainer,
    master_key: &str,
    id: u64,
) -> Result<(CredentialSet, VaultContainer)> {
    let key = verify(master_key, passkey, vault)?;
    let mut credentials = decrypt_credentials(vault, &key)?;

    let before = credentials.len();
    credentials.retain(|credential| credential.id != id);
    if credentials.len() == before {
        return Err(VaultError::CredentialNotFound(id));
    }

    tracing::debug!(id, "credential deleted");
    let updated = reseal(vault, &key, &credentials)?;
    Ok((credentials, updated))
}

/// Prepare a vault for export by incrementing its file version.
///
/// The encrypted blocks are carried over untouched, so no secrets are needed.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the file version cannot be incremented.
pub fn bump_export_version(vault: &VaultContainer) -> Result<VaultContainer> {
    let file_version = vault
        .file_version
        .checked_add(1)
        .ok_or_else(|| VaultError::InvalidInput("File version overflow".to_string()))?;

    tracing::debug!(file_version, "bumped export version");
    Ok(VaultContainer {
        file_version,
        ..vault.clone()
    })
}

/// Current time, or one microsecond past `previous` if the clock is behind it.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

fn reseal(
    vault: &VaultContainer,
    key: &DerivedKey,
    credentials: &CredentialSet,
) -> Result<VaultContainer> {
    let plaintext = zeroize::Zeroizing::new(
        serde_json::to_vec(credentials)
            .map_err(|e| VaultError::Crypto(format!("Failed to encode credentials: {}", e)))?,
    );
    let data = seal(&plaintext, key, None)?;
    Ok(vault.with_data(data))
}
