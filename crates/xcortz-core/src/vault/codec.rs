//! JSON codec for passkey and vault containers.
//!
//! Parsing goes through private wire structs that mirror the file format
//! exactly. Every required field must be present and every binary field must
//! decode to the expected length before a typed container is produced, so no
//! malformed bytes ever reach the cipher.
//!
//! ```text
//! passkey: { "version": "1.0", "key": "<b64 32B>", "created_at": "<RFC 3339>" }
//! vault:   { "version": "1.0", "fileVersion": 1,
//!            "kdf": { "algorithm": "argon2id", "memoryKib": 131072, "iterations": 4, "parallelism": 4 },
//!            "salt": "<b64 16B>",
//!            "verification": { "iv": "<b64 12B>", "cipherText": "<b64>" },
//!            "data":         { "iv": "<b64 12B>", "cipherText": "<b64>" } }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{
    PasskeyContainer, PasskeySecret, VaultContainer, FIRST_FILE_VERSION, FORMAT_VERSION,
    PASSKEY_LENGTH, SALT_LENGTH,
};
use crate::crypto::{AuthenticatedCiphertext, KdfParams, NONCE_LENGTH, TAG_LENGTH};
use crate::error::{Result, VaultError};

#[derive(Serialize, Deserialize)]
struct PasskeyFile {
    version: String,
    key: String,
    created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultFile {
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kdf: Option<KdfFile>,
    salt: String,
    verification: SealedFile,
    data: SealedFile,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SealedFile {
    iv: String,
    cipher_text: String,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "algorithm")]
enum KdfFile {
    #[serde(rename = "argon2id")]
    Argon2id {
        #[serde(rename = "memoryKib")]
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

/// Parse a passkey file.
///
/// # Errors
///
/// Returns `VaultError::MalformedContainer` if the JSON is invalid, a field is
/// missing, the version is unsupported, or the key is not 32 base64-encoded bytes.
pub fn parse_passkey(input: &str) -> Result<PasskeyContainer> {
    let file: PasskeyFile = serde_json::from_str(input)
        .map_err(|e| malformed(format!("Invalid passkey file: {}", e)))?;
    check_version(&file.version)?;

    let key = decode_exact::<PASSKEY_LENGTH>("key", &file.key)?;
    Ok(PasskeyContainer {
        version: file.version,
        secret: PasskeySecret::from_bytes(key),
        created_at: file.created_at,
    })
}

/// Serialize a passkey container as pretty-printed JSON.
pub fn encode_passkey(passkey: &PasskeyContainer) -> Result<String> {
    let file = PasskeyFile {
        version: passkey.version.clone(),
        key: STANDARD.encode(passkey.secret.as_bytes()),
        created_at: passkey.created_at,
    };
    serde_json::to_string_pretty(&file)
        .map_err(|e| VaultError::Crypto(format!("Failed to encode passkey: {}", e)))
}

/// Parse a vault file.
///
/// A missing `fileVersion` reads as 1 and a missing `kdf` reads as the v1
/// parameters, matching vaults written before those fields existed.
///
/// # Errors
///
/// Returns `VaultError::MalformedContainer` if the JSON is invalid, a required
/// field is missing, the version is unsupported, a binary field has the wrong
/// length, or the KDF parameters are out of range.
pub fn parse_vault(input: &str) -> Result<VaultContainer> {
    let file: VaultFile = serde_json::from_str(input)
        .map_err(|e| malformed(format!("Invalid vault file: {}", e)))?;
    check_version(&file.version)?;

    let file_version = file.file_version.unwrap_or(FIRST_FILE_VERSION);
    if file_version < FIRST_FILE_VERSION {
        return Err(malformed(format!(
            "fileVersion must be at least {}",
            FIRST_FILE_VERSION
        )));
    }

    let kdf = match file.kdf {
        None => KdfParams::V1,
        Some(KdfFile::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        }) => KdfParams::new(memory_kib, iterations, parallelism).map_err(|e| match e {
            VaultError::InvalidInput(message) => malformed(message),
            other => other,
        })?,
    };

    Ok(VaultContainer {
        version: file.version,
        file_version,
        kdf,
        salt: decode_exact::<SALT_LENGTH>("salt", &file.salt)?,
        verification: decode_sealed("verification", &file.verification)?,
        data: decode_sealed("data", &file.data)?,
    })
}

/// Serialize a vault container as pretty-printed JSON.
///
/// The `kdf` field is always written.
pub fn encode_vault(vault: &VaultContainer) -> Result<String> {
    let file = VaultFile {
        version: vault.version.clone(),
        file_version: Some(vault.file_version),
        kdf: Some(KdfFile::Argon2id {
            memory_kib: vault.kdf.memory_kib(),
            iterations: vault.kdf.iterations(),
            parallelism: vault.kdf.parallelism(),
        }),
        salt: STANDARD.encode(vault.salt),
        verification: encode_sealed(&vault.verification),
        data: encode_sealed(&vault.data),
    };
    serde_json::to_string_pretty(&file)
        .map_err(|e| VaultError::Crypto(format!("Failed to encode vault: {}", e)))
}

fn check_version(version: &str) -> Result<()> {
    if version != FORMAT_VERSION {
        return Err(malformed(format!(
            "Unsupported container version \"{}\" (expected \"{}\")",
            version, FORMAT_VERSION
        )));
    }
    Ok(())
}

fn decode_sealed(field: &str, sealed: &SealedFile) -> Result<AuthenticatedCiphertext> {
    let nonce = decode_exact::<NONCE_LENGTH>(&format!("{}.iv", field), &sealed.iv)?;
    let bytes = decode(&format!("{}.cipherText", field), &sealed.cipher_text)?;
    if bytes.len() < TAG_LENGTH {
        return Err(malformed(format!(
            "{}.cipherText must be at least {} bytes (got {})",
            field,
            TAG_LENGTH,
            bytes.len()
        )));
    }
    Ok(AuthenticatedCiphertext {
        nonce,
        sealed: bytes,
    })
}

fn encode_sealed(sealed: &AuthenticatedCiphertext) -> SealedFile {
    SealedFile {
        iv: STANDARD.encode(sealed.nonce),
        cipher_text: STANDARD.encode(&sealed.sealed),
    }
}

fn decode(field: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| malformed(format!("{} is not valid base64: {}", field, e)))
}

fn decode_exact<const N: usize>(field: &str, value: &str) -> Result<[u8; N]> {
    let bytes = zeroize::Zeroizing::new(decode(field, value)?);
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        malformed(format!(
            "{} must be {} bytes (got {})",
            field,
            N,
            bytes.len()
        ))
    })
}

fn malformed(message: String) -> VaultError {
    VaultError::MalformedContainer(message)
}
