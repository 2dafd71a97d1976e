//! Key derivation using Argon2id.
//!
//! The derivation input is the master key's UTF-8 bytes followed by the raw
//! passkey secret. Neither secret alone reproduces the key.

use argon2::Argon2;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use super::master_key::validate_master_key;
use crate::error::{Result, VaultError};

/// Argon2id parameters of the v1 vault format.
///
/// - Memory: 128 MiB (128 * 1024 KiB)
/// - Iterations: 4
/// - Parallelism: 4
const V1_MEMORY_KIB: u32 = 128 * 1024;
const V1_ITERATIONS: u32 = 4;
const V1_PARALLELISM: u32 = 4;

/// Smallest memory cost a vault file may declare (8 MiB).
///
/// Files are accepted down to this bound so vaults written by other clients
/// still open. New vaults must meet the v1 parameters, see
/// [`KdfParams::check_new_vault`].
pub const MIN_MEMORY_KIB: u32 = 8 * 1024;
/// Largest memory cost a vault may declare (1 GiB).
pub const MAX_MEMORY_KIB: u32 = 1024 * 1024;
/// Upper bound for iterations and lanes declared by a vault.
pub const MAX_ITERATIONS: u32 = 16;
pub const MAX_PARALLELISM: u32 = 16;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256).
pub const KEY_LENGTH: usize = 32;

/// Cost parameters for Argon2id.
///
/// Stored alongside each vault so the cost can be raised for new vaults
/// without breaking old ones. The bounds keep an untrusted vault file from
/// demanding an unreasonable amount of memory or time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl KdfParams {
    /// The parameter set used by every v1 vault, including those written
    /// before the parameters were recorded in the container.
    pub const V1: KdfParams = KdfParams {
        memory_kib: V1_MEMORY_KIB,
        iterations: V1_ITERATIONS,
        parallelism: V1_PARALLELISM,
    };

    /// Create a validated parameter set.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if any value is outside the accepted range.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        check_range("memory cost (KiB)", memory_kib, MIN_MEMORY_KIB, MAX_MEMORY_KIB)?;
        check_range("iterations", iterations, 1, MAX_ITERATIONS)?;
        check_range("parallelism", parallelism, 1, MAX_PARALLELISM)?;
        Ok(Self {
            memory_kib,
            iterations,
            parallelism,
        })
    }

    /// Create a parameter set for a new vault.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if any value is out of range or
    /// weaker than [`KdfParams::V1`].
    pub fn for_new_vault(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Self::new(memory_kib, iterations, parallelism)?;
        params.check_new_vault()?;
        Ok(params)
    }

    /// Reject parameters weaker than the v1 set in any dimension.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` naming the first value below the floor.
    pub fn check_new_vault(&self) -> Result<()> {
        let floor = Self::V1;
        check_range("memory cost (KiB)", self.memory_kib, floor.memory_kib, MAX_MEMORY_KIB)?;
        check_range("iterations", self.iterations, floor.iterations, MAX_ITERATIONS)?;
        check_range("parallelism", self.parallelism, floor.parallelism, MAX_PARALLELISM)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }
}

/// Cheapest accepted parameters, for tests.
#[cfg(test)]
pub(crate) const TEST_PARAMS: KdfParams = KdfParams {
    memory_kib: MIN_MEMORY_KIB,
    iterations: 1,
    parallelism: 1,
};

impl Default for KdfParams {
    fn default() -> Self {
        Self::V1
    }
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(VaultError::InvalidInput(format!(
            "Argon2id {} must be between {} and {} (got {})",
            name, min, max, value
        )));
    }
    Ok(())
}

/// A key derived from the master key and passkey.
///
/// Key material is zeroized when dropped. The type is intentionally not
/// `Clone`: a key lives for one operation and is re-derived for the next.
#[derive(ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Wrap raw key bytes.
    ///
    /// # Security
    ///
    /// The caller is responsible for ensuring the bytes come from a secure source.
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the vault encryption key.
///
/// # Arguments
///
/// * `master_key` - The user's memorized master key (at least 8 characters)
/// * `passkey_secret` - The raw secret from the passkey file
/// * `salt` - The vault's salt
/// * `params` - Argon2id cost parameters recorded in the vault
///
/// # Security
///
/// - Same inputs always produce the same key (deterministic)
/// - Memory-hard: the v1 parameters require 128 MiB per derivation
/// - The concatenated input is zeroized before returning
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the master key is too short, the
/// passkey secret or salt is empty, or Argon2 rejects the input.
pub fn derive_key(
    master_key: &str,
    passkey_secret: &[u8],
    salt: &[u8],
    params: &KdfParams,
) -> Result<DerivedKey> {
    validate_master_key(master_key)?;
    if passkey_secret.is_empty() || salt.is_empty() {
        return Err(VaultError::InvalidInput(
            "Passkey and salt are required".to_string(),
        ));
    }

    let argon_params = argon2::Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LENGTH),
    )
    .map_err(|e| VaultError::InvalidInput(format!("Invalid Argon2 parameters: {}", e)))?;
    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut input = Zeroizing::new(Vec::with_capacity(master_key.len() + passkey_secret.len()));
    input.extend_from_slice(master_key.as_bytes());
    input.extend_from_slice(passkey_secret);

    tracing::trace!(
        memory_kib = params.memory_kib,
        iterations = params.iterations,
        parallelism = params.parallelism,
        "deriving vault key"
    );

    let mut key = DerivedKey::from_bytes([0u8; KEY_LENGTH]);
    argon2
        .hash_password_into(&input, salt, &mut key.key)
        .map_err(|e| VaultError::InvalidInput(format!("Key derivation failed: {}", e)))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER_KEY: &str = "correct-horse-battery";
    const PASSKEY: &[u8] = b"0123456789abcdef0123456789abcdef";
    const SALT: &[u8] = b"sixteen-byte-slt";

    fn fast() -> KdfParams {
        TEST_PARAMS
    }

    #[test]
    fn test_key_derivation_deterministic() {
        let key1 = derive_key(MASTER_KEY, PASSKEY, SALT, &fast()).unwrap();
        let key2 = derive_key(MASTER_KEY, PASSKEY, SALT, &fast()).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_each_input_changes_key() {
        let base = derive_key(MASTER_KEY, PASSKEY, SALT, &fast()).unwrap();

        let other_master = derive_key("correct-horse-batterz", PASSKEY, SALT, &fast()).unwrap();
        let mut passkey = PASSKEY.to_vec();
        passkey[0] ^= 0x01;
        let other_passkey = derive_key(MASTER_KEY, &passkey, SALT, &fast()).unwrap();
        let other_salt = derive_key(MASTER_KEY, PASSKEY, b"sixteen-byte-slu", &fast()).unwrap();

        assert_ne!(base.as_bytes(), other_master.as_bytes());
        assert_ne!(base.as_bytes(), other_passkey.as_bytes());
        assert_ne!(base.as_bytes(), other_salt.as_bytes());
    }

    #[test]
    fn test_params_change_key() {
        let light = derive_key(MASTER_KEY, PASSKEY, SALT, &fast()).unwrap();
        let heavier = KdfParams::new(MIN_MEMORY_KIB, 2, 1).unwrap();
        let heavy = derive_key(MASTER_KEY, PASSKEY, SALT, &heavier).unwrap();

        assert_ne!(light.as_bytes(), heavy.as_bytes());
    }

    #[test]
    fn test_short_master_key_rejected() {
        let result = derive_key("short", PASSKEY, SALT, &fast());
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_passkey_or_salt_rejected() {
        let empty_passkey = derive_key(MASTER_KEY, b"", SALT, &fast());
        assert!(matches!(empty_passkey, Err(VaultError::InvalidInput(_))));

        let empty_salt = derive_key(MASTER_KEY, PASSKEY, b"", &fast());
        assert!(matches!(empty_salt, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_v1_params_are_default() {
        let params = KdfParams::default();
        assert_eq!(params, KdfParams::V1);
        assert_eq!(params.memory_kib(), 131_072);
        assert_eq!(params.iterations(), 4);
        assert_eq!(params.parallelism(), 4);
    }

    #[test]
    fn test_params_out_of_range_rejected() {
        assert!(KdfParams::new(MIN_MEMORY_KIB - 1, 1, 1).is_err());
        assert!(KdfParams::new(MAX_MEMORY_KIB + 1, 1, 1).is_err());
        assert!(KdfParams::new(MIN_MEMORY_KIB, 0, 1).is_err());
        assert!(KdfParams::new(MIN_MEMORY_KIB, MAX_ITERATIONS + 1, 1).is_err());
        assert!(KdfParams::new(MIN_MEMORY_KIB, 1, 0).is_err());
        assert!(KdfParams::new(MIN_MEMORY_KIB, 1, MAX_PARALLELISM + 1).is_err());
    }

    #[test]
    fn test_new_vault_floor_is_v1() {
        assert!(KdfParams::V1.check_new_vault().is_ok());
        assert!(TEST_PARAMS.check_new_vault().is_err());

        let stronger = KdfParams::for_new_vault(256 * 1024, 6, 8).unwrap();
        assert_eq!(stronger.memory_kib(), 262_144);

        for (memory, iterations, parallelism) in [
            (V1_MEMORY_KIB - 1, V1_ITERATIONS, V1_PARALLELISM),
            (V1_MEMORY_KIB, V1_ITERATIONS - 1, V1_PARALLELISM),
            (V1_MEMORY_KIB, V1_ITERATIONS, V1_PARALLELISM - 1),
        ] {
            let result = KdfParams::for_new_vault(memory, iterations, parallelism);
            assert!(matches!(result, Err(VaultError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_derived_key_debug_redacts() {
        let key = derive_key(MASTER_KEY, PASSKEY, SALT, &fast()).unwrap();

        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));

        let key_hex = hex::encode(&key.as_bytes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
