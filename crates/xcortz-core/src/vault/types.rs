//! Vault data model.
//!
//! These are the typed, validated forms of the containers. Their JSON shapes
//! live in `codec`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{AuthenticatedCiphertext, KdfParams};
use crate::error::{Result, VaultError};

/// Container format version written by this crate.
pub const FORMAT_VERSION: &str = "1.0";

/// Salt length in bytes (128 bits).
pub const SALT_LENGTH: usize = 16;

/// Passkey secret length in bytes (256 bits).
pub const PASSKEY_LENGTH: usize = 32;

/// File version of a freshly created vault.
pub const FIRST_FILE_VERSION: u64 = 1;

/// Plaintext sealed in every vault's verification block.
///
/// Changing this value invalidates every existing vault.
pub const VERIFICATION_MARKER: &[u8] = b"VAULT_VALID_v1";

/// The random secret held in a passkey file.
#[derive(Clone, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct PasskeySecret(pub(crate) [u8; PASSKEY_LENGTH]);

impl PasskeySecret {
    pub fn from_bytes(bytes: [u8; PASSKEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw secret bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; PASSKEY_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for PasskeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasskeySecret([REDACTED])")
    }
}

/// Second unlock factor, kept by the user in a separate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasskeyContainer {
    /// Format version (e.g., "1.0")
    pub version: String,

    /// High-entropy random secret
    pub secret: PasskeySecret,

    /// When this passkey was generated
    pub created_at: DateTime<Utc>,
}

/// The encrypted vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultContainer {
    /// Format version (e.g., "1.0")
    pub version: String,

    /// Export counter, starts at 1 and only ever increases
    pub file_version: u64,

    /// Argon2id parameters the vault key is derived with
    pub kdf: KdfParams,

    /// Derivation salt, fixed for the lifetime of the vault
    pub salt: [u8; SALT_LENGTH],

    /// Sealed verification marker
    pub verification: AuthenticatedCiphertext,

    /// Sealed JSON credential set
    pub data: AuthenticatedCiphertext,
}

impl VaultContainer {
    /// Return a copy of this vault with a new data block.
    ///
    /// Salt, verification block, parameters and file version are carried over.
    pub(crate) fn with_data(&self, data: AuthenticatedCiphertext) -> Self {
        Self {
            data,
            ..self.clone()
        }
    }
}

/// A stored credential.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct Credential {
    /// Identifier, unique within one vault and never reused
    pub id: u64,

    /// Display name (e.g., "mail")
    pub name: String,

    /// Free-form description
    pub description: String,

    /// The stored password
    #[serde(rename = "password")]
    pub secret: String,

    /// When this credential was added
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    /// Last time any field changed
    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("secret", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The decrypted contents of a vault's data block, in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CredentialSet(Vec<Credential>);

impl CredentialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Credential> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Credential] {
        &self.0
    }

    /// Find a credential by id.
    pub fn get(&self, id: u64) -> Option<&Credential> {
        self.0.iter().find(|credential| credential.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Credential> {
        self.0.iter_mut().find(|credential| credential.id == id)
    }

    /// The id the next added credential receives: highest existing id plus one.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` once the highest id is `u64::MAX`.
    pub fn next_id(&self) -> Result<u64> {
        self.0
            .iter()
            .map(|credential| credential.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| VaultError::InvalidInput("No credential ids left".to_string()))
    }

    /// Find the first id that appears more than once, if any.
    pub(crate) fn duplicate_id(&self) -> Option<u64> {
        let mut seen = std::collections::HashSet::with_capacity(self.0.len());
        self.0
            .iter()
            .map(|credential| credential.id)
            .find(|id| !seen.insert(*id))
    }

    pub(crate) fn push(&mut self, credential: Credential) {
        self.0.push(credential);
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&Credential) -> bool) {
        self.0.retain(keep);
    }
}

impl<'a> IntoIterator for &'a CredentialSet {
    type Item = &'a Credential;
    type IntoIter = std::slice::Iter<'a, Credential>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Fields for a credential about to be added.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct NewCredential {
    pub name: String,
    pub description: String,
    pub secret: String,
}

impl NewCredential {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// A partial update; `None` fields are left unchanged.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CredentialUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub secret: Option<String>,
}

impl CredentialUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Whether the update changes no field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.secret.is_none()
    }
}

impl std::fmt::Debug for CredentialUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialUpdate")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(id: u64) -> Credential {
        let now = Utc::now();
        Credential {
            id,
            name: format!("site-{}", id),
            description: "test".to_string(),
            secret: "hunter22".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_next_id_empty_set() {
        assert_eq!(CredentialSet::new().next_id().unwrap(), 1);
    }

    #[test]
    fn test_next_id_uses_max_not_len() {
        let mut set = CredentialSet::new();
        set.push(credential(7));
        set.push(credential(2));
        assert_eq!(set.len(), 2);
        assert_eq!(set.next_id().unwrap(), 8);
    }

    #[test]
    fn test_next_id_does_not_wrap() {
        let mut set = CredentialSet::new();
        set.push(credential(u64::MAX));
        assert!(matches!(set.next_id(), Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_id_detected() {
        let mut set = CredentialSet::new();
        set.push(credential(1));
        set.push(credential(2));
        assert_eq!(set.duplicate_id(), None);
        set.push(credential(1));
        assert_eq!(set.duplicate_id(), Some(1));
    }

    #[test]
    fn test_credential_wire_names() {
        let value = serde_json::to_value(credential(3)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["password"], "hunter22");
        assert!(value.get("secret").is_none());
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", credential(1));
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter22"));

        let update = CredentialUpdate::new().secret("hunter22");
        assert!(!format!("{:?}", update).contains("hunter22"));

        let passkey = PasskeySecret::from_bytes([0xAB; PASSKEY_LENGTH]);
        assert!(!format!("{:?}", passkey).contains("ab"));
    }

    #[test]
    fn test_update_builder() {
        assert!(CredentialUpdate::new().is_empty());
        let update = CredentialUpdate::new().name("mail").secret("p2");
        assert_eq!(update.name.as_deref(), Some("mail"));
        assert_eq!(update.description, None);
        assert_eq!(update.secret.as_deref(), Some("p2"));
        assert!(!update.is_empty());
    }
}
