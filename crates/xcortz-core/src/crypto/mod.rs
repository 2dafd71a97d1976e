//! Cryptographic primitives for the vault.
//!
//! - **Argon2id**: memory-hard derivation of the vault key from the master key
//!   and passkey secret
//! - **AES-256-GCM**: authenticated sealing of the verification marker and the
//!   credential set
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault file alone, or of the passkey file alone
//! - Offline brute-force attacks on the master key
//! - Tampering with any sealed block
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory while a vault is unlocked

pub mod cipher;
pub mod key;
pub mod master_key;

pub use cipher::{
    open, seal, AuthenticatedCiphertext, AuthenticationError, NONCE_LENGTH, TAG_LENGTH,
};
pub use key::{derive_key, DerivedKey, KdfParams, KEY_LENGTH};
pub use master_key::{validate_master_key, MIN_MASTER_KEY_LENGTH};
