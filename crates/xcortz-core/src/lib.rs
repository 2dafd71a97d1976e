//! # xcortz Core
//!
//! Cryptographic vault engine for xcortz - an offline password vault unlocked by
//! two independently held secrets: a memorized master key and a random passkey file.
//!
//! The crate never touches the filesystem for vault state. Containers are passed
//! in and returned explicitly; persisting them is the caller's job.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and AES-256-GCM sealing
//! - **vault**: container types, JSON codec, vault creation, verification and
//!   credential mutations
//! - **generator**: random password generation and strength scoring
//!
//! ## Unlock protocol
//!
//! 1. Derive a key from `master key || passkey secret` with the vault's salt
//! 2. Open the verification block and compare it with the fixed marker
//! 3. Only then open the data block holding the credential set
//!
//! Every mutation repeats the full derivation and re-seals the whole credential
//! set under a fresh nonce.

pub mod crypto;
pub mod error;
pub mod generator;
pub mod vault;

pub use error::{Result, VaultError};
pub use generator::{assess_strength, generate_password, PasswordOptions, Strength};
pub use vault::{
    add_credential, bump_export_version, create_passkey, create_vault, create_vault_with_params,
    decrypt_credentials, delete_credential, edit_credential, encode_passkey, encode_vault,
    parse_passkey, parse_vault, verify, verify_and_decrypt, Credential, CredentialSet,
    CredentialUpdate, NewCredential, PasskeyContainer, VaultContainer,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
