//! Vault containers and the operations on them.
//!
//! All functions here are pure with respect to storage: they take containers
//! and return new ones. Two concurrent writers against the same stored vault
//! must be serialized by the caller.

pub mod codec;
mod factory;
mod operations;
mod types;
mod verifier;

pub use codec::{encode_passkey, encode_vault, parse_passkey, parse_vault};
pub use factory::{create_passkey, create_vault, create_vault_with_params};
pub use operations::{add_credential, bump_export_version, delete_credential, edit_credential};
pub use types::{
    Credential, CredentialSet, CredentialUpdate, NewCredential, PasskeyContainer, PasskeySecret,
    VaultContainer, FIRST_FILE_VERSION, FORMAT_VERSION, PASSKEY_LENGTH, SALT_LENGTH,
    VERIFICATION_MARKER,
};
pub use verifier::{decrypt_credentials, verify, verify_and_decrypt};
