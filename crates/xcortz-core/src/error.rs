//! Error types for vault engine operations.
//!
//! Every failure inside the engine is reported as one of these kinds. Errors
//! from the underlying crypto and serialization libraries are mapped at the
//! call site and never cross the crate boundary.
//!
//! `CredentialVerification` deliberately carries no detail: a wrong master key,
//! a wrong passkey and a tampered verification block must be indistinguishable.

use thiserror::Error;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Caller-supplied parameters violate a precondition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The master key, passkey and vault do not authenticate together
    #[error("Invalid master key or passkey")]
    CredentialVerification,

    /// Authenticated vault content is not well-formed
    #[error("Vault corrupted: {0}")]
    VaultCorruption(String),

    /// Edit or delete referenced an id that is not in the credential set
    #[error("Credential not found: {0}")]
    CredentialNotFound(u64),

    /// A container failed to parse before any cryptography was attempted
    #[error("Malformed container: {0}")]
    MalformedContainer(String),

    /// A cryptographic primitive failed for a reason other than authentication
    #[error("Encryption error: {0}")]
    Crypto(String),
}

impl VaultError {
    /// Whether this error is a verification failure.
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, VaultError::CredentialVerification)
    }
}
