//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use xcortz_core::VaultError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (vault file, passkey file, credential)
    NotFound { message: String, hint: String },

    /// Master key or passkey rejected
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// Vault or passkey content cannot be trusted
    Corrupted(String),

    /// Failure that says nothing about the files, such as an unavailable RNG
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, .. } => write!(f, "{}", message),
            CliError::AuthFailed { message, .. } => write!(f, "{}", message),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::Corrupted(message) => write!(f, "{}", message),
            CliError::General(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::Corrupted(_) => exit_codes::CORRUPTED,
            CliError::General(_) => exit_codes::GENERAL,
        }
    }

    /// Hint shown below the error message, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. } => Some(hint),
            CliError::AuthFailed { hint, .. } => hint.as_deref(),
            CliError::InvalidInput(_) | CliError::General(_) => None,
            CliError::Corrupted(_) => Some("The file may be damaged. Restore it from an exported copy."),
        }
    }
}

impl From<VaultError> for CliError {
    fn from(err: VaultError) -> Self {
        CliError::from(&err)
    }
}

impl From<&VaultError> for CliError {
    fn from(err: &VaultError) -> Self {
        match err {
            VaultError::CredentialVerification => CliError::auth_failed_with_hint(
                err.to_string(),
                "Check the master key and that --passkey points at the passkey created with this vault.",
            ),
            VaultError::CredentialNotFound(id) => CliError::not_found(
                format!("Credential {} not found", id),
                "Run `xcortz list` to see credential IDs.",
            ),
            VaultError::InvalidInput(_) => CliError::InvalidInput(err.to_string()),
            VaultError::VaultCorruption(_) | VaultError::MalformedContainer(_) => {
                CliError::Corrupted(err.to_string())
            }
            VaultError::Crypto(_) => CliError::General(err.to_string()),
        }
    }
}

/// Find the exit code and hint for an error chain.
///
/// `CliError` wins over `VaultError`; anything else exits with the general code.
pub fn classify(err: &anyhow::Error) -> (i32, Option<String>) {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return (cli_err.exit_code(), cli_err.hint().map(str::to_string));
    }
    if let Some(vault_err) = err.downcast_ref::<VaultError>() {
        let mapped = CliError::from(vault_err);
        return (mapped.exit_code(), mapped.hint().map(str::to_string));
    }
    (exit_codes::GENERAL, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_errors_map_to_exit_codes() {
        let cases = [
            (VaultError::CredentialVerification, exit_codes::AUTH_FAILED),
            (VaultError::CredentialNotFound(4), exit_codes::NOT_FOUND),
            (VaultError::InvalidInput("x".into()), exit_codes::INVALID_INPUT),
            (VaultError::VaultCorruption("x".into()), exit_codes::CORRUPTED),
            (VaultError::MalformedContainer("x".into()), exit_codes::CORRUPTED),
        ];
        for (err, code) in cases {
            let (exit, _) = classify(&anyhow::Error::new(err));
            assert_eq!(exit, code);
        }
    }

    #[test]
    fn test_crypto_failure_is_general_without_hint() {
        let (code, hint) = classify(&anyhow::Error::new(VaultError::Crypto("rng".into())));
        assert_eq!(code, exit_codes::GENERAL);
        assert!(hint.is_none());
    }

    #[test]
    fn test_cli_error_is_classified_first() {
        let err = anyhow::Error::new(CliError::not_found("missing", "run init"));
        let (code, hint) = classify(&err);
        assert_eq!(code, exit_codes::NOT_FOUND);
        assert_eq!(hint.as_deref(), Some("run init"));
    }

    #[test]
    fn test_other_errors_are_general() {
        let (code, hint) = classify(&anyhow::anyhow!("boom"));
        assert_eq!(code, exit_codes::GENERAL);
        assert!(hint.is_none());
    }

    #[test]
    fn test_not_found_message_names_id() {
        let err = CliError::from(VaultError::CredentialNotFound(7));
        assert_eq!(err.to_string(), "Credential 7 not found");
    }
}
