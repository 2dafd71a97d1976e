//! Master key handling with retry logic.

use std::io::IsTerminal;

use secrecy::{ExposeSecret, SecretString};
use xcortz_core::VaultError;

use crate::errors::CliError;
use crate::helpers::{master_key_from_env, prompt_master_key};

const MAX_ATTEMPTS: u32 = 3;

/// Run `op` with the master key, prompting again after a verification failure.
///
/// A key from `XCORTZ_MASTER_KEY` gets exactly one attempt. Interactive
/// prompts get up to three; a wrong passkey is indistinguishable from a wrong
/// master key, so the passkey is never blamed specifically.
pub fn with_master_key<T>(
    mut op: impl FnMut(&str) -> xcortz_core::Result<T>,
) -> anyhow::Result<T> {
    if let Some(master_key) = master_key_from_env() {
        return Ok(op(master_key.expose_secret())?);
    }

    let interactive = std::io::stdin().is_terminal();
    let max_attempts = if interactive { MAX_ATTEMPTS } else { 1 };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let master_key: SecretString = prompt_master_key(interactive)?;
        match op(master_key.expose_secret()) {
            Ok(value) => return Ok(value),
            Err(VaultError::CredentialVerification) => {
                let remaining = max_attempts.saturating_sub(attempts);
                if remaining == 0 {
                    return Err(CliError::auth_failed_with_hint(
                        "Too many failed unlock attempts.",
                        "A lost master key or passkey cannot be recovered.",
                    )
                    .into());
                }
                eprintln!(
                    "Invalid master key or passkey. {} attempt{} remaining.",
                    remaining,
                    if remaining == 1 { "" } else { "s" }
                );
            }
            Err(err) => return Err(err.into()),
        }
    }
}
