//! Input helpers for the CLI.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::constants::env;
use crate::errors::CliError;

/// Master key from `XCORTZ_MASTER_KEY`, if set and non-empty.
pub fn master_key_from_env() -> Option<SecretString> {
    std::env::var(env::MASTER_KEY)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}

/// Prompt for the master key.
pub fn prompt_master_key(interactive: bool) -> anyhow::Result<SecretString> {
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No master key provided and no TTY available. Set {}.",
            env::MASTER_KEY
        ))
        .into());
    }
    Password::new()
        .with_prompt("Master key")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read master key: {}", e))
}

/// Prompt for a new master key with confirmation (for init), or read it from the environment.
pub fn prompt_init_master_key() -> anyhow::Result<SecretString> {
    if let Some(value) = master_key_from_env() {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(format!(
            "No master key provided and no TTY available. Set {}.",
            env::MASTER_KEY
        ))
        .into());
    }
    Password::new()
        .with_prompt("New master key")
        .with_confirmation("Confirm master key", "Master keys do not match")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read master key: {}", e))
}

/// Resolve the secret for a credential: explicit value, then TTY prompt, then stdin.
pub fn read_secret(explicit: Option<&str>) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = explicit {
        return non_empty_secret(value.to_string());
    }

    if io::stdin().is_terminal() {
        let secret = Password::new()
            .with_prompt("Secret")
            .with_confirmation("Confirm secret", "Secrets do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))?;
        return non_empty_secret(secret);
    }

    let mut buffer = Zeroizing::new(String::new());
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    non_empty_secret(trim_line_ending(&buffer).to_string())
}

fn non_empty_secret(value: String) -> anyhow::Result<Zeroizing<String>> {
    let value = Zeroizing::new(value);
    if value.is_empty() {
        return Err(CliError::invalid_input("Secret cannot be empty").into());
    }
    Ok(value)
}

/// Strip one trailing newline (`\n` or `\r\n`), keeping other whitespace.
fn trim_line_ending(value: &str) -> &str {
    value
        .strip_suffix("\r\n")
        .or_else(|| value.strip_suffix('\n'))
        .unwrap_or(value)
}
