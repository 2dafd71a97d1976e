//! Master key validation.
//!
//! The length floor is a usability guard. The passkey file carries the entropy.

use crate::error::{Result, VaultError};

/// Minimum master key length in characters.
pub const MIN_MASTER_KEY_LENGTH: usize = 8;

/// Validate that a master key meets the minimum length.
///
/// Length is counted in characters, not bytes, so a master key of eight
/// non-ASCII characters is accepted.
///
/// # Examples
///
/// ```
/// use xcortz_core::crypto::validate_master_key;
///
/// assert!(validate_master_key("longmasterkey").is_ok());
/// assert!(validate_master_key("short").is_err());
/// ```
pub fn validate_master_key(master_key: &str) -> Result<()> {
    let length = master_key.chars().count();
    if length < MIN_MASTER_KEY_LENGTH {
        return Err(VaultError::InvalidInput(format!(
            "Master key must be at least {} characters",
            MIN_MASTER_KEY_LENGTH
        )));
    }
    Ok(())
}
