//! Random password generation.
//!
//! Characters are drawn uniformly from the union of the enabled character
//! sets using the operating system's CSPRNG.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;

use crate::error::{Result, VaultError};

/// Length used when none is given.
pub const DEFAULT_LENGTH: usize = 12;
/// Shortest password that can be generated.
pub const MIN_LENGTH: usize = 4;
/// Longest password that can be generated.
pub const MAX_LENGTH: usize = 128;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Which characters a generated password may contain, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl PasswordOptions {
    fn charset(&self) -> Vec<u8> {
        let mut charset = Vec::new();
        for (enabled, set) in [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, NUMBERS),
            (self.symbols, SYMBOLS),
        ] {
            if enabled {
                charset.extend_from_slice(set);
            }
        }
        charset
    }

    fn enabled_sets(&self) -> u32 {
        [self.uppercase, self.lowercase, self.numbers, self.symbols]
            .iter()
            .filter(|enabled| **enabled)
            .count() as u32
    }
}

/// Rough strength of the passwords a set of options produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Weak,
    Average,
    Strong,
}

impl Strength {
    pub fn label(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Average => "average",
            Strength::Strong => "strong",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Generate a random password.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` if the length is outside
/// `MIN_LENGTH..=MAX_LENGTH` or no character set is enabled.
///
/// # Example
///
/// ```
/// use xcortz_core::generator::{generate_password, PasswordOptions};
///
/// let options = PasswordOptions { length: 20, symbols: false, ..Default::default() };
/// let password = generate_password(&options).unwrap();
/// assert_eq!(password.len(), 20);
/// assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_password(options: &PasswordOptions) -> Result<String> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(VaultError::InvalidInput(format!(
            "Password length must be between {} and {} (got {})",
            MIN_LENGTH, MAX_LENGTH, options.length
        )));
    }

    let charset = options.charset();
    if charset.is_empty() {
        return Err(VaultError::InvalidInput(
            "At least one character set must be enabled".to_string(),
        ));
    }

    let mut rng = OsRng;
    let password: String = (0..options.length)
        .filter_map(|_| charset.choose(&mut rng).map(|&byte| char::from(byte)))
        .collect();

    tracing::trace!(length = options.length, "generated password");
    Ok(password)
}

/// Score the options: length counts for up to 2 points, each character set for 1.
pub fn assess_strength(options: &PasswordOptions) -> Strength {
    let mut score = options.enabled_sets();
    if options.length >= 12 {
        score += 2;
    } else if options.length >= 8 {
        score += 1;
    }

    match score {
        0..=3 => Strength::Weak,
        4..=5 => Strength::Average,
        _ => Strength::Strong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn only(uppercase: bool, lowercase: bool, numbers: bool, symbols: bool) -> PasswordOptions {
        PasswordOptions {
            length: DEFAULT_LENGTH,
            uppercase,
            lowercase,
            numbers,
            symbols,
        }
    }

    #[test]
    fn test_default_options() {
        let password = generate_password(&PasswordOptions::default()).unwrap();
        assert_eq!(password.len(), 12);
    }

    #[test]
    fn test_respects_charsets() {
        let digits = generate_password(&only(false, false, true, false)).unwrap();
        assert!(digits.chars().all(|c| c.is_ascii_digit()));

        let upper = generate_password(&only(true, false, false, false)).unwrap();
        assert!(upper.chars().all(|c| c.is_ascii_uppercase()));

        let symbols = generate_password(&only(false, false, false, true)).unwrap();
        assert!(symbols.bytes().all(|b| SYMBOLS.contains(&b)));
    }

    #[test]
    fn test_no_charset_rejected() {
        let result = generate_password(&only(false, false, false, false));
        assert!(matches!(result, Err(VaultError::InvalidInput(_))));
    }

    #[test]
    fn test_length_bounds() {
        let mut options = PasswordOptions::default();
        options.length = MIN_LENGTH - 1;
        assert!(generate_password(&options).is_err());
        options.length = MAX_LENGTH + 1;
        assert!(generate_password(&options).is_err());
        options.length = MAX_LENGTH;
        assert_eq!(generate_password(&options).unwrap().len(), MAX_LENGTH);
    }

    #[test]
    fn test_passwords_differ() {
        let options = PasswordOptions {
            length: 32,
            ..Default::default()
        };
        let first = generate_password(&options).unwrap();
        let second = generate_password(&options).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_strength_scoring() {
        assert_eq!(assess_strength(&PasswordOptions::default()), Strength::Strong);

        let mut options = only(true, true, false, false);
        assert_eq!(assess_strength(&options), Strength::Average);

        options.length = 8;
        assert_eq!(assess_strength(&options), Strength::Weak);

        let mut options = only(true, true, true, false);
        options.length = 8;
        assert_eq!(assess_strength(&options), Strength::Average);

        options.length = 4;
        assert_eq!(assess_strength(&options), Strength::Weak);
    }

    #[test]
    fn test_strength_label() {
        assert_eq!(Strength::Average.to_string(), "average");
    }

    proptest! {
        #[test]
        fn prop_length_matches(length in MIN_LENGTH..=MAX_LENGTH) {
            let options = PasswordOptions { length, ..Default::default() };
            let password = generate_password(&options).unwrap();
            prop_assert_eq!(password.chars().count(), length);
            prop_assert!(password.is_ascii());
        }
    }
}
