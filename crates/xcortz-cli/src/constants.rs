//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (also used by clap for usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure.
    pub const GENERAL: i32 = 1;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 2;

    /// Resource not found (vault file, passkey file, credential).
    pub const NOT_FOUND: i32 = 3;

    /// Master key and passkey do not unlock the vault.
    pub const AUTH_FAILED: i32 = 5;

    /// Vault data failed authentication or is malformed.
    pub const CORRUPTED: i32 = 6;
}

/// Name of the config directory under the XDG base directories.
pub const APP_DIR: &str = "xcortz";

/// Default file names inside the data directory.
pub const DEFAULT_VAULT_FILE: &str = "xcortz.vault";
pub const DEFAULT_PASSKEY_FILE: &str = "xcortz.passkey";

/// Environment variables read directly (flags read theirs through clap).
pub mod env {
    pub const MASTER_KEY: &str = "XCORTZ_MASTER_KEY";
    pub const CONFIG: &str = "XCORTZ_CONFIG";
    pub const LOG: &str = "XCORTZ_LOG";
}
