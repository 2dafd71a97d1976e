//! Path resolution for config, vault and passkey files.

use std::path::PathBuf;

use crate::config::{
    default_config_path, default_passkey_path, default_vault_path, read_config, XcortzConfig,
};
use crate::constants::env;

/// Resolve the config file path, checking XCORTZ_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config file, or defaults if there is none.
pub fn load_config() -> anyhow::Result<XcortzConfig> {
    let path = resolve_config_path()?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(XcortzConfig::default());
    }
    read_config(&path)
}

/// Flag (or its env var), then config, then the XDG data directory.
pub fn resolve_vault_path(flag: Option<&str>, config: &XcortzConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.vault.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_vault_path()
}

/// Same order as [`resolve_vault_path`].
pub fn resolve_passkey_path(flag: Option<&str>, config: &XcortzConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.passkey.path.as_deref() {
        return Ok(PathBuf::from(path));
    }
    default_passkey_path()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_flag_wins_over_config() {
        let config = XcortzConfig::new(Path::new("/cfg/v.vault"), Path::new("/cfg/p.passkey"));
        let vault = resolve_vault_path(Some("/flag/v.vault"), &config).unwrap();
        assert_eq!(vault, PathBuf::from("/flag/v.vault"));

        let passkey = resolve_passkey_path(None, &config).unwrap();
        assert_eq!(passkey, PathBuf::from("/cfg/p.passkey"));
    }
}
