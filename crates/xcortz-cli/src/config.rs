use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xcortz_core::generator::{PasswordOptions, DEFAULT_LENGTH};

use crate::constants::{APP_DIR, DEFAULT_PASSKEY_FILE, DEFAULT_VAULT_FILE};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct XcortzConfig {
    #[serde(default)]
    pub vault: VaultSection,
    #[serde(default)]
    pub passkey: PasskeySection,
    #[serde(default)]
    pub generator: GeneratorSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PasskeySection {
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for GeneratorSection {
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

impl GeneratorSection {
    pub fn password_options(&self) -> PasswordOptions {
        PasswordOptions {
            length: self.length,
            uppercase: self.uppercase,
            lowercase: self.lowercase,
            numbers: self.numbers,
            symbols: self.symbols,
        }
    }
}

impl XcortzConfig {
    pub fn new(vault_path: &Path, passkey_path: &Path) -> Self {
        Self {
            vault: VaultSection {
                path: Some(vault_path.to_string_lossy().to_string()),
            },
            passkey: PasskeySection {
                path: Some(passkey_path.to_string_lossy().to_string()),
            },
            generator: GeneratorSection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(DEFAULT_VAULT_FILE))
}

pub fn default_passkey_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join(DEFAULT_PASSKEY_FILE))
}

pub fn read_config(path: &Path) -> anyhow::Result<XcortzConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &XcortzConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".config").join(APP_DIR))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join(APP_DIR));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join(APP_DIR))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: XcortzConfig = toml::from_str("").unwrap();
        assert!(config.vault.path.is_none());
        assert!(config.passkey.path.is_none());
        assert_eq!(config.generator.length, DEFAULT_LENGTH);
        assert!(config.generator.symbols);
    }

    #[test]
    fn test_partial_generator_section() {
        let config: XcortzConfig =
            toml::from_str("[generator]\nlength = 24\nsymbols = false\n").unwrap();
        let options = config.generator.password_options();
        assert_eq!(options.length, 24);
        assert!(!options.symbols);
        assert!(options.uppercase);
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = XcortzConfig::new(Path::new("/tmp/a.vault"), Path::new("/tmp/a.passkey"));

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.vault.path.as_deref(), Some("/tmp/a.vault"));
        assert_eq!(loaded.passkey.path.as_deref(), Some("/tmp/a.passkey"));
    }
}
