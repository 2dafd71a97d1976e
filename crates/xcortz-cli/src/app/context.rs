//! Application context for the xcortz CLI.
//!
//! Bundles CLI arguments with the lazily-loaded config file and the loading
//! of vault and passkey containers.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;
use xcortz_core::{PasskeyContainer, VaultContainer};

use crate::cli::Cli;
use crate::config::XcortzConfig;
use crate::store::{read_passkey, read_vault};
use crate::ui::{Spinner, UiContext};

use super::resolver::{load_config, resolve_passkey_path, resolve_vault_path};
use super::unlock::with_master_key;

/// Everything a command handler needs to touch the vault.
pub struct Loaded {
    pub vault_path: PathBuf,
    pub passkey: PasskeyContainer,
    pub vault: VaultContainer,
}

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<XcortzConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the config, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&XcortzConfig> {
        self.config.get_or_try_init(load_config)
    }

    pub fn vault_path(&self) -> anyhow::Result<PathBuf> {
        resolve_vault_path(self.cli.vault.as_deref(), self.config()?)
    }

    pub fn passkey_path(&self) -> anyhow::Result<PathBuf> {
        resolve_passkey_path(self.cli.passkey.as_deref(), self.config()?)
    }

    /// UI context honoring the global `--no-color`/`--ascii` flags.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    /// Read the vault and passkey files.
    pub fn load(&self) -> anyhow::Result<Loaded> {
        let vault_path = self.vault_path()?;
        let passkey_path = self.passkey_path()?;
        tracing::debug!(
            vault = %vault_path.display(),
            passkey = %passkey_path.display(),
            "loading containers"
        );

        let passkey = read_passkey(&passkey_path)?;
        let vault = read_vault(&vault_path)?;
        Ok(Loaded {
            vault_path,
            passkey,
            vault,
        })
    }

    /// Run a vault operation with the master key, showing a spinner while it runs.
    pub fn unlock<T>(
        &self,
        ui: &UiContext,
        mut op: impl FnMut(&str) -> xcortz_core::Result<T>,
    ) -> anyhow::Result<T> {
        with_master_key(|master_key| {
            let spinner = Spinner::start(ui, "Unlocking vault");
            let result = op(master_key);
            spinner.finish();
            result
        })
    }
}
