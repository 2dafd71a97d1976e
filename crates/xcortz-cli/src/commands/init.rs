use secrecy::ExposeSecret;
use xcortz_core::crypto::{validate_master_key, KdfParams};
use xcortz_core::{create_passkey, create_vault_with_params};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::InitArgs;
use crate::config::{write_config, XcortzConfig};
use crate::errors::CliError;
use crate::helpers::prompt_init_master_key;
use crate::store::{ensure_writable, write_passkey, write_vault};
use crate::ui::{badge, blank_line, hint, kv, print, Badge, Spinner};

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let vault_path = ctx.vault_path()?;
    let passkey_path = ctx.passkey_path()?;
    if vault_path == passkey_path {
        return Err(CliError::invalid_input(
            "Vault and passkey must be stored in different files",
        )
        .into());
    }
    ensure_writable(&vault_path, args.force, "Vault")?;
    ensure_writable(&passkey_path, args.force, "Passkey")?;

    let params = kdf_params(args)?;
    let master_key = prompt_init_master_key()?;
    validate_master_key(master_key.expose_secret()).map_err(CliError::from)?;

    let passkey = create_passkey()?;
    let spinner = Spinner::start(&ui, "Deriving vault key");
    let vault = create_vault_with_params(master_key.expose_secret(), &passkey, params);
    spinner.finish();
    let vault = vault?;

    write_passkey(&passkey_path, &passkey)?;
    write_vault(&vault_path, &vault)?;
    tracing::info!(
        memory_kib = params.memory_kib(),
        iterations = params.iterations(),
        parallelism = params.parallelism(),
        "vault initialized"
    );

    let config_path = resolve_config_path()?;
    if !config_path.exists() {
        write_config(&config_path, &XcortzConfig::new(&vault_path, &passkey_path))?;
    }

    if !ctx.quiet() {
        print(&ui, &badge(&ui, Badge::Ok, "Created vault"));
        print(&ui, &kv(&ui, "Vault", &vault_path.display().to_string()));
        print(&ui, &kv(&ui, "Passkey", &passkey_path.display().to_string()));
        blank_line(&ui);
        print(
            &ui,
            &hint(
                &ui,
                "Keep the passkey apart from the vault. Both it and the master key are needed to unlock, and neither can be recovered.",
            ),
        );
    }
    Ok(())
}

fn kdf_params(args: &InitArgs) -> anyhow::Result<KdfParams> {
    let Some(memory_mib) = args.kdf_memory_mib else {
        return Ok(KdfParams::V1);
    };
    let memory_kib = memory_mib
        .checked_mul(1024)
        .ok_or_else(|| CliError::invalid_input("--kdf-memory-mib is too large"))?;
    let iterations = args.kdf_iterations.unwrap_or(KdfParams::V1.iterations());
    let parallelism = args.kdf_parallelism.unwrap_or(KdfParams::V1.parallelism());
    KdfParams::for_new_vault(memory_kib, iterations, parallelism)
        .map_err(|e| CliError::from(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(memory: Option<u32>, iterations: Option<u32>, parallelism: Option<u32>) -> InitArgs {
        InitArgs {
            force: false,
            kdf_memory_mib: memory,
            kdf_iterations: iterations,
            kdf_parallelism: parallelism,
        }
    }

    #[test]
    fn test_default_params() {
        assert_eq!(kdf_params(&args(None, None, None)).unwrap(), KdfParams::V1);
    }

    #[test]
    fn test_custom_params_in_mib() {
        let params = kdf_params(&args(Some(256), Some(6), Some(4))).unwrap();
        assert_eq!(params.memory_kib(), 262_144);
        assert_eq!(params.iterations(), 6);
    }

    #[test]
    fn test_params_below_default_rejected() {
        for weak in [
            args(Some(8), Some(1), Some(1)),
            args(Some(127), None, None),
            args(Some(128), Some(3), None),
            args(Some(128), Some(4), Some(3)),
        ] {
            let err = kdf_params(&weak).unwrap_err();
            let cli_err = err.downcast_ref::<CliError>().unwrap();
            assert!(matches!(cli_err, CliError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_out_of_range_params_rejected() {
        assert!(kdf_params(&args(Some(4), Some(1), Some(1))).is_err());
        assert!(kdf_params(&args(Some(1024), Some(17), Some(4))).is_err());
        assert!(kdf_params(&args(Some(u32::MAX), Some(1), Some(1))).is_err());
    }
}
