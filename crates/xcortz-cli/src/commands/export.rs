use std::path::{Path, PathBuf};

use xcortz_core::bump_export_version;

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::errors::CliError;
use crate::store::{ensure_writable, read_vault, write_vault};
use crate::ui::{badge, kv, print, Badge};

/// Write a copy of the vault with its file version incremented.
///
/// The local vault is rewritten with the same version so the two stay in step.
/// It is written before the copy, so a failed copy skips a file version
/// rather than leaving an export newer than the local vault.
/// Contents are not decrypted, so no master key is needed.
pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let vault_path = ctx.vault_path()?;
    let vault = read_vault(&vault_path)?;
    let exported = bump_export_version(&vault).map_err(CliError::from)?;

    let destination = export_destination(Path::new(&args.destination), exported.file_version);
    if destination == vault_path {
        return Err(CliError::invalid_input("Export destination is the vault itself").into());
    }
    ensure_writable(&destination, args.force, "Export")?;

    write_vault(&vault_path, &exported)?;
    write_vault(&destination, &exported)?;
    tracing::info!(
        file_version = exported.file_version,
        destination = %destination.display(),
        "vault exported"
    );

    if !ctx.quiet() {
        print(&ui, &badge(&ui, Badge::Ok, "Exported vault"));
        print(&ui, &kv(&ui, "File Version", &exported.file_version.to_string()));
        print(&ui, &kv(&ui, "Destination", &destination.display().to_string()));
    }
    Ok(())
}

fn export_destination(dest: &Path, file_version: u64) -> PathBuf {
    if dest.is_dir() {
        dest.join(format!("xcortz_{}.vault", file_version))
    } else {
        dest.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_destination_gets_versioned_name() {
        let dir = TempDir::new().unwrap();
        let dest = export_destination(dir.path(), 4);
        assert_eq!(dest, dir.path().join("xcortz_4.vault"));
    }

    #[test]
    fn test_file_destination_is_kept() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("backup.vault");
        assert_eq!(export_destination(&target, 4), target);
    }
}
