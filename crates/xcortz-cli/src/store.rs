//! Loading and persisting passkey and vault files.
//!
//! Files are replaced atomically: contents go to a temp file in the same
//! directory, which is synced and then renamed over the destination. Both
//! files are created with 0600 permissions on Unix.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use xcortz_core::{PasskeyContainer, VaultContainer};

use crate::errors::CliError;

/// Read and parse a passkey file.
pub fn read_passkey(path: &Path) -> anyhow::Result<PasskeyContainer> {
    let contents = read_existing(path, "passkey")?;
    Ok(xcortz_core::parse_passkey(&contents)?)
}

/// Read and parse a vault file.
pub fn read_vault(path: &Path) -> anyhow::Result<VaultContainer> {
    let contents = read_existing(path, "vault")?;
    Ok(xcortz_core::parse_vault(&contents)?)
}

/// Replace a vault file with `vault`.
pub fn write_vault(path: &Path, vault: &VaultContainer) -> anyhow::Result<()> {
    let contents = xcortz_core::encode_vault(vault)?;
    write_atomic(path, contents.as_bytes())
}

/// Replace a passkey file with `passkey`.
pub fn write_passkey(path: &Path, passkey: &PasskeyContainer) -> anyhow::Result<()> {
    let contents = zeroize::Zeroizing::new(xcortz_core::encode_passkey(passkey)?);
    write_atomic(path, contents.as_bytes())
}

/// Fail if `path` exists and overwriting was not requested.
pub fn ensure_writable(path: &Path, force: bool, what: &str) -> anyhow::Result<()> {
    if path.exists() && !force {
        return Err(CliError::invalid_input(format!(
            "{} file already exists: {} (use --force to overwrite)",
            what,
            path.display()
        ))
        .into());
    }
    Ok(())
}

fn read_existing(path: &Path, what: &str) -> anyhow::Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(CliError::not_found(
            format!("No {} found at {}", what, path.display()),
            format!(
                "Run `xcortz init` to create one, or point --{} at an existing file.",
                what
            ),
        )
        .into()),
        Err(err) => Err(anyhow::anyhow!(
            "Failed to read {} {}: {}",
            what,
            path.display(),
            err
        )),
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", filename, nanos));

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(&temp_path)
        .map_err(|e| anyhow::anyhow!("Temp file create failed: {}", e))?;

    let written = file.write_all(data).and_then(|_| file.sync_all());
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(anyhow::anyhow!("Temp file write failed: {}", err));
    }
    drop(file);

    rename_with_fallback(&temp_path, path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "file written");
    Ok(())
}

/// Rename `temp_path` over `destination`, removing the destination first if
/// the platform refuses to rename onto an existing file.
fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }
    Ok(())
}
