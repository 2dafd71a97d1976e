use xcortz_core::verify_and_decrypt;

use crate::app::AppContext;
use crate::ui::{badge, kv, print, Badge};

pub fn handle_verify(ctx: &AppContext) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let loaded = ctx.load()?;
    let credentials = ctx.unlock(&ui, |master_key| {
        verify_and_decrypt(master_key, &loaded.passkey, &loaded.vault)
    })?;

    if !ctx.quiet() {
        let kdf = loaded.vault.kdf;
        print(&ui, &badge(&ui, Badge::Ok, "Vault unlocked"));
        print(&ui, &kv(&ui, "File Version", &loaded.vault.file_version.to_string()));
        print(&ui, &kv(&ui, "Credentials", &credentials.len().to_string()));
        print(
            &ui,
            &kv(
                &ui,
                "Argon2id",
                &format!(
                    "{} MiB, {} iterations, {} lanes",
                    kdf.memory_kib() / 1024,
                    kdf.iterations(),
                    kdf.parallelism()
                ),
            ),
        );
    }
    Ok(())
}
