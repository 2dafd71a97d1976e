use xcortz_core::generator::{generate_password, PasswordOptions};
use xcortz_core::{
    add_credential, delete_credential, edit_credential, verify_and_decrypt, Credential,
    CredentialUpdate, NewCredential, VaultError,
};
use zeroize::Zeroizing;

use crate::app::AppContext;
use crate::cli::{AddArgs, DeleteArgs, EditArgs, ListArgs, ShowArgs};
use crate::errors::CliError;
use crate::helpers::read_secret;
use crate::store::write_vault;
use crate::ui::{badge, header, hint, kv, print, table, Badge, Column};

const MASK: &str = "********";

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let loaded = ctx.load()?;
    let credentials = ctx.unlock(&ui, |master_key| {
        verify_and_decrypt(master_key, &loaded.passkey, &loaded.vault)
    })?;

    if ui.mode.is_json() {
        let values: Vec<serde_json::Value> = credentials
            .iter()
            .map(|credential| credential_json(credential, args.show_secrets))
            .collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if credentials.is_empty() {
        if !ctx.quiet() {
            print(&ui, "No credentials stored.");
            print(&ui, &hint(&ui, "xcortz add --name <NAME> --generate"));
        }
        return Ok(());
    }

    let columns = [
        Column::new("ID"),
        Column::new("Name"),
        Column::new("Description"),
        Column::new("Secret"),
        Column::new("Updated"),
    ];
    let rows: Vec<Vec<String>> = credentials
        .iter()
        .map(|credential| {
            vec![
                credential.id.to_string(),
                credential.name.clone(),
                credential.description.clone(),
                if args.show_secrets {
                    credential.secret.clone()
                } else {
                    MASK.to_string()
                },
                credential.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    if !ctx.quiet() && ui.mode.is_pretty() {
        let count = format!("{} credentials", credentials.len());
        print(&ui, &header(&ui, "list", Some(&count)));
    }
    print(&ui, &table(&ui, &columns, &rows));
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let loaded = ctx.load()?;
    let credentials = ctx.unlock(&ui, |master_key| {
        verify_and_decrypt(master_key, &loaded.passkey, &loaded.vault)
    })?;
    let credential = credentials
        .get(args.id)
        .ok_or_else(|| CliError::from(VaultError::CredentialNotFound(args.id)))?;

    if ui.mode.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&credential_json(credential, true))?
        );
        return Ok(());
    }

    print(&ui, &kv(&ui, "ID", &credential.id.to_string()));
    print(&ui, &kv(&ui, "Name", &credential.name));
    print(&ui, &kv(&ui, "Description", &credential.description));
    print(&ui, &kv(&ui, "Secret", &credential.secret));
    print(&ui, &kv(&ui, "Created", &credential.created_at.to_rfc3339()));
    print(&ui, &kv(&ui, "Updated", &credential.updated_at.to_rfc3339()));
    Ok(())
}

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    if args.name.trim().is_empty() {
        return Err(CliError::invalid_input("--name cannot be empty").into());
    }
    let loaded = ctx.load()?;
    let secret = if args.generate {
        generated_secret(ctx, args.length)?
    } else {
        read_secret(args.secret.as_deref())?
    };
    let new = NewCredential::new(args.name.as_str(), args.description.as_str(), secret.as_str());

    let (credentials, vault) = ctx.unlock(&ui, |master_key| {
        add_credential(&loaded.vault, &loaded.passkey, master_key, new.clone())
    })?;
    write_vault(&loaded.vault_path, &vault)?;

    let id = credentials.iter().map(|c| c.id).max().unwrap_or_default();
    if !ctx.quiet() {
        print(&ui, &badge(&ui, Badge::Ok, &format!("Added credential {}", id)));
        if args.generate {
            print(&ui, &kv(&ui, "Secret", secret.as_str()));
        }
        print(&ui, &hint(&ui, &format!("xcortz show {}", id)));
    }
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: &EditArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let loaded = ctx.load()?;

    let mut update = CredentialUpdate::new();
    if let Some(name) = args.name.as_deref() {
        if name.trim().is_empty() {
            return Err(CliError::invalid_input("--name cannot be empty").into());
        }
        update = update.name(name);
    }
    if let Some(description) = args.description.as_deref() {
        update = update.description(description);
    }
    let generated = if args.generate {
        Some(generated_secret(ctx, args.length)?)
    } else {
        None
    };
    if let Some(secret) = generated.as_ref() {
        update = update.secret(secret.as_str());
    } else if let Some(secret) = args.secret.as_deref() {
        update = update.secret(read_secret(Some(secret))?.as_str());
    }

    let (_, vault) = ctx.unlock(&ui, |master_key| {
        edit_credential(
            &loaded.vault,
            &loaded.passkey,
            master_key,
            args.id,
            update.clone(),
        )
    })?;
    write_vault(&loaded.vault_path, &vault)?;

    if !ctx.quiet() {
        print(
            &ui,
            &badge(&ui, Badge::Ok, &format!("Updated credential {}", args.id)),
        );
        if let Some(secret) = generated.as_ref() {
            print(&ui, &kv(&ui, "Secret", secret.as_str()));
        }
    }
    Ok(())
}

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(false);
    let loaded = ctx.load()?;
    let (credentials, vault) = ctx.unlock(&ui, |master_key| {
        delete_credential(&loaded.vault, &loaded.passkey, master_key, args.id)
    })?;
    write_vault(&loaded.vault_path, &vault)?;

    if !ctx.quiet() {
        print(
            &ui,
            &badge(&ui, Badge::Ok, &format!("Deleted credential {}", args.id)),
        );
        print(&ui, &kv(&ui, "Remaining", &credentials.len().to_string()));
    }
    Ok(())
}

fn generated_secret(ctx: &AppContext, length: Option<usize>) -> anyhow::Result<Zeroizing<String>> {
    let mut options: PasswordOptions = ctx.config()?.generator.password_options();
    if let Some(length) = length {
        options.length = length;
    }
    let password = generate_password(&options).map_err(CliError::from)?;
    Ok(Zeroizing::new(password))
}

fn credential_json(credential: &Credential, include_secret: bool) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": credential.id,
        "name": credential.name,
        "description": credential.description,
        "created_at": credential.created_at,
        "updated_at": credential.updated_at,
    });
    if include_secret {
        value["password"] = serde_json::Value::String(credential.secret.clone());
    }
    value
}
