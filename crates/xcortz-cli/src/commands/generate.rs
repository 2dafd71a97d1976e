use xcortz_core::{assess_strength, generate_password, PasswordOptions};

use crate::app::AppContext;
use crate::cli::GenerateArgs;
use crate::errors::CliError;
use crate::ui::{badge, print, Badge};

pub fn handle_generate(ctx: &AppContext, args: &GenerateArgs) -> anyhow::Result<()> {
    let ui = ctx.ui_context(args.json);
    let options = password_options(ctx.config()?.generator.password_options(), args);
    let password = zeroize::Zeroizing::new(generate_password(&options).map_err(CliError::from)?);
    let strength = assess_strength(&options);

    if ui.mode.is_json() {
        let value = serde_json::json!({
            "password": password.as_str(),
            "length": options.length,
            "strength": strength.label(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", password.as_str());
    if !ctx.quiet() {
        print(
            &ui,
            &badge(
                &ui,
                Badge::for_strength(strength),
                &format!("{} password", strength),
            ),
        );
    }
    Ok(())
}

/// Apply command line overrides on top of the configured generator defaults.
fn password_options(mut options: PasswordOptions, args: &GenerateArgs) -> PasswordOptions {
    if let Some(length) = args.length {
        options.length = length;
    }
    if args.no_uppercase {
        options.uppercase = false;
    }
    if args.no_lowercase {
        options.lowercase = false;
    }
    if args.no_numbers {
        options.numbers = false;
    }
    if args.no_symbols {
        options.symbols = false;
    }
    options
}
