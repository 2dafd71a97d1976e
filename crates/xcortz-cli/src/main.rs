//! xcortz CLI - An offline password vault unlocked by two factors
//!
//! A master key the user remembers and a passkey file the user keeps apart
//! from the vault. This binary wraps the `xcortz-core` library with prompts,
//! file handling and terminal output.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod store;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xcortz_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{credentials, export, generate, init, misc, verify};
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);
        let (code, hint) = errors::classify(&e);
        print_error(&ui_ctx, &format!("{:#}", e), hint.as_deref());
        std::process::exit(code);
    }
}

/// Diagnostics go to stderr so they never mix with JSON on stdout.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("xcortz_core=debug,xcortz=debug")
    } else {
        EnvFilter::try_from_env(constants::env::LOG).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Verify) => {
            verify::handle_verify(ctx)?;
        }
        Some(Commands::List(args)) => {
            credentials::handle_list(ctx, args)?;
        }
        Some(Commands::Show(args)) => {
            credentials::handle_show(ctx, args)?;
        }
        Some(Commands::Add(args)) => {
            credentials::handle_add(ctx, args)?;
        }
        Some(Commands::Edit(args)) => {
            credentials::handle_edit(ctx, args)?;
        }
        Some(Commands::Delete(args)) => {
            credentials::handle_delete(ctx, args)?;
        }
        Some(Commands::Export(args)) => {
            export::handle_export(ctx, args)?;
        }
        Some(Commands::Generate(args)) => {
            generate::handle_generate(ctx, args)?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("xcortz {}", VERSION);
            println!();
            println!("Quickstart:");
            println!("  xcortz init                  Create a passkey and an empty vault");
            println!("  xcortz add --name mail       Store a credential");
            println!("  xcortz list                  List stored credentials");
            println!("  xcortz export ~/backup       Copy the vault for another device");
            println!();
            println!("Run `xcortz --help` for all commands.");
        }
    }
    Ok(())
}
