use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use xcortz_core::VERSION;

/// xcortz - An offline password vault unlocked by a master key and a passkey file
#[derive(Parser)]
#[command(name = "xcortz")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(long, global = true, env = "XCORTZ_VAULT")]
    pub vault: Option<String>,

    /// Path to the passkey file
    #[arg(long, global = true, env = "XCORTZ_PASSKEY")]
    pub passkey: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr (overrides XCORTZ_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols only
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite existing vault and passkey files
    #[arg(long)]
    pub force: bool,

    /// Argon2id memory cost in MiB (at least 128)
    #[arg(long, value_name = "MIB", requires_all = ["kdf_iterations", "kdf_parallelism"])]
    pub kdf_memory_mib: Option<u32>,

    /// Argon2id iterations (at least 4)
    #[arg(long, value_name = "N", requires = "kdf_memory_mib")]
    pub kdf_iterations: Option<u32>,

    /// Argon2id lanes (at least 4)
    #[arg(long, value_name = "N", requires = "kdf_memory_mib")]
    pub kdf_parallelism: Option<u32>,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Include secrets in the output
    #[arg(long)]
    pub show_secrets: bool,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
#[command(group(ArgGroup::new("secret_source").args(["secret", "generate"])))]
pub struct AddArgs {
    /// Credential name
    #[arg(long)]
    pub name: String,

    /// Credential description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Secret to store (otherwise prompted, or read from stdin)
    #[arg(long)]
    pub secret: Option<String>,

    /// Generate a random secret
    #[arg(long)]
    pub generate: bool,

    /// Length of the generated secret
    #[arg(long, value_name = "N", requires = "generate")]
    pub length: Option<usize>,
}

/// Arguments for the `edit` command
#[derive(Args)]
#[command(group(ArgGroup::new("secret_source").args(["secret", "generate"])))]
#[command(group(
    ArgGroup::new("fields")
        .args(["name", "description", "secret", "generate"])
        .required(true)
        .multiple(true)
))]
pub struct EditArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: u64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New secret
    #[arg(long)]
    pub secret: Option<String>,

    /// Replace the secret with a generated one
    #[arg(long)]
    pub generate: bool,

    /// Length of the generated secret
    #[arg(long, value_name = "N", requires = "generate")]
    pub length: Option<usize>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: u64,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Destination path for the exported vault
    #[arg(value_name = "DEST")]
    pub destination: String,

    /// Overwrite the destination if it exists
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `generate` command
#[derive(Args)]
pub struct GenerateArgs {
    /// Password length
    #[arg(long, value_name = "N")]
    pub length: Option<usize>,

    /// Exclude uppercase letters
    #[arg(long)]
    pub no_uppercase: bool,

    /// Exclude lowercase letters
    #[arg(long)]
    pub no_lowercase: bool,

    /// Exclude digits
    #[arg(long)]
    pub no_numbers: bool,

    /// Exclude symbols
    #[arg(long)]
    pub no_symbols: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new passkey and an empty vault
    Init(InitArgs),

    /// Check that the master key and passkey unlock the vault
    Verify,

    /// List stored credentials
    List(ListArgs),

    /// Show one credential, including its secret
    Show(ShowArgs),

    /// Add a credential
    Add(AddArgs),

    /// Change fields of a credential
    Edit(EditArgs),

    /// Delete a credential
    Delete(DeleteArgs),

    /// Copy the vault to DEST with an incremented file version
    Export(ExportArgs),

    /// Generate a random password
    Generate(GenerateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
