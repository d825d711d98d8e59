//! rolevault CLI - IAM role catalog to Obsidian vault.
//!
//! Provides commands for:
//! - `build`: Fetch the catalog and generate the vault
//! - `tree`: Print the parsed role tree as JSON
//! - `relink`: Rewrite category links of an existing vault
//! - `mindmap`: Render the role tree as a Mermaid mindmap
//! - `vault`: Generate the vault from a saved JSON tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, MindmapArgs, RelinkArgs, TreeArgs, VaultArgs};
use output::Output;

/// rolevault - IAM role catalog to Obsidian vault.
#[derive(Parser)]
#[command(name = "rolevault", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the catalog and generate the vault.
    Build(BuildArgs),
    /// Print the parsed role tree as JSON.
    Tree(TreeArgs),
    /// Rewrite the category links of an existing vault.
    Relink(RelinkArgs),
    /// Render the role tree as a Mermaid mindmap.
    Mindmap(MindmapArgs),
    /// Generate the vault from a JSON tree file.
    Vault(VaultArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
        Commands::Relink(args) => args.execute(),
        Commands::Mindmap(args) => args.execute(),
        Commands::Vault(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
