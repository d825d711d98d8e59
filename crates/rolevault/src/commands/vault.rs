//! `rolevault vault` command implementation.

use std::path::PathBuf;

use clap::Args;
use rand::RngExt;
use rolevault_catalog::RoleTree;
use rolevault_config::{CliSettings, Config, VaultConfig};
use rolevault_vault::{PALETTE, VaultLayout, materialize, relink, write_graph_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the vault command.
#[derive(Args)]
pub(crate) struct VaultArgs {
    /// JSON role tree (as printed by `rolevault tree`).
    #[arg(short, long)]
    tree: PathBuf,

    /// Output directory (overrides config). Removed before writing.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rolevault.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl VaultArgs {
    /// Execute the vault command.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be read or the vault cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let tree = RoleTree::from_json_str(&std::fs::read_to_string(&self.tree)?)?;
        output.info(&format!(
            "Loaded {} roles from {}",
            tree.role_count(),
            self.tree.display()
        ));

        write_vault(&tree, &config.vault_resolved, &output)
    }
}

/// Materialize, relink and colour a vault from `tree`.
pub(crate) fn write_vault(
    tree: &RoleTree,
    vault: &VaultConfig,
    output: &Output,
) -> Result<(), CliError> {
    let layout = VaultLayout::new(&vault.output_dir);

    let written = materialize(tree, &layout, &vault.labels)?;
    if written.skipped > 0 {
        output.warning(&format!(
            "Skipped {} roles with unusable names",
            written.skipped
        ));
    }
    let linked = relink(&layout, &vault.labels)?;
    let services = write_graph_config(&layout, rand::rng().random_range(0..PALETTE.len()))?;

    output.success(&format!(
        "Vault written to {}: {} roles, {} categories, {} services",
        vault.output_dir.display(),
        written.roles,
        linked.categories,
        services
    ));
    Ok(())
}
