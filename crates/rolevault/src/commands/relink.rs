//! `rolevault relink` command implementation.

use std::path::PathBuf;

use clap::Args;
use rolevault_config::Config;
use rolevault_vault::{VaultLayout, relink};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the relink command.
#[derive(Args)]
pub(crate) struct RelinkArgs {
    /// Vault directory generated by `rolevault build`.
    vault_dir: PathBuf,

    /// Path to configuration file (default: auto-discover rolevault.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RelinkArgs {
    /// Execute the relink command.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is not a vault or cannot be rewritten.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let layout = VaultLayout::new(&self.vault_dir);
        let report = relink(&layout, &config.vault_resolved.labels)?;

        output.success(&format!(
            "Relinked {} categories in {}",
            report.categories,
            self.vault_dir.display()
        ));
        Ok(())
    }
}
