//! `rolevault build` command implementation.

use std::path::PathBuf;

use clap::Args;
use rolevault_config::{CliSettings, Config};
use rolevault_fetch::HttpSource;

use super::vault::write_vault;
use super::{describe_catalog, load_catalog};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover rolevault.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides config). Removed before writing.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if a source document cannot be fetched or parsed,
    /// or the vault cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Using {}", path.display()));
        }

        let source = HttpSource::new(config.fetch.timeout());
        let mut catalog = load_catalog(&source, &config, &output)?;
        describe_catalog(&mut catalog, &source, &config, &output);

        output.highlight("Writing vault...");
        write_vault(&catalog.tree, &config.vault_resolved, &output)
    }
}
