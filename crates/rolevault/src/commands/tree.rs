//! `rolevault tree` command implementation.

use std::path::PathBuf;

use clap::Args;
use rolevault_config::{CliSettings, Config};
use rolevault_fetch::HttpSource;

use super::{describe_catalog, load_catalog};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Path to configuration file (default: auto-discover rolevault.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep inline summaries instead of fetching role descriptions.
    #[arg(long)]
    no_descriptions: bool,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if a source document cannot be fetched or parsed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            timeout_secs: self.timeout,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let source = HttpSource::new(config.fetch.timeout());
        let mut catalog = load_catalog(&source, &config, &output)?;
        if !self.no_descriptions {
            describe_catalog(&mut catalog, &source, &config, &output);
        }

        output.data(&serde_json::to_string_pretty(&catalog.tree.to_json())?)?;
        Ok(())
    }
}
