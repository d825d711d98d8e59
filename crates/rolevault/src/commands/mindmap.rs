//! `rolevault mindmap` command implementation.

use std::path::PathBuf;

use clap::Args;
use rolevault_catalog::RoleTree;
use rolevault_config::{CliSettings, Config};
use rolevault_fetch::HttpSource;
use rolevault_vault::render_mindmap;

use super::{describe_catalog, load_catalog};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the mindmap command.
#[derive(Args)]
pub(crate) struct MindmapArgs {
    /// Path to configuration file (default: auto-discover rolevault.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render a JSON role tree instead of fetching the catalog.
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Write the diagram to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip fetching role descriptions when reading the catalog.
    #[arg(long, conflicts_with = "tree")]
    no_descriptions: bool,
}

impl MindmapArgs {
    /// Execute the mindmap command.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be loaded or the diagram cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let tree = if let Some(path) = &self.tree {
            RoleTree::from_json_str(&std::fs::read_to_string(path)?)?
        } else {
            let config = Config::load(self.config.as_deref(), Some(&CliSettings::default()))?;
            let source = HttpSource::new(config.fetch.timeout());
            let mut catalog = load_catalog(&source, &config, &output)?;
            if !self.no_descriptions {
                describe_catalog(&mut catalog, &source, &config, &output);
            }
            catalog.tree
        };

        let diagram = render_mindmap(&tree);
        if let Some(path) = &self.output {
            std::fs::write(path, format!("{diagram}\n"))?;
            output.success(&format!("Mindmap written to {}", path.display()));
        } else {
            output.data(&diagram)?;
        }
        Ok(())
    }
}
