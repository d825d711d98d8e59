//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod mindmap;
pub(crate) mod relink;
pub(crate) mod tree;
pub(crate) mod vault;

pub(crate) use build::BuildArgs;
pub(crate) use mindmap::MindmapArgs;
pub(crate) use relink::RelinkArgs;
pub(crate) use tree::TreeArgs;
pub(crate) use vault::VaultArgs;

use rolevault_catalog::{RoleTree, Variables, parse_catalog};
use rolevault_config::Config;
use rolevault_fetch::{DescribeOptions, DocumentSource, describe_roles, fetch_sources};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Parsed catalog with the variables its descriptions are resolved against.
pub(crate) struct Catalog {
    pub tree: RoleTree,
    pub variables: Variables,
}

/// Fetch the source documents and parse the role tree.
pub(crate) fn load_catalog(
    source: &dyn DocumentSource,
    config: &Config,
    output: &Output,
) -> Result<Catalog, CliError> {
    output.info("Fetching catalog sources...");
    let sources = fetch_sources(source, &config.source)?;

    let variables = Variables::from_yaml(&sources.presets)?;
    let catalog = sources.spliced_catalog(&config.source.primitive_include);
    debug!(bytes = catalog.len(), "Spliced primitive roles into catalog");
    let tree = parse_catalog(&catalog, &variables)?;

    output.info(&format!("Parsed {} roles", tree.role_count()));
    Ok(Catalog { tree, variables })
}

/// Replace role descriptions with the lead paragraphs of their documents.
pub(crate) fn describe_catalog(
    catalog: &mut Catalog,
    source: &dyn DocumentSource,
    config: &Config,
    output: &Output,
) {
    output.info("Fetching role descriptions...");
    let options = DescribeOptions {
        base_url: &config.source.base_url,
        not_found: &config.fetch.not_found,
    };
    let report = describe_roles(&mut catalog.tree, source, &catalog.variables, &options);

    if report.failures.is_empty() {
        output.info(&format!("Described {} roles", report.described));
    } else {
        output.warning(&format!(
            "Described {} roles, {} without description:",
            report.described,
            report.failures.len()
        ));
        for failure in &report.failures {
            output.info(&format!("  - {}: {}", failure.path, failure.error));
        }
    }
}
