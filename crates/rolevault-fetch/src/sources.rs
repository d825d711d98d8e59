//! Primary catalog documents.

use rolevault_catalog::splice_include;
use rolevault_config::SourceConfig;
use tracing::info;

use crate::client::DocumentSource;
use crate::error::FetchError;

/// The three documents a catalog run starts from.
#[derive(Debug, Clone)]
pub struct CatalogSources {
    /// Role reference markdown.
    pub catalog: String,
    /// Presets YAML with template variables.
    pub presets: String,
    /// Primitive roles markdown fragment.
    pub primitive_roles: String,
}

impl CatalogSources {
    /// Catalog with the primitive roles fragment inlined at `marker`.
    #[must_use]
    pub fn spliced_catalog(&self, marker: &str) -> String {
        splice_include(&self.catalog, marker, &self.primitive_roles)
    }
}

/// Fetch the catalog, presets and primitive roles documents in parallel.
///
/// Any failure is fatal: the first error (in catalog, presets, primitive
/// roles order) is returned and nothing else is produced.
pub fn fetch_sources(
    source: &dyn DocumentSource,
    config: &SourceConfig,
) -> Result<CatalogSources, FetchError> {
    let (catalog, (presets, primitive_roles)) = rayon::join(
        || source.fetch(&config.catalog_url),
        || {
            rayon::join(
                || source.fetch(&config.presets_url),
                || source.fetch(&config.primitive_roles_url),
            )
        },
    );

    let sources = CatalogSources {
        catalog: catalog?,
        presets: presets?,
        primitive_roles: primitive_roles?,
    };
    info!(
        catalog_bytes = sources.catalog.len(),
        presets_bytes = sources.presets.len(),
        "Fetched catalog sources"
    );
    Ok(sources)
}
