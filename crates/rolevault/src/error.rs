//! CLI error types.

use rolevault_catalog::{ParseError, TreeError, VariablesError};
use rolevault_config::ConfigError;
use rolevault_fetch::FetchError;
use rolevault_vault::VaultError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Variables(#[from] VariablesError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("{0}")]
    Vault(#[from] VaultError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
