//! Error types for vault generation.

use std::io;
use std::path::{Path, PathBuf};

/// Error writing or rescanning a vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Directory does not contain a generated vault.
    #[error("not a vault (missing {}): {}", crate::layout::CATEGORIES_DIR, path.display())]
    NotAVault {
        /// Directory that was expected to hold the vault.
        path: PathBuf,
    },

    /// Graph settings could not be serialized.
    #[error("failed to serialize graph settings: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// Wrap an I/O error with the path it happened at.
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
