//! Error types for document retrieval.

/// Error fetching a single document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("request to {url} failed")]
    Http {
        /// Requested URL.
        url: String,
        /// Transport error.
        #[source]
        source: ureq::Error,
    },

    /// Server returned an error status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Response body could not be read as text.
    #[error("failed to read response body from {url}")]
    Body {
        /// Requested URL.
        url: String,
        /// Read error.
        #[source]
        source: ureq::Error,
    },
}

impl FetchError {
    /// URL of the failed request.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::Status { url, .. } | Self::Body { url, .. } => url,
        }
    }
}
