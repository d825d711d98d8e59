//! Blocking HTTP document source.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::FetchError;

/// Something that can return the text of a document by URL.
///
/// Implementations must be shareable across the rayon pool.
pub trait DocumentSource: Send + Sync {
    /// Fetch the document at `url` as text.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// [`DocumentSource`] backed by a pooled `ureq` agent.
pub struct HttpSource {
    agent: Agent,
}

impl HttpSource {
    /// Create a source whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.agent.get(url).call().map_err(|source| FetchError::Http {
            url: url.to_owned(),
            source,
        })?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(FetchError::Status {
                url: url.to_owned(),
                status,
                body: error_body,
            });
        }

        let text = body.read_to_string().map_err(|source| FetchError::Body {
            url: url.to_owned(),
            source,
        })?;
        debug!(url, bytes = text.len(), "Fetched document");
        Ok(text)
    }
}
