//! In-memory document source for testing.
//!
//! Provides [`StaticSource`] for exercising fetch code without the network.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::Mutex;

use crate::client::DocumentSource;
use crate::error::FetchError;

/// Document source serving canned responses.
///
/// Unknown URLs answer with HTTP 404. URLs registered with
/// [`with_failure`](Self::with_failure) fail at the transport level.
///
/// # Example
///
/// ```ignore
/// use rolevault_fetch::{DocumentSource, StaticSource};
///
/// let source = StaticSource::new()
///     .with_document("https://docs.test/a.md", "Allows reading.")
///     .with_failure("https://docs.test/b.md");
///
/// assert!(source.fetch("https://docs.test/a.md").is_ok());
/// assert!(source.fetch("https://docs.test/b.md").is_err());
/// ```
#[derive(Debug, Default)]
pub struct StaticSource {
    documents: HashMap<String, String>,
    failures: HashSet<String>,
    requested: Mutex<Vec<String>>,
}

impl StaticSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    #[must_use]
    pub fn with_document(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// Fail requests for `url` with a connection error.
    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failures.insert(url.into());
        self
    }

    /// URLs requested so far, in completion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_owned());

        if self.failures.contains(url) {
            return Err(FetchError::Http {
                url: url.to_owned(),
                source: ureq::Error::Io(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "connection refused",
                )),
            });
        }

        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_owned(),
                status: 404,
                body: "Not Found".to_owned(),
            })
    }
}
