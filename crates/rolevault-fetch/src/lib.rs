//! HTTP retrieval for the role catalog.
//!
//! This crate fetches the three source documents a run starts from
//! (catalog, presets, primitive roles) and the per-role documents whose
//! lead paragraphs become role descriptions.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use rolevault_fetch::{DescribeOptions, HttpSource, describe_roles, fetch_sources};
//!
//! let source = HttpSource::new(Duration::from_secs(30));
//! let sources = fetch_sources(&source, &config.source)?;
//! let report = describe_roles(&mut tree, &source, &variables, &DescribeOptions {
//!     base_url: &config.source.base_url,
//!     not_found: &config.fetch.not_found,
//! });
//! ```

mod client;
mod describe;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod sources;

pub use client::{DocumentSource, HttpSource};
pub use describe::{
    DescribeError, DescribeFailure, DescribeOptions, DescribeReport, describe_roles,
};
pub use error::FetchError;
#[cfg(any(test, feature = "mock"))]
pub use mock::StaticSource;
pub use sources::{CatalogSources, fetch_sources};
