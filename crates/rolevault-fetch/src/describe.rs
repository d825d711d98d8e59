//! Role description fetching with parallel HTTP requests.
//!
//! Every role in the tree points at a document whose lead paragraph is the
//! role's description. Documents are fetched on the rayon thread pool;
//! a failure only affects its own role, which gets the "not found"
//! description instead.

use rayon::prelude::*;
use rolevault_catalog::{RoleTree, Variables, extract_description};
use tracing::{info, warn};

use crate::client::DocumentSource;
use crate::error::FetchError;

/// Settings for [`describe_roles`].
#[derive(Debug, Clone, Copy)]
pub struct DescribeOptions<'a> {
    /// Prefix joined with each role's source path to form its URL.
    pub base_url: &'a str,
    /// Description assigned to roles whose document could not be used.
    pub not_found: &'a str,
}

/// Why a role kept the "not found" description.
#[derive(Debug, thiserror::Error)]
pub enum DescribeError {
    /// The document could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The document had no readable paragraph.
    #[error("document has no readable paragraph")]
    Empty,
}

/// A role whose description could not be fetched.
#[derive(Debug)]
pub struct DescribeFailure {
    /// Source path of the role.
    pub path: String,
    /// What went wrong.
    pub error: DescribeError,
}

/// Outcome of a [`describe_roles`] run.
#[derive(Debug, Default)]
pub struct DescribeReport {
    /// Roles that received a fetched description.
    pub described: usize,
    /// Roles that were given the "not found" description.
    pub failures: Vec<DescribeFailure>,
}

/// Fetch one role document and extract its description.
fn describe_one(
    source: &dyn DocumentSource,
    variables: &Variables,
    url: &str,
) -> Result<String, DescribeError> {
    let document = source.fetch(url)?;
    extract_description(&document, variables).ok_or(DescribeError::Empty)
}

/// Replace every role's description with the one fetched from its document.
///
/// Roles are collected into a flat list and fetched in parallel. Failed
/// roles get `options.not_found`; the call returns once every role is done.
pub fn describe_roles(
    tree: &mut RoleTree,
    source: &dyn DocumentSource,
    variables: &Variables,
    options: &DescribeOptions<'_>,
) -> DescribeReport {
    let mut roles = tree.roles_mut();
    if roles.is_empty() {
        return DescribeReport::default();
    }

    let total = roles.len();
    let failures: Vec<DescribeFailure> = roles
        .par_iter_mut()
        .filter_map(|entry| {
            let url = format!("{}{}", options.base_url, entry.path);
            match describe_one(source, variables, &url) {
                Ok(description) => {
                    entry.description = description;
                    None
                }
                Err(error) => {
                    warn!(path = %entry.path, error = %error, "Role description unavailable");
                    entry.description = options.not_found.to_owned();
                    Some(DescribeFailure {
                        path: entry.path.clone(),
                        error,
                    })
                }
            }
        })
        .collect();

    let report = DescribeReport {
        described: total - failures.len(),
        failures,
    };
    info!(
        described = report.described,
        failed = report.failures.len(),
        "Fetched role descriptions"
    );
    report
}
