//! Role catalog parsing for rolevault.
//!
//! Turns the IAM role reference (a markdown document with headers, include
//! directives and `{{ name }}` template variables) into a [`RoleTree`].
//!
//! # Architecture
//!
//! - [`variables`]: `{{ name }}` placeholder resolution against the presets YAML
//! - [`parser`]: header/include state machine building the tree
//! - [`tree`]: the tree itself, with merge-on-insert and a JSON form
//! - [`markup`]: lead-paragraph extraction for role description documents
//!
//! # Example
//!
//! ```
//! use rolevault_catalog::{Variables, parse_catalog};
//!
//! let vars = Variables::from_yaml("default:\n  service: Compute Cloud\n").unwrap();
//! let catalog = "## {{ service }}\n### compute.viewer\n{% include [v](../_roles/compute/viewer.md) %}\n";
//!
//! let tree = parse_catalog(catalog, &vars).unwrap();
//! let role = tree.get(&["Compute Cloud", "compute.viewer"]).unwrap();
//! assert_eq!(role.as_role().unwrap().path, "_roles/compute/viewer.md");
//! ```

pub mod markup;
pub mod parser;
pub mod tree;
pub mod variables;

pub use markup::{extract_description, lead_paragraph, strip_markup};
pub use parser::{CatalogParser, ParseError, Section, parse_catalog, splice_include};
pub use tree::{NodeKind, RoleEntry, RoleNode, RoleRef, RoleTree, TreeError};
pub use variables::{Variables, VariablesError};
