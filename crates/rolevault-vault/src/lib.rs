//! Obsidian vault generation for the role catalog.
//!
//! A vault is built in two passes:
//!
//! 1. [`materialize`] wipes the output directory and writes one note per role
//!    and per dotted category prefix.
//! 2. [`relink`] rescans the directory and rewrites the parent and children
//!    link sections of every category note.
//!
//! [`write_graph_config`] then colours each service in Obsidian's graph view.
//! [`render_mindmap`] renders the same tree as a Mermaid diagram.
//!
//! # Example
//!
//! ```ignore
//! use rolevault_vault::{VaultLayout, materialize, relink, write_graph_config};
//!
//! let layout = VaultLayout::new("yc-obs-roles");
//! materialize(&tree, &layout, &labels)?;
//! relink(&layout, &labels)?;
//! write_graph_config(&layout, 0)?;
//! ```

mod error;
mod graph;
mod layout;
mod materialize;
mod mindmap;
mod notes;
mod relink;
mod scan;

pub use error::VaultError;
pub use graph::{PALETTE, write_graph_config};
pub use layout::{CATEGORIES_DIR, ROLES_DIR, ROOT_NOTE, VaultLayout, prefixes};
pub use materialize::{MaterializeReport, materialize};
pub use mindmap::render_mindmap;
pub use relink::{RelinkReport, relink};
pub use rolevault_config::LabelsConfig as Labels;
