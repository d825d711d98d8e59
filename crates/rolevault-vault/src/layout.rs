//! Directory layout of a generated vault.
//!
//! A dotted name `a.b.c` is placed under one directory per proper prefix,
//! each directory named by the full prefix:
//!
//! ```text
//! _categories/a.md
//! _categories/a/a.b.md
//! _roles/a/a.b/a.b.c.md
//! ```

use std::path::{Path, PathBuf};

/// Directory holding category notes.
pub const CATEGORIES_DIR: &str = "_categories";
/// Directory holding role notes.
pub const ROLES_DIR: &str = "_roles";
/// Name of the root category note (without extension).
pub const ROOT_NOTE: &str = "ROLES";

/// Paths inside a vault directory.
#[derive(Debug, Clone)]
pub struct VaultLayout {
    root: PathBuf,
}

impl VaultLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `_categories` directory.
    #[must_use]
    pub fn categories_dir(&self) -> PathBuf {
        self.root.join(CATEGORIES_DIR)
    }

    /// `_roles` directory.
    #[must_use]
    pub fn roles_dir(&self) -> PathBuf {
        self.root.join(ROLES_DIR)
    }

    /// `_categories/ROLES.md`.
    #[must_use]
    pub fn root_note(&self) -> PathBuf {
        self.categories_dir().join(format!("{ROOT_NOTE}.md"))
    }

    /// `.obsidian/graph.json`.
    #[must_use]
    pub fn graph_config(&self) -> PathBuf {
        self.root.join(".obsidian").join("graph.json")
    }

    /// Note path of the category with dotted name `name`.
    #[must_use]
    pub fn category_note(&self, name: &str) -> PathBuf {
        nested_note(self.categories_dir(), name)
    }

    /// Note path of the role with dotted name `name`.
    #[must_use]
    pub fn role_note(&self, name: &str) -> PathBuf {
        nested_note(self.roles_dir(), name)
    }
}

/// Proper dotted prefixes of `name`, shortest first.
///
/// `a.b.c` yields `a`, `a.b`. A name without dots has none.
pub fn prefixes(name: &str) -> Vec<&str> {
    name.match_indices('.').map(|(at, _)| &name[..at]).collect()
}

fn nested_note(base: PathBuf, name: &str) -> PathBuf {
    let mut path = base;
    for prefix in prefixes(name) {
        path.push(prefix);
    }
    path.push(format!("{name}.md"));
    path
}
