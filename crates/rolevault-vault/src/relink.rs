//! Second pass of vault generation: parent and children links.
//!
//! Links are derived from the directory layout alone, so the pass can be
//! re-run against any vault, including one edited by hand between runs.

use std::collections::BTreeSet;
use std::fs;

use rolevault_config::LabelsConfig;
use tracing::info;

use crate::error::VaultError;
use crate::layout::{ROOT_NOTE, VaultLayout};
use crate::notes::{linked_category_note, preserved_header, root_note, write_note};
use crate::scan::{NoteRef, scan_notes};

/// Counts from a [`relink`] run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelinkReport {
    /// Category notes rewritten (excluding the root note).
    pub categories: usize,
    /// Top-level categories linked from the root note.
    pub root_subcategories: usize,
    /// Top-level roles linked from the root note.
    pub root_roles: usize,
}

/// Whether `child` is `name` plus exactly one more dotted segment.
fn is_direct_child(name: &str, child: &str) -> bool {
    child
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('.'))
}

/// Rewrite the link sections of every category note under `layout`.
///
/// The root note is regenerated in full. Other category notes keep the text
/// before their first `####` line and get fresh parent and children
/// sections. Running this twice produces identical files.
pub fn relink(layout: &VaultLayout, labels: &LabelsConfig) -> Result<RelinkReport, VaultError> {
    let categories_dir = layout.categories_dir();
    if !categories_dir.is_dir() {
        return Err(VaultError::NotAVault {
            path: layout.root().to_path_buf(),
        });
    }

    let categories: Vec<NoteRef> = scan_notes(&categories_dir)?
        .into_iter()
        .filter(|note| !(note.is_top_level() && note.stem == ROOT_NOTE))
        .collect();
    let roles = scan_notes(&layout.roles_dir())?;

    let root_subcategories: Vec<String> = categories
        .iter()
        .filter(|note| note.is_top_level())
        .map(|note| note.stem.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let root_roles: Vec<String> = roles
        .iter()
        .filter(|note| note.is_top_level() && !note.stem.contains('.'))
        .map(|note| note.stem.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    write_note(
        &layout.root_note(),
        &root_note(labels, &root_subcategories, &root_roles),
    )?;

    for category in &categories {
        let subcategories: BTreeSet<&str> = categories
            .iter()
            .filter(|other| is_direct_child(&category.stem, &other.stem))
            .map(|other| other.stem.as_str())
            .collect();

        // Roles of `<dirs>/<name>.md` live below `_roles/<dirs>/<name>/`.
        let mut role_dirs = category.dirs.clone();
        role_dirs.push(category.stem.clone());
        let child_roles: BTreeSet<&str> = roles
            .iter()
            .filter(|role| role.dirs.starts_with(&role_dirs))
            .filter(|role| is_direct_child(&category.stem, &role.stem))
            .map(|role| role.stem.as_str())
            .collect();

        let parent = category.dirs.last().map_or(ROOT_NOTE, String::as_str);

        let text = fs::read_to_string(&category.path)
            .map_err(|e| VaultError::io(&category.path, e))?;
        let updated = linked_category_note(
            labels,
            preserved_header(&text),
            parent,
            &to_owned_sorted(&subcategories),
            &to_owned_sorted(&child_roles),
        );
        write_note(&category.path, &updated)?;
    }

    let report = RelinkReport {
        categories: categories.len(),
        root_subcategories: root_subcategories.len(),
        root_roles: root_roles.len(),
    };
    info!(
        categories = report.categories,
        root_subcategories = report.root_subcategories,
        root_roles = report.root_roles,
        "Updated category links"
    );
    Ok(report)
}

fn to_owned_sorted(names: &BTreeSet<&str>) -> Vec<String> {
    names.iter().map(|&name| name.to_owned()).collect()
}
