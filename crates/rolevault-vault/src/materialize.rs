//! First pass of vault generation: one note per role and per category
//! prefix.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use rolevault_catalog::{RoleEntry, RoleNode, RoleTree};
use rolevault_config::LabelsConfig;
use tracing::{info, warn};

use crate::error::VaultError;
use crate::layout::{ROOT_NOTE, VaultLayout, prefixes};
use crate::notes::{category_note, role_note, root_note, write_note};

/// Counts of notes written by [`materialize`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Distinct category notes written (excluding the root note).
    pub categories: usize,
    /// Role notes written.
    pub roles: usize,
    /// Roles skipped because their qualified name was unusable.
    pub skipped: usize,
}

/// Role paired with the dotted name it is filed under.
#[derive(Debug)]
pub(crate) struct QualifiedRole<'a> {
    /// Dotted qualified name.
    pub name: String,
    /// The role record.
    pub entry: &'a RoleEntry,
}

/// Dotted names of every role, in tree order.
///
/// A key that already contains a `.` is taken verbatim. Otherwise it is
/// prefixed with the qualified name of the nearest ancestor that has a
/// description of its own; header categories without one are transparent.
pub(crate) fn qualified_roles(tree: &RoleTree) -> Vec<QualifiedRole<'_>> {
    fn walk<'a>(
        level: &'a BTreeMap<String, RoleNode>,
        scope: Option<&str>,
        out: &mut Vec<QualifiedRole<'a>>,
    ) {
        for (key, node) in level {
            let qualified = match scope {
                Some(prefix) if !key.contains('.') => format!("{prefix}.{key}"),
                _ => key.clone(),
            };

            if let Some(entry) = node.as_role() {
                out.push(QualifiedRole {
                    name: qualified.clone(),
                    entry,
                });
            }

            if node.description().is_some() {
                walk(&node.children, Some(&qualified), out);
            } else {
                walk(&node.children, scope, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(tree.roots(), None, &mut out);
    out
}

/// Whether `name` can be filed: non-empty segments without path separators,
/// and no first segment colliding with the root note.
fn is_valid_name(name: &str) -> bool {
    name.split('.').next() != Some(ROOT_NOTE)
        && name
            .split('.')
            .all(|segment| !segment.is_empty() && !segment.contains(['/', '\\']))
}

/// Regenerate the vault from `tree`.
///
/// The output directory is removed and recreated, the root note is written,
/// then every role gets a role note plus one category note per dotted prefix.
/// Roles with unusable names are skipped with a warning.
pub fn materialize(
    tree: &RoleTree,
    layout: &VaultLayout,
    labels: &LabelsConfig,
) -> Result<MaterializeReport, VaultError> {
    let root = layout.root();
    if root.exists() {
        fs::remove_dir_all(root).map_err(|e| VaultError::io(root, e))?;
    }
    fs::create_dir_all(root).map_err(|e| VaultError::io(root, e))?;

    write_note(&layout.root_note(), &root_note(labels, &[], &[]))?;

    let mut report = MaterializeReport::default();
    let mut categories = BTreeSet::new();

    for role in qualified_roles(tree) {
        if !is_valid_name(&role.name) {
            warn!(name = %role.name, path = %role.entry.path, "Skipping role with unusable name");
            report.skipped += 1;
            continue;
        }

        let prefixes = prefixes(&role.name);
        for prefix in &prefixes {
            write_note(&layout.category_note(prefix), &category_note(labels, prefix))?;
            categories.insert((*prefix).to_owned());
        }

        let parent = prefixes.last().copied().unwrap_or(ROOT_NOTE);
        write_note(
            &layout.role_note(&role.name),
            &role_note(labels, &role.entry.description, parent),
        )?;
        report.roles += 1;
    }

    report.categories = categories.len();
    info!(
        roles = report.roles,
        categories = report.categories,
        skipped = report.skipped,
        output = %root.display(),
        "Materialized vault"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::scan::scan_notes;

    fn keys(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    fn role(description: &str, path: &str) -> RoleEntry {
        RoleEntry {
            description: description.to_owned(),
            path: path.to_owned(),
        }
    }

    fn names(tree: &RoleTree) -> Vec<String> {
        qualified_roles(tree).into_iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_dotted_keys_are_verbatim() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["Compute Cloud", "compute.viewer"]), role("", "a.md"));
        tree.insert_role(&keys(&["Primitive roles", "viewer"]), role("", "b.md"));

        assert_eq!(names(&tree), vec!["compute.viewer", "viewer"]);
    }

    #[test]
    fn test_plain_keys_take_named_ancestor_prefix() {
        let tree = RoleTree::from_json_str(
            r#"{"net": {"description": "Net category",
                        "viewer": {"description": "View", "path": "net/viewer.md"},
                        "lb": {"description": "LB", "path": "net/lb.md",
                               "admin": {"description": "", "path": "net/lb/admin.md"}}}}"#,
        )
        .unwrap();

        assert_eq!(names(&tree), vec!["net.lb", "net.lb.admin", "net.viewer"]);
    }

    #[test]
    fn test_materialize_three_segment_name() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = VaultLayout::new(temp_dir.path().join("vault"));
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["Service", "a.b.c"]), role("Does things.", "a/b/c.md"));

        let report = materialize(&tree, &layout, &LabelsConfig::default()).unwrap();

        assert_eq!(
            report,
            MaterializeReport {
                categories: 2,
                roles: 1,
                skipped: 0
            }
        );
        assert_eq!(
            fs::read_to_string(layout.category_note("a")).unwrap(),
            "# Category\n\na\n\n"
        );
        assert_eq!(
            fs::read_to_string(layout.category_note("a.b")).unwrap(),
            "# Category\n\na.b\n\n"
        );
        assert_eq!(
            fs::read_to_string(layout.role_note("a.b.c")).unwrap(),
            "# Role\n\nDoes things.\n\n\n#### Parents\n\n- [[a.b]]\n"
        );

        let categories = scan_notes(&layout.categories_dir()).unwrap();
        let stems: Vec<_> = categories.iter().map(|n| n.stem.as_str()).collect();
        assert_eq!(stems, vec!["ROLES", "a", "a.b"]);
        assert_eq!(scan_notes(&layout.roles_dir()).unwrap().len(), 1);
    }

    #[test]
    fn test_single_segment_role_links_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = VaultLayout::new(temp_dir.path());
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["Primitive roles", "viewer"]), role("Views.", "v.md"));

        materialize(&tree, &layout, &LabelsConfig::default()).unwrap();

        assert_eq!(
            fs::read_to_string(layout.role_note("viewer")).unwrap(),
            "# Role\n\nViews.\n\n\n#### Parents\n\n- [[ROLES]]\n"
        );
    }

    #[test]
    fn test_previous_output_is_removed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = VaultLayout::new(temp_dir.path().join("vault"));
        fs::create_dir_all(layout.roles_dir()).unwrap();
        fs::write(layout.roles_dir().join("stale.md"), "old").unwrap();

        materialize(&RoleTree::new(), &layout, &LabelsConfig::default()).unwrap();

        assert!(!layout.roles_dir().join("stale.md").exists());
        assert_eq!(
            fs::read_to_string(layout.root_note()).unwrap(),
            "# ROLES\n\nRoot category for all roles\n\n"
        );
    }

    #[test]
    fn test_unusable_names_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = VaultLayout::new(temp_dir.path());
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["S", "a..b"]), role("", "x.md"));
        tree.insert_role(&keys(&["S", "a.b/c"]), role("", "y.md"));
        tree.insert_role(&keys(&["S", "ok.role"]), role("", "z.md"));

        let report = materialize(&tree, &layout, &LabelsConfig::default()).unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(report.roles, 1);
        assert!(layout.role_note("ok.role").exists());
    }

    #[test]
    fn test_root_note_name_is_reserved() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = VaultLayout::new(temp_dir.path());
        let labels = LabelsConfig::default();
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["S", "ROLES.viewer"]), role("", "x.md"));
        tree.insert_role(&keys(&["S", "ROLES"]), role("", "y.md"));
        tree.insert_role(&keys(&["S", "vpc.admin"]), role("", "z.md"));

        let report = materialize(&tree, &layout, &labels).unwrap();

        assert_eq!(report.skipped, 2);
        assert_eq!(report.roles, 1);
        assert_eq!(
            fs::read_to_string(layout.root_note()).unwrap(),
            "# ROLES\n\nRoot category for all roles\n\n"
        );

        crate::relink::relink(&layout, &labels).unwrap();
        let root = fs::read_to_string(layout.root_note()).unwrap();
        assert!(root.ends_with("###### Subcategories\n- [[vpc]]\n"), "{root}");
    }
}
