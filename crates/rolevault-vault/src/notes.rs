//! Note text rendering and writing.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use rolevault_config::LabelsConfig;
use tracing::debug;

use crate::error::VaultError;
use crate::layout::ROOT_NOTE;

/// Title and body of a freshly generated category note.
pub(crate) fn category_note(labels: &LabelsConfig, name: &str) -> String {
    format!("# {}\n\n{name}\n\n", labels.category)
}

/// Role note with its parent link.
pub(crate) fn role_note(labels: &LabelsConfig, description: &str, parent: &str) -> String {
    let mut text = format!("# {}\n\n{description}\n\n", labels.role);
    push_parent(&mut text, labels, parent);
    text
}

/// Root note, optionally followed by its children sections.
pub(crate) fn root_note(labels: &LabelsConfig, subcategories: &[String], roles: &[String]) -> String {
    let mut text = format!("# {ROOT_NOTE}\n\n{}\n\n", labels.root_description);
    if subcategories.is_empty() && roles.is_empty() {
        return text;
    }

    let _ = writeln!(text, "\n#### {}", labels.children);
    if !subcategories.is_empty() {
        let _ = writeln!(text, "\n###### {}", labels.subcategories);
        push_links(&mut text, subcategories);
    }
    if !roles.is_empty() {
        let _ = writeln!(text, "\n###### {}", labels.roles);
        push_links(&mut text, roles);
    }
    text
}

/// Category note rebuilt from its preserved header and fresh links.
pub(crate) fn linked_category_note(
    labels: &LabelsConfig,
    header: &str,
    parent: &str,
    subcategories: &[String],
    roles: &[String],
) -> String {
    let mut text = format!("{header}\n\n");
    push_parent(&mut text, labels, parent);

    if subcategories.is_empty() && roles.is_empty() {
        return text;
    }

    let _ = write!(text, "\n\n#### {}\n\n", labels.children);
    if !subcategories.is_empty() {
        let _ = writeln!(text, "###### {}", labels.subcategories);
        push_links(&mut text, subcategories);
    }
    if !roles.is_empty() {
        let _ = writeln!(text, "###### {}", labels.roles);
        push_links(&mut text, roles);
    }
    text
}

/// Lines of `text` before its first link section, trailing blank lines
/// removed.
pub(crate) fn preserved_header(text: &str) -> &str {
    let end = text
        .split_inclusive('\n')
        .take_while(|line| !line.contains("####"))
        .map(str::len)
        .sum();
    text[..end].trim_end()
}

fn push_parent(text: &mut String, labels: &LabelsConfig, parent: &str) {
    let _ = write!(text, "\n#### {}\n\n- [[{parent}]]\n", labels.parents);
}

fn push_links(text: &mut String, names: &[String]) {
    for name in names {
        let _ = writeln!(text, "- [[{name}]]");
    }
}

/// Write a note, creating its parent directories.
pub(crate) fn write_note(path: &Path, content: &str) -> Result<(), VaultError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| VaultError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| VaultError::io(path, e))?;
    debug!(path = %path.display(), "Wrote note");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_note_layout() {
        let labels = LabelsConfig::default();
        assert_eq!(
            role_note(&labels, "Allows viewing.", "net"),
            "# Role\n\nAllows viewing.\n\n\n#### Parents\n\n- [[net]]\n"
        );
    }

    #[test]
    fn test_root_note_without_children() {
        let labels = LabelsConfig::default();
        assert_eq!(
            root_note(&labels, &[], &[]),
            "# ROLES\n\nRoot category for all roles\n\n"
        );
    }

    #[test]
    fn test_root_note_with_children() {
        let labels = LabelsConfig::default();
        let text = root_note(&labels, &["net".to_owned()], &["admin".to_owned()]);
        assert_eq!(
            text,
            "# ROLES\n\nRoot category for all roles\n\n\n#### Children\n\n###### Subcategories\n- [[net]]\n\n###### Roles\n- [[admin]]\n"
        );
    }

    #[test]
    fn test_linked_category_note_layout() {
        let labels = LabelsConfig::default();
        let text = linked_category_note(
            &labels,
            "# Category\n\nnet",
            "ROLES",
            &["net.lb".to_owned()],
            &["net.viewer".to_owned()],
        );
        assert_eq!(
            text,
            "# Category\n\nnet\n\n\n#### Parents\n\n- [[ROLES]]\n\n\n#### Children\n\n###### Subcategories\n- [[net.lb]]\n###### Roles\n- [[net.viewer]]\n"
        );
    }

    #[test]
    fn test_preserved_header_stops_at_link_section() {
        let text = "# Category\n\nnet\n\n\n#### Parents\n\n- [[ROLES]]\n";
        assert_eq!(preserved_header(text), "# Category\n\nnet");
        assert_eq!(preserved_header("# Category\n\nnet\n\n"), "# Category\n\nnet");
    }

    #[test]
    fn test_custom_labels() {
        let labels = LabelsConfig {
            role: "Роль".to_owned(),
            parents: "Родители".to_owned(),
            ..LabelsConfig::default()
        };
        assert_eq!(
            role_note(&labels, "Описание", "ROLES"),
            "# Роль\n\nОписание\n\n\n#### Родители\n\n- [[ROLES]]\n"
        );
    }
}
