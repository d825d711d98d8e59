//! Note discovery by filesystem walking.
//!
//! The link updater and graph writer work from what is on disk, not from a
//! role tree, so they can run against any previously generated vault.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::VaultError;

/// Markdown note found under `_categories` or `_roles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoteRef {
    /// Directory names between the scan root and the file.
    pub dirs: Vec<String>,
    /// File name without the `.md` extension.
    pub stem: String,
    /// Full path to the file.
    pub path: PathBuf,
}

impl NoteRef {
    /// Whether the note sits directly in the scan root.
    pub fn is_top_level(&self) -> bool {
        self.dirs.is_empty()
    }
}

/// Collect every `.md` file below `root`, shallowest directories first.
///
/// Hidden entries are skipped. A missing `root` yields no notes.
pub(crate) fn scan_notes(root: &Path) -> Result<Vec<NoteRef>, VaultError> {
    let mut notes = Vec::new();
    if root.is_dir() {
        scan_directory(root, &mut Vec::new(), &mut notes)?;
    }
    notes.sort_by(|a, b| (&a.dirs, &a.stem).cmp(&(&b.dirs, &b.stem)));
    Ok(notes)
}

fn scan_directory(
    dir_path: &Path,
    dirs: &mut Vec<String>,
    notes: &mut Vec<NoteRef>,
) -> Result<(), VaultError> {
    let entries = fs::read_dir(dir_path).map_err(|e| VaultError::io(dir_path, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| VaultError::io(dir_path, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            dirs.push(name);
            scan_directory(&path, dirs, notes)?;
            dirs.pop();
        } else if let Some(stem) = name.strip_suffix(".md") {
            notes.push(NoteRef {
                dirs: dirs.clone(),
                stem: stem.to_owned(),
                path,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_collects_nested_notes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("a.b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a.md"), "").unwrap();
        fs::write(nested.join("a.b.c.md"), "").unwrap();
        fs::write(nested.join("notes.txt"), "").unwrap();

        let notes = scan_notes(temp_dir.path()).unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].stem, "a");
        assert!(notes[0].is_top_level());
        assert_eq!(notes[1].stem, "a.b.c");
        assert_eq!(notes[1].dirs, vec!["a".to_owned(), "a.b".to_owned()]);
    }

    #[test]
    fn test_scan_lists_parent_before_nested() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("a.b.md"), "").unwrap();
        fs::write(temp_dir.path().join("a.md"), "").unwrap();
        fs::write(temp_dir.path().join("b.md"), "").unwrap();

        let stems: Vec<String> = scan_notes(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|note| note.stem)
            .collect();

        assert_eq!(stems, vec!["a", "b", "a.b"]);
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let hidden = temp_dir.path().join(".obsidian");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("workspace.md"), "").unwrap();
        fs::write(temp_dir.path().join(".draft.md"), "").unwrap();

        assert!(scan_notes(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let notes = scan_notes(&temp_dir.path().join("absent")).unwrap();
        assert!(notes.is_empty());
    }
}
