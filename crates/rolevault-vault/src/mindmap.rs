//! Mermaid `mindmap` rendering of the role tree.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rolevault_catalog::{NodeKind, RoleNode, RoleTree};

/// Escape text for use inside a quoted Mermaid label.
fn escape_label(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
        .replace('`', "'")
}

fn node_id(key: &str) -> String {
    key.replace('.', "_")
}

/// Render `tree` as a Mermaid mindmap.
///
/// Categories become plain labels, roles become rounded nodes with their
/// description as a child node. Children are indented two spaces per level.
/// The output has no trailing newline.
pub fn render_mindmap(tree: &RoleTree) -> String {
    fn render(level: &BTreeMap<String, RoleNode>, depth: usize, out: &mut String) {
        for (key, node) in level {
            let indent = "  ".repeat(depth);
            match &node.kind {
                NodeKind::Role(entry) => {
                    let id = node_id(key);
                    let _ = write!(out, "\n{indent}{id}(\"`{}`\")", escape_label(key));
                    if !entry.description.is_empty() {
                        let _ = write!(
                            out,
                            "\n{indent}  {id}_desc[\"`{}`\"]",
                            escape_label(&entry.description)
                        );
                    }
                }
                NodeKind::Category { .. } => {
                    let _ = write!(out, "\n{indent}{}", escape_label(key));
                }
            }
            render(&node.children, depth + 1, out);
        }
    }

    let mut out = String::from("mindmap");
    render(tree.roots(), 0, &mut out);
    out
}
