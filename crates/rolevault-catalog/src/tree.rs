//! Role tree built from the catalog.
//!
//! Every node carries a tagged record ([`NodeKind`]) and a map of children.
//! Roles are identified by their record, never by position: a role may sit at
//! any depth and may itself have children when the catalog nests role
//! headers.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Reserved JSON key holding a node's description.
const DESCRIPTION_KEY: &str = "description";
/// Reserved JSON key holding a role's source path. Its presence marks a role.
const PATH_KEY: &str = "path";

/// A concrete role record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    /// Inline summary from the catalog, replaced by the fetched description.
    pub description: String,
    /// Source-relative path of the document describing the role.
    pub path: String,
}

impl RoleEntry {
    /// Create a role record with an empty description.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            description: String::new(),
            path: path.into(),
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Grouping node. The parser never sets a description; hand-built trees may.
    Category {
        /// Optional description of the grouping.
        description: Option<String>,
    },
    /// Role leaf.
    Role(RoleEntry),
}

/// Node of the role tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleNode {
    /// The node's own record.
    pub kind: NodeKind,
    /// Children keyed by name.
    pub children: BTreeMap<String, RoleNode>,
}

impl RoleNode {
    /// Empty category node.
    #[must_use]
    pub fn category() -> Self {
        Self {
            kind: NodeKind::Category { description: None },
            children: BTreeMap::new(),
        }
    }

    /// Role node without children.
    #[must_use]
    pub fn role(entry: RoleEntry) -> Self {
        Self {
            kind: NodeKind::Role(entry),
            children: BTreeMap::new(),
        }
    }

    /// Role record, if this node is a role.
    #[must_use]
    pub fn as_role(&self) -> Option<&RoleEntry> {
        match &self.kind {
            NodeKind::Role(entry) => Some(entry),
            NodeKind::Category { .. } => None,
        }
    }

    /// Whether this node is a role.
    #[must_use]
    pub fn is_role(&self) -> bool {
        matches!(self.kind, NodeKind::Role(_))
    }

    /// The node's own description: a role's description or a category's
    /// optional one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Role(entry) => Some(&entry.description),
            NodeKind::Category { description } => description.as_deref(),
        }
    }
}

/// Error converting a JSON document into a [`RoleTree`].
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A node has an unexpected shape.
    #[error("invalid node at '{path}': {reason}")]
    InvalidNode {
        /// Slash-separated key path of the node (empty for the root).
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// Input is not valid JSON.
    #[error("invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Role with its key path from the tree root.
#[derive(Debug, Clone, Copy)]
pub struct RoleRef<'a> {
    /// Keys from the root down to and including the role's own key.
    pub keys: &'a [String],
    /// The role record.
    pub entry: &'a RoleEntry,
}

/// Nested tree of categories and roles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleTree {
    roots: BTreeMap<String, RoleNode>,
}

impl RoleTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level nodes keyed by name.
    #[must_use]
    pub fn roots(&self) -> &BTreeMap<String, RoleNode> {
        &self.roots
    }

    /// Whether the tree has no nodes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Add a top-level node, replacing any node with the same name.
    pub fn insert_root(&mut self, name: impl Into<String>, node: RoleNode) {
        self.roots.insert(name.into(), node);
    }

    /// Node at the given key path.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, keys: &[S]) -> Option<&RoleNode> {
        let (first, rest) = keys.split_first()?;
        let mut node = self.roots.get(first.as_ref())?;
        for key in rest {
            node = node.children.get(key.as_ref())?;
        }
        Some(node)
    }

    fn get_mut<S: AsRef<str>>(&mut self, keys: &[S]) -> Option<&mut RoleNode> {
        let (first, rest) = keys.split_first()?;
        let mut node = self.roots.get_mut(first.as_ref())?;
        for key in rest {
            node = node.children.get_mut(key.as_ref())?;
        }
        Some(node)
    }

    /// Insert a role at `keys`, merging into whatever is already there.
    ///
    /// Missing intermediate nodes are created as categories. An existing
    /// node at the target keeps its children; only its record is replaced.
    /// An empty key path is ignored.
    pub fn insert_role(&mut self, keys: &[String], entry: RoleEntry) {
        let Some((name, parents)) = keys.split_last() else {
            return;
        };

        let mut level = &mut self.roots;
        for key in parents {
            level = &mut level
                .entry(key.clone())
                .or_insert_with(RoleNode::category)
                .children;
        }

        level
            .entry(name.clone())
            .or_insert_with(RoleNode::category)
            .kind = NodeKind::Role(entry);
    }

    /// Set the description of the role at `keys`.
    ///
    /// Returns `false` if there is no role at that path.
    pub fn set_description<S: AsRef<str>>(&mut self, keys: &[S], description: String) -> bool {
        match self.get_mut(keys).map(|node| &mut node.kind) {
            Some(NodeKind::Role(entry)) => {
                entry.description = description;
                true
            }
            _ => false,
        }
    }

    /// Number of role nodes in the tree.
    #[must_use]
    pub fn role_count(&self) -> usize {
        let mut count = 0;
        self.walk_roles(|_| count += 1);
        count
    }

    /// Visit every role in key order, depth first.
    pub fn walk_roles(&self, mut visit: impl FnMut(RoleRef<'_>)) {
        fn walk(
            level: &BTreeMap<String, RoleNode>,
            keys: &mut Vec<String>,
            visit: &mut dyn FnMut(RoleRef<'_>),
        ) {
            for (name, node) in level {
                keys.push(name.clone());
                if let NodeKind::Role(entry) = &node.kind {
                    visit(RoleRef {
                        keys: &keys[..],
                        entry,
                    });
                }
                walk(&node.children, keys, visit);
                keys.pop();
            }
        }

        walk(&self.roots, &mut Vec::new(), &mut visit);
    }

    /// Mutable handles to every role record, flattened.
    ///
    /// The handles are disjoint, so they can be processed in parallel.
    pub fn roles_mut(&mut self) -> Vec<&mut RoleEntry> {
        fn collect<'a>(
            level: &'a mut BTreeMap<String, RoleNode>,
            out: &mut Vec<&'a mut RoleEntry>,
        ) {
            for node in level.values_mut() {
                let RoleNode { kind, children } = node;
                if let NodeKind::Role(entry) = kind {
                    out.push(entry);
                }
                collect(children, out);
            }
        }

        let mut out = Vec::new();
        collect(&mut self.roots, &mut out);
        out
    }

    /// Convert to the nested JSON form.
    ///
    /// A node becomes an object holding `description`/`path` for its record
    /// and one entry per child.
    #[must_use]
    pub fn to_json(&self) -> Value {
        fn level_to_json(level: &BTreeMap<String, RoleNode>) -> Map<String, Value> {
            level
                .iter()
                .map(|(name, node)| (name.clone(), Value::Object(node_to_json(node))))
                .collect()
        }

        fn node_to_json(node: &RoleNode) -> Map<String, Value> {
            let mut object = level_to_json(&node.children);
            match &node.kind {
                NodeKind::Role(entry) => {
                    object.insert(DESCRIPTION_KEY.to_owned(), entry.description.clone().into());
                    object.insert(PATH_KEY.to_owned(), entry.path.clone().into());
                }
                NodeKind::Category {
                    description: Some(description),
                } => {
                    object.insert(DESCRIPTION_KEY.to_owned(), description.clone().into());
                }
                NodeKind::Category { description: None } => {}
            }
            object
        }

        Value::Object(level_to_json(&self.roots))
    }

    /// Build a tree from its nested JSON form.
    ///
    /// A node with a `path` key is a role (a missing `description` defaults to
    /// empty); other nodes are categories. Every non-reserved key must map to
    /// an object.
    pub fn from_json(value: &Value) -> Result<Self, TreeError> {
        let object = value.as_object().ok_or(TreeError::InvalidNode {
            path: String::new(),
            reason: "tree root must be an object",
        })?;
        let mut keys = Vec::new();
        let roots = children_from_json(object, &mut keys)?;
        Ok(Self { roots })
    }

    /// Parse a tree from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, TreeError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json(&value)
    }
}

fn children_from_json(
    object: &Map<String, Value>,
    keys: &mut Vec<String>,
) -> Result<BTreeMap<String, RoleNode>, TreeError> {
    let mut children = BTreeMap::new();
    for (name, value) in object {
        if name == DESCRIPTION_KEY || name == PATH_KEY {
            continue;
        }
        keys.push(name.clone());
        let Some(child) = value.as_object() else {
            return Err(invalid(keys, "child node must be an object"));
        };
        let child = node_from_json(child, keys)?;
        keys.pop();
        children.insert(name.clone(), child);
    }
    Ok(children)
}

fn node_from_json(
    object: &Map<String, Value>,
    keys: &mut Vec<String>,
) -> Result<RoleNode, TreeError> {
    let description = match object.get(DESCRIPTION_KEY) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(invalid(keys, "description must be a string")),
    };

    let kind = match object.get(PATH_KEY) {
        None => NodeKind::Category { description },
        Some(Value::String(path)) => NodeKind::Role(RoleEntry {
            description: description.unwrap_or_default(),
            path: path.clone(),
        }),
        Some(_) => return Err(invalid(keys, "path must be a string")),
    };

    Ok(RoleNode {
        kind,
        children: children_from_json(object, keys)?,
    })
}

fn invalid(keys: &[String], reason: &'static str) -> TreeError {
    TreeError::InvalidNode {
        path: keys.join("/"),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn keys(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    #[test]
    fn test_insert_role_creates_categories() {
        let mut tree = RoleTree::new();
        tree.insert_role(
            &keys(&["Services", "Compute", "compute.viewer"]),
            RoleEntry::new("_roles/compute/viewer.md"),
        );

        let services = tree.get(&["Services"]).unwrap();
        assert!(!services.is_role());
        let role = tree
            .get(&["Services", "Compute", "compute.viewer"])
            .unwrap()
            .as_role()
            .unwrap();
        assert_eq!(role.path, "_roles/compute/viewer.md");
        assert_eq!(role.description, "");
    }

    #[test]
    fn test_insert_role_merges_siblings() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["Services", "a.viewer"]), RoleEntry::new("a.md"));
        tree.insert_role(&keys(&["Services", "b.viewer"]), RoleEntry::new("b.md"));

        let services = tree.get(&["Services"]).unwrap();
        assert_eq!(
            services.children.keys().collect::<Vec<_>>(),
            vec!["a.viewer", "b.viewer"]
        );
        assert_eq!(tree.role_count(), 2);
    }

    #[test]
    fn test_insert_role_over_category_keeps_children() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["compute", "compute.admin"]), RoleEntry::new("admin.md"));
        tree.insert_role(&keys(&["compute"]), RoleEntry::new("compute.md"));

        let node = tree.get(&["compute"]).unwrap();
        assert_eq!(node.as_role().unwrap().path, "compute.md");
        assert!(node.children.contains_key("compute.admin"));
        assert_eq!(tree.role_count(), 2);
    }

    #[test]
    fn test_insert_role_empty_path_is_ignored() {
        let mut tree = RoleTree::new();
        tree.insert_role(&[], RoleEntry::new("x.md"));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_set_description() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["net", "viewer"]), RoleEntry::new("net/viewer.md"));

        assert!(tree.set_description(&["net", "viewer"], "View network".to_owned()));
        assert!(!tree.set_description(&["net"], "not a role".to_owned()));
        assert!(!tree.set_description(&["missing"], "nothing".to_owned()));
        assert_eq!(
            tree.get(&["net", "viewer"]).unwrap().description(),
            Some("View network")
        );
    }

    #[test]
    fn test_walk_roles_reports_key_paths() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["b", "b.role"]), RoleEntry::new("b.md"));
        tree.insert_role(&keys(&["a", "x", "a.role"]), RoleEntry::new("a.md"));

        let mut seen = Vec::new();
        tree.walk_roles(|role| seen.push((role.keys.join("/"), role.entry.path.clone())));

        assert_eq!(
            seen,
            vec![
                ("a/x/a.role".to_owned(), "a.md".to_owned()),
                ("b/b.role".to_owned(), "b.md".to_owned()),
            ]
        );
    }

    #[test]
    fn test_roles_mut_updates_in_place() {
        let mut tree = RoleTree::new();
        tree.insert_role(&keys(&["a", "a.one"]), RoleEntry::new("one.md"));
        tree.insert_role(&keys(&["a", "a.one", "a.one.two"]), RoleEntry::new("two.md"));

        for entry in tree.roles_mut() {
            entry.description = format!("from {}", entry.path);
        }

        assert_eq!(
            tree.get(&["a", "a.one", "a.one.two"]).unwrap().description(),
            Some("from two.md")
        );
        assert_eq!(
            tree.get(&["a", "a.one"]).unwrap().description(),
            Some("from one.md")
        );
    }

    #[test]
    fn test_json_round_trip_shape() {
        let input = json!({
            "net": {
                "description": "Net category",
                "viewer": {"description": "View network", "path": "net/viewer.md"}
            }
        });

        let tree = RoleTree::from_json(&input).unwrap();
        let net = tree.get(&["net"]).unwrap();
        assert!(!net.is_role());
        assert_eq!(net.description(), Some("Net category"));
        assert_eq!(
            tree.get(&["net", "viewer"]).unwrap().as_role(),
            Some(&RoleEntry {
                description: "View network".to_owned(),
                path: "net/viewer.md".to_owned(),
            })
        );

        assert_eq!(tree.to_json(), input);
    }

    #[test]
    fn test_from_json_role_without_description() {
        let tree = RoleTree::from_json(&json!({"viewer": {"path": "viewer.md"}})).unwrap();
        assert_eq!(tree.get(&["viewer"]).unwrap().description(), Some(""));
    }

    #[test]
    fn test_from_json_rejects_scalar_child() {
        let err = RoleTree::from_json(&json!({"net": {"viewer": 3}})).unwrap_err();
        assert!(matches!(err, TreeError::InvalidNode { .. }));
        assert!(err.to_string().contains("net/viewer"));
    }

    #[test]
    fn test_from_json_rejects_non_string_path() {
        let err = RoleTree::from_json(&json!({"viewer": {"path": 1}})).unwrap_err();
        assert!(err.to_string().contains("path must be a string"));
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(matches!(
            RoleTree::from_json_str("{not json"),
            Err(TreeError::Json(_))
        ));
    }
}
