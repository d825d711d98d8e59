//! Catalog parser: headers and include directives to a role tree.
//!
//! The catalog is a markdown document where each role has its own header,
//! an include directive pointing at the role's description document and,
//! optionally, a few lines of inline summary:
//!
//! ```text
//! ## Compute Cloud {#compute}
//!
//! ### compute.viewer {#compute-viewer}
//!
//! {% include [compute-viewer](../_roles/compute/viewer.md) %}
//!
//! Short summary of the role.
//! ```
//!
//! The role is named after the header preceding the include and placed
//! under the titles of the enclosing sections (the role's own header is not
//! repeated as a category).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::tree::{RoleEntry, RoleTree};
use crate::variables::Variables;

static HEADER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*?)(?:\s+\{#(.*?)\})?$").expect("invalid header regex")
});

static INCLUDE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{%\s+include\s+\[(.*?)\]\((.*?)\)\s+%\}$").expect("invalid include regex")
});

/// Error parsing the catalog.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// An include directive appeared before any header, so the role has no name.
    #[error("line {line}: include of '{target}' has no preceding header to name the role")]
    IncludeWithoutHeader {
        /// 1-based line number of the include directive.
        line: usize,
        /// Include target as written.
        target: String,
    },
}

/// Open header section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header level (1-6).
    pub level: usize,
    /// Header text without the anchor.
    pub title: String,
    /// Explicit `{#slug}` anchor, or one derived from the title.
    pub slug: String,
}

impl Section {
    fn new(level: usize, title: &str, anchor: Option<&str>) -> Self {
        let slug = anchor.map_or_else(|| slugify(title), str::to_owned);
        Self {
            level,
            title: title.to_owned(),
            slug,
        }
    }
}

/// Derive an anchor slug from a header title.
fn slugify(title: &str) -> String {
    title.to_lowercase().replace([' ', '.'], "-")
}

/// Strip leading `../` segments from an include target.
fn source_path(target: &str) -> &str {
    let mut path = target;
    while let Some(rest) = path.strip_prefix("../") {
        path = rest;
    }
    path
}

/// Line-by-line catalog parser.
///
/// Feed lines with [`feed_line`](Self::feed_line), then call
/// [`finish`](Self::finish) to get the tree.
pub struct CatalogParser<'v> {
    variables: &'v Variables,
    tree: RoleTree,
    sections: Vec<Section>,
    last_header: Option<String>,
    /// Key path of the role collecting description lines.
    open_role: Option<Vec<String>>,
    pending: Vec<String>,
    line: usize,
}

impl<'v> CatalogParser<'v> {
    /// Create a parser resolving placeholders with `variables`.
    #[must_use]
    pub fn new(variables: &'v Variables) -> Self {
        Self {
            variables,
            tree: RoleTree::new(),
            sections: Vec::new(),
            last_header: None,
            open_role: None,
            pending: Vec::new(),
            line: 0,
        }
    }

    /// Currently open header sections, shallowest first.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Key path of the role currently collecting description lines.
    #[must_use]
    pub fn open_role(&self) -> Option<&[String]> {
        self.open_role.as_deref()
    }

    /// Description lines collected for the open role so far.
    #[must_use]
    pub fn pending_lines(&self) -> &[String] {
        &self.pending
    }

    /// Tree built so far (pending descriptions not yet applied).
    #[must_use]
    pub fn tree(&self) -> &RoleTree {
        &self.tree
    }

    /// Process one line of the catalog.
    pub fn feed_line(&mut self, raw: &str) -> Result<(), ParseError> {
        self.line += 1;
        let resolved = self.variables.resolve(raw);
        let line = resolved.as_ref();

        if let Some(caps) = HEADER_PATTERN.captures(line) {
            self.close_role();
            let level = caps[1].len();
            let title = caps[2].trim();
            let anchor = caps.get(3).map(|m| m.as_str());
            self.open_section(Section::new(level, title, anchor));
            return Ok(());
        }

        if let Some(caps) = INCLUDE_PATTERN.captures(line) {
            self.close_role();
            self.open_include(&caps[2])?;
            return Ok(());
        }

        let text = line.trim();
        if self.open_role.is_some() && !text.is_empty() {
            self.pending.push(text.to_owned());
        }
        Ok(())
    }

    /// Flush the open role and return the finished tree.
    #[must_use]
    pub fn finish(mut self) -> RoleTree {
        self.close_role();
        self.tree
    }

    fn open_section(&mut self, section: Section) {
        while self
            .sections
            .last()
            .is_some_and(|top| top.level >= section.level)
        {
            self.sections.pop();
        }
        self.last_header = Some(section.title.clone());
        self.sections.push(section);
    }

    fn open_include(&mut self, target: &str) -> Result<(), ParseError> {
        let Some(name) = self.last_header.clone() else {
            return Err(ParseError::IncludeWithoutHeader {
                line: self.line,
                target: target.to_owned(),
            });
        };

        let parents = self.sections.len().saturating_sub(1);
        let mut keys: Vec<String> = self.sections[..parents]
            .iter()
            .map(|s| s.title.clone())
            .collect();
        keys.push(name);

        let path = source_path(target);
        debug!(role = %keys.join(" / "), path, "Found role");
        self.tree.insert_role(&keys, RoleEntry::new(path));
        self.open_role = Some(keys);
        Ok(())
    }

    /// Write the collected description to the open role and close it.
    fn close_role(&mut self) {
        let lines = std::mem::take(&mut self.pending);
        let Some(keys) = self.open_role.take() else {
            return;
        };

        let description = lines.join(" ").trim().to_owned();
        if !description.is_empty() {
            self.tree.set_description(&keys, description);
        }
    }
}

/// Parse a whole catalog document.
///
/// # Errors
///
/// Returns [`ParseError::IncludeWithoutHeader`] if a role cannot be named.
pub fn parse_catalog(text: &str, variables: &Variables) -> Result<RoleTree, ParseError> {
    let mut parser = CatalogParser::new(variables);
    for line in text.lines() {
        parser.feed_line(line)?;
    }
    let tree = parser.finish();
    debug!(roles = tree.role_count(), "Parsed catalog");
    Ok(tree)
}

/// Replace every occurrence of an include `marker` with `fragment`.
///
/// Used to inline documents the catalog includes but which are not role
/// descriptions (such as the primitive roles list).
#[must_use]
pub fn splice_include(document: &str, marker: &str, fragment: &str) -> String {
    document.replace(marker, fragment)
}
