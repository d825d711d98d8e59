//! Template variable resolution.
//!
//! Catalog documents reference shared values with `{{ name }}` placeholders.
//! Values come from a presets YAML document; a dotted name addresses a path
//! under its `default` mapping (`{{ roles.viewer }}` -> `default.roles.viewer`).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}").expect("invalid placeholder regex")
});

/// Root key that every variable path is resolved under.
const ROOT_KEY: &str = "default";

/// Error loading the presets document.
#[derive(Debug, thiserror::Error)]
pub enum VariablesError {
    /// Presets document is not valid YAML.
    #[error("invalid presets YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Read-only variable mapping loaded from the presets document.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    root: Value,
}

impl Variables {
    /// Create an empty mapping. Every placeholder stays unresolved.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already parsed YAML value.
    #[must_use]
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse the presets YAML document.
    ///
    /// An empty document yields an empty mapping.
    pub fn from_yaml(content: &str) -> Result<Self, VariablesError> {
        if content.trim().is_empty() {
            return Ok(Self::empty());
        }
        Ok(Self::from_value(serde_yaml::from_str(content)?))
    }

    /// Look up the scalar at `default.<name>`.
    ///
    /// Returns `None` when a segment is missing, an intermediate value is not
    /// a mapping, or the final value is null or not a scalar.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<String> {
        let mut current = self.root.as_mapping()?.get(ROOT_KEY)?;
        for key in name.split('.') {
            current = current.as_mapping()?.get(key)?;
        }

        match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Replace every resolvable `{{ name }}` placeholder in `text`.
    ///
    /// Unresolvable placeholders are kept verbatim, including their original
    /// spacing. Returns the input unchanged (borrowed) when nothing matched.
    pub fn resolve<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains("{{") {
            return Cow::Borrowed(text);
        }

        PLACEHOLDER_PATTERN.replace_all(text, |caps: &Captures<'_>| {
            self.lookup(&caps[1])
                .unwrap_or_else(|| caps[0].to_owned())
        })
    }
}
