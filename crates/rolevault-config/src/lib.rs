//! Configuration management for rolevault.
//!
//! Parses `rolevault.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. When no file is
//! found, defaults point at the public Yandex Cloud documentation sources.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.catalog_url`
//! - `source.presets_url`
//! - `source.primitive_roles_url`
//! - `source.base_url`
//! - `vault.output_dir`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override vault output directory.
    pub output_dir: Option<PathBuf>,
    /// Override HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rolevault.toml";

/// Upstream documentation tree the default sources are read from.
const DEFAULT_DOCS_ROOT: &str =
    "https://raw.githubusercontent.com/yandex-cloud/docs/refs/heads/master/ru/";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote documents the catalog is built from.
    pub source: SourceConfig,
    /// HTTP fetch settings.
    pub fetch: FetchConfig,
    /// Vault configuration (output path is a relative string from TOML).
    vault: VaultConfigRaw,

    /// Resolved vault configuration (set after loading).
    #[serde(skip)]
    pub vault_resolved: VaultConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Remote source documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Role catalog markdown document.
    pub catalog_url: String,
    /// YAML document with template variables (`{{ name }}` placeholders).
    pub presets_url: String,
    /// Markdown fragment with the primitive roles.
    pub primitive_roles_url: String,
    /// Include directive in the catalog replaced by the primitive roles fragment.
    pub primitive_include: String,
    /// Base URL that per-role document paths are appended to.
    pub base_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog_url: format!("{DEFAULT_DOCS_ROOT}iam/roles-reference.md"),
            presets_url: format!("{DEFAULT_DOCS_ROOT}presets.yaml"),
            primitive_roles_url: format!("{DEFAULT_DOCS_ROOT}_includes/roles-primitive.md"),
            primitive_include: "{% include [roles-primitive](../_includes/roles-primitive.md) %}"
                .to_owned(),
            base_url: DEFAULT_DOCS_ROOT.to_owned(),
        }
    }
}

/// HTTP fetch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Description used for roles whose document could not be fetched.
    pub not_found: String,
}

impl FetchConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            not_found: "Description not found.".to_owned(),
        }
    }
}

/// Raw vault configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct VaultConfigRaw {
    output_dir: Option<String>,
    labels: LabelsConfig,
}

/// Resolved vault configuration with absolute paths.
#[derive(Debug, Default)]
pub struct VaultConfig {
    /// Directory the vault is generated into (wiped on every build).
    pub output_dir: PathBuf,
    /// Headings and fixed texts written into notes.
    pub labels: LabelsConfig,
}

/// Headings and fixed texts written into vault notes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Title of role notes.
    pub role: String,
    /// Title of category notes.
    pub category: String,
    /// Heading of the parent link section.
    pub parents: String,
    /// Heading of the children link section.
    pub children: String,
    /// Sub-heading listing child categories.
    pub subcategories: String,
    /// Sub-heading listing child roles.
    pub roles: String,
    /// Body text of the root `ROLES` note.
    pub root_description: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            role: "Role".to_owned(),
            category: "Category".to_owned(),
            parents: "Parents".to_owned(),
            children: "Children".to_owned(),
            subcategories: "Subcategories".to_owned(),
            roles: "Roles".to_owned(),
            root_description: "Root category for all roles".to_owned(),
        }
    }
}

impl LabelsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.role, "vault.labels.role")?;
        require_non_empty(&self.category, "vault.labels.category")?;
        require_non_empty(&self.parents, "vault.labels.parents")?;
        require_non_empty(&self.children, "vault.labels.children")?;
        require_non_empty(&self.subcategories, "vault.labels.subcategories")?;
        require_non_empty(&self.roles, "vault.labels.roles")?;
        require_non_empty(&self.root_description, "vault.labels.root_description")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.base_url`").
        field: String,
        /// Error message (e.g., "${`DOCS_MIRROR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(url, field)?;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rolevault.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.vault_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.fetch.timeout_secs = timeout_secs;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            source: SourceConfig::default(),
            fetch: FetchConfig::default(),
            vault: VaultConfigRaw::default(),
            vault_resolved: VaultConfig {
                output_dir: base.join("yc-obs-roles"),
                labels: LabelsConfig::default(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_source()?;

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        self.vault_resolved.labels.validate()
    }

    /// Validate source URLs.
    fn validate_source(&self) -> Result<(), ConfigError> {
        require_http_url(&self.source.catalog_url, "source.catalog_url")?;
        require_http_url(&self.source.presets_url, "source.presets_url")?;
        require_http_url(
            &self.source.primitive_roles_url,
            "source.primitive_roles_url",
        )?;
        require_http_url(&self.source.base_url, "source.base_url")?;
        require_non_empty(&self.source.primitive_include, "source.primitive_include")
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let source = &mut self.source;
        source.catalog_url = expand::expand_env(&source.catalog_url, "source.catalog_url")?;
        source.presets_url = expand::expand_env(&source.presets_url, "source.presets_url")?;
        source.primitive_roles_url =
            expand::expand_env(&source.primitive_roles_url, "source.primitive_roles_url")?;
        source.base_url = expand::expand_env(&source.base_url, "source.base_url")?;

        if let Some(ref dir) = self.vault.output_dir {
            self.vault.output_dir = Some(expand::expand_env(dir, "vault.output_dir")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let output_dir = self.vault.output_dir.as_deref().unwrap_or("yc-obs-roles");
        self.vault_resolved = VaultConfig {
            output_dir: config_dir.join(output_dir),
            labels: self.vault.labels.clone(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.vault_resolved.output_dir,
            PathBuf::from("/test/yc-obs-roles")
        );
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.timeout(), Duration::from_secs(30));
        assert_eq!(config.fetch.not_found, "Description not found.");
        assert!(config.source.base_url.ends_with("/ru/"));
        assert!(
            config
                .source
                .catalog_url
                .ends_with("/ru/iam/roles-reference.md")
        );
        assert_eq!(config.vault_resolved.labels.role, "Role");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.vault.output_dir.is_none());
    }

    #[test]
    fn test_parse_source_config() {
        let toml = r#"
[source]
catalog_url = "https://docs.example.com/ru/iam/roles-reference.md"
base_url = "https://docs.example.com/ru/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.source.catalog_url,
            "https://docs.example.com/ru/iam/roles-reference.md"
        );
        assert_eq!(config.source.base_url, "https://docs.example.com/ru/");
        // Unset fields keep their defaults
        assert!(config.source.presets_url.ends_with("presets.yaml"));
    }

    #[test]
    fn test_parse_labels() {
        let toml = r#"
[vault.labels]
role = "Роль"
category = "Категория"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.vault_resolved.labels.role, "Роль");
        assert_eq!(config.vault_resolved.labels.category, "Категория");
        assert_eq!(config.vault_resolved.labels.parents, "Parents");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[vault]
output_dir = "out/vault"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.vault_resolved.output_dir,
            PathBuf::from("/project/out/vault")
        );
    }

    #[test]
    fn test_resolve_paths_default_output_dir() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.vault_resolved.output_dir,
            PathBuf::from("/project/yc-obs-roles")
        );
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.source.base_url = "ftp://mirror.example.com/".to_owned();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("source.base_url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.fetch.timeout_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_empty_label() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.vault_resolved.labels.children = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vault.labels.children"));
    }

    #[test]
    fn test_validate_rejects_empty_root_description() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.vault_resolved.labels.root_description = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("vault.labels.root_description"));
    }

    #[test]
    fn test_apply_cli_settings_output_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/custom/vault")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.vault_resolved.output_dir,
            PathBuf::from("/custom/vault")
        );
        assert_eq!(config.fetch.timeout_secs, 30); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_timeout() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            timeout_secs: Some(5),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.fetch.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/rolevault.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
[fetch]
timeout_secs = 10
not_found = "Описание не найдено."

[vault]
output_dir = "vault"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.not_found, "Описание не найдено.");
        assert_eq!(config.vault_resolved.output_dir, tmp.path().join("vault"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[fetch\ntimeout_secs = 10").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let result = Config::load(Some(&path), Some(&overrides));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_expand_env_vars_in_source() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("ROLEVAULT_TEST_MIRROR", "mirror.example.com");
        }
        let toml = r#"
[source]
base_url = "https://${ROLEVAULT_TEST_MIRROR}/ru/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        assert_eq!(config.source.base_url, "https://mirror.example.com/ru/");
        unsafe {
            std::env::remove_var("ROLEVAULT_TEST_MIRROR");
        }
    }
}
