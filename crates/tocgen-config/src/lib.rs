//! Configuration management for tocgen.
//!
//! Parses `tocgen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `docs.source_dir` supports `${VAR}` and `${VAR:-default}` references,
//! expanded before the path is resolved against the config file directory.

mod expand;

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override navigation file name.
    pub nav_filename: Option<String>,
    /// Override asset folder name.
    pub asset_dir: Option<String>,
    /// Override code block language for repairs.
    pub code_language: Option<String>,
    /// Override minimum line length for code block repairs.
    pub min_line_length: Option<usize>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "tocgen.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Navigation file generation.
    pub nav: NavConfig,
    /// Link rewriting rules.
    pub links: LinksConfig,
    /// Code block repair settings.
    pub code_blocks: CodeBlocksConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Documentation root containing the Markdown sources.
    pub source_dir: PathBuf,
}

/// Navigation file settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Name of the per-directory navigation file.
    pub filename: String,
    /// Name of the asset folder excluded from listings and the walk.
    pub asset_dir: String,
    /// Document extension stripped from display names.
    pub extension: String,
    /// List subdirectories before files.
    pub dirs_first: bool,
    /// Glob patterns (relative to the docs root) to leave out.
    pub exclude: Vec<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            filename: "toc.yml".to_owned(),
            asset_dir: "images".to_owned(),
            extension: ".md".to_owned(),
            dirs_first: false,
            exclude: Vec::new(),
        }
    }
}

impl NavConfig {
    /// Compile the `exclude` globs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid pattern.
    pub fn exclude_patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    ConfigError::Validation(format!("nav.exclude pattern {p:?} is invalid: {e}"))
                })
            })
            .collect()
    }
}

/// Link rewriting configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Literal substitutions applied to link targets, in order.
    pub rewrite: Vec<RewriteRule>,
}

/// One literal substitution for link targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewriteRule {
    /// Text to find.
    pub from: String,
    /// Replacement text.
    pub to: String,
}

/// Code block repair settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CodeBlocksConfig {
    /// Fence language whose blocks are repaired.
    pub language: String,
    /// Lines shorter than this are left alone.
    pub min_line_length: usize,
}

impl Default for CodeBlocksConfig {
    fn default() -> Self {
        Self {
            language: "python".to_owned(),
            min_line_length: 150,
        }
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
        /// Config field path (e.g., "`docs.source_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
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

/// Require a field to name a single path component.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) || value == "." || value == ".." {
        return Err(ConfigError::Validation(format!(
            "{field} must be a plain file name, got {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `tocgen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and validated together with
    /// the file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
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
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(filename) = &settings.nav_filename {
            self.nav.filename.clone_from(filename);
        }
        if let Some(asset_dir) = &settings.asset_dir {
            self.nav.asset_dir.clone_from(asset_dir);
        }
        if let Some(language) = &settings.code_language {
            self.code_blocks.language.clone_from(language);
        }
        if let Some(min_line_length) = settings.min_line_length {
            self.code_blocks.min_line_length = min_line_length;
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
            docs: DocsConfigRaw::default(),
            nav: NavConfig::default(),
            links: LinksConfig::default(),
            code_blocks: CodeBlocksConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
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

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_nav()?;
        self.validate_links()?;
        self.validate_code_blocks()?;
        Ok(())
    }

    fn validate_nav(&self) -> Result<(), ConfigError> {
        require_file_name(&self.nav.filename, "nav.filename")?;
        require_file_name(&self.nav.asset_dir, "nav.asset_dir")?;
        if self.nav.filename == self.nav.asset_dir {
            return Err(ConfigError::Validation(
                "nav.filename and nav.asset_dir must differ".to_owned(),
            ));
        }
        if !self.nav.extension.starts_with('.') || self.nav.extension.len() < 2 {
            return Err(ConfigError::Validation(format!(
                "nav.extension must start with '.', got {:?}",
                self.nav.extension
            )));
        }
        self.nav.exclude_patterns()?;
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        for (i, rule) in self.links.rewrite.iter().enumerate() {
            require_non_empty(&rule.from, &format!("links.rewrite[{i}].from"))?;
        }
        Ok(())
    }

    fn validate_code_blocks(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.code_blocks.language, "code_blocks.language")?;
        if self.code_blocks.min_line_length == 0 {
            return Err(ConfigError::Validation(
                "code_blocks.min_line_length must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref source_dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(source_dir, "docs.source_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = self.docs.source_dir.as_deref().unwrap_or("docs");
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(source_dir),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/site/docs"));
        assert_eq!(config.nav.filename, "toc.yml");
        assert_eq!(config.nav.asset_dir, "images");
        assert_eq!(config.nav.extension, ".md");
        assert!(!config.nav.dirs_first);
        assert!(config.nav.exclude.is_empty());
        assert!(config.links.rewrite.is_empty());
        assert_eq!(config.code_blocks.language, "python");
        assert_eq!(config.code_blocks.min_line_length, 150);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.nav.filename, "toc.yml");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_nav_config() {
        let toml = r#"
[nav]
filename = "nav.yml"
asset_dir = "media"
dirs_first = true
exclude = ["drafts/**", "*.tmp"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.nav.filename, "nav.yml");
        assert_eq!(config.nav.asset_dir, "media");
        assert_eq!(config.nav.extension, ".md");
        assert!(config.nav.dirs_first);
        assert_eq!(config.nav.exclude, vec!["drafts/**", "*.tmp"]);
        assert_eq!(config.nav.exclude_patterns().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rewrite_rules_in_order() {
        let toml = r#"
[[links.rewrite]]
from = "../images/"
to = "images/"

[[links.rewrite]]
from = ".html"
to = ".md"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.links.rewrite,
            vec![
                RewriteRule {
                    from: "../images/".to_owned(),
                    to: "images/".to_owned(),
                },
                RewriteRule {
                    from: ".html".to_owned(),
                    to: ".md".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn test_load_resolves_source_dir_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\nsource_dir = \"content\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_defaults_source_dir_to_docs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("docs"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let result = Config::load(Some(Path::new("/nonexistent/tocgen.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[nav\nfilename = ").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[nav]\nfilename = \"nav.yml\"\n").unwrap();

        let settings = CliSettings {
            source_dir: Some(PathBuf::from("/elsewhere")),
            nav_filename: Some("menu.yml".to_owned()),
            min_line_length: Some(80),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.nav.filename, "menu.yml");
        assert_eq!(config.nav.asset_dir, "images");
        assert_eq!(config.code_blocks.min_line_length, 80);
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            asset_dir: Some("a/b".to_owned()),
            ..CliSettings::default()
        };
        let result = Config::load(Some(&path), Some(&settings));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_nested_filename() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.nav.filename = "sub/toc.yml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nav.filename"));
    }

    #[test]
    fn test_validate_rejects_empty_asset_dir() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.nav.asset_dir = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nav.asset_dir cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_same_filename_and_asset_dir() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.nav.asset_dir = "toc.yml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_extension_without_dot() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.nav.extension = "md".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nav.extension"));
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.nav.exclude = vec!["[unclosed".to_owned()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_validate_rejects_empty_rewrite_from() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.links.rewrite.push(RewriteRule {
            from: String::new(),
            to: "x".to_owned(),
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("links.rewrite[0].from"));
    }

    #[test]
    fn test_validate_rejects_zero_min_line_length() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.code_blocks.min_line_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_in_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[docs]\nsource_dir = \"${TOCGEN_TEST_CFG_DIR:-articles}\"\n",
        )
        .unwrap();
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("TOCGEN_TEST_CFG_DIR");
        }

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("articles"));
    }
}
