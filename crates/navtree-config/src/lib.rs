//! Configuration management for navtree.
//!
//! Parses `navtree.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Caller-supplied settings can be applied during load via [`Overrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `data.dir`
//! - `data.tree_script`
//! - `data.index_page_prefix`
//! - `data.fragment_extension`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct Overrides {
    /// Override generated data directory.
    pub data_dir: Option<PathBuf>,
    /// Override strict validation flag.
    pub strict: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "navtree.toml";

const DEFAULT_DATA_DIR: &str = "html";
const DEFAULT_TREE_SCRIPT: &str = "navtreedata.js";
const DEFAULT_INDEX_PAGE_PREFIX: &str = "navtreeindex";
const DEFAULT_FRAGMENT_EXTENSION: &str = "js";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generated data configuration (paths are relative strings from TOML).
    data: DataConfigRaw,
    /// Validation configuration.
    pub validation: ValidationConfig,

    /// Resolved data configuration (set after loading).
    #[serde(skip)]
    pub data_resolved: DataConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw data configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DataConfigRaw {
    dir: Option<String>,
    tree_script: Option<String>,
    index_page_prefix: Option<String>,
    fragment_extension: Option<String>,
}

/// Resolved generated-data configuration with an absolute directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Directory holding the generator output.
    pub dir: PathBuf,
    /// File name of the main navigation script.
    pub tree_script: String,
    /// File name prefix of index pages (`navtreeindex0.js`, ...).
    pub index_page_prefix: String,
    /// Extension of lazy fragment and index page scripts, without the dot.
    pub fragment_extension: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DATA_DIR),
            tree_script: DEFAULT_TREE_SCRIPT.to_owned(),
            index_page_prefix: DEFAULT_INDEX_PAGE_PREFIX.to_owned(),
            fragment_extension: DEFAULT_FRAGMENT_EXTENSION.to_owned(),
        }
    }
}

impl DataConfig {
    /// Absolute path of the main navigation script.
    #[must_use]
    pub fn tree_script_path(&self) -> PathBuf {
        self.dir.join(&self.tree_script)
    }
}

/// Validation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Treat malformed generator output as an error instead of skipping it.
    pub strict: bool,
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
        /// Config field path (e.g., "`data.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_OUT`} not set").
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

impl Config {
    /// Load configuration from file with optional overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `navtree.toml` in current directory and parents.
    ///
    /// Overrides are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&Overrides>,
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

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
        }

        Ok(config)
    }

    /// Apply overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(dir) = &overrides.data_dir {
            self.data_resolved.dir.clone_from(dir);
        }
        if let Some(strict) = overrides.strict {
            self.validation.strict = strict;
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
            data: DataConfigRaw::default(),
            validation: ValidationConfig::default(),
            data_resolved: DataConfig {
                dir: base.join(DEFAULT_DATA_DIR),
                ..DataConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let data = &self.data_resolved;
        require_non_empty(&data.tree_script, "data.tree_script")?;
        require_non_empty(&data.index_page_prefix, "data.index_page_prefix")?;
        require_non_empty(&data.fragment_extension, "data.fragment_extension")?;

        if data.fragment_extension.starts_with('.') {
            return Err(ConfigError::Validation(
                "data.fragment_extension must not start with '.'".to_owned(),
            ));
        }
        if data.index_page_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "data.index_page_prefix cannot contain a path separator".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.data.dir {
            self.data.dir = Some(expand::expand_env(dir, "data.dir")?);
        }
        if let Some(ref script) = self.data.tree_script {
            self.data.tree_script = Some(expand::expand_env(script, "data.tree_script")?);
        }
        if let Some(ref prefix) = self.data.index_page_prefix {
            self.data.index_page_prefix =
                Some(expand::expand_env(prefix, "data.index_page_prefix")?);
        }
        if let Some(ref extension) = self.data.fragment_extension {
            self.data.fragment_extension =
                Some(expand::expand_env(extension, "data.fragment_extension")?);
        }
        Ok(())
    }

    /// Resolve the data directory relative to the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.data;
        self.data_resolved = DataConfig {
            dir: config_dir.join(raw.dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)),
            tree_script: raw
                .tree_script
                .clone()
                .unwrap_or_else(|| DEFAULT_TREE_SCRIPT.to_owned()),
            index_page_prefix: raw
                .index_page_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_INDEX_PAGE_PREFIX.to_owned()),
            fragment_extension: raw
                .fragment_extension
                .clone()
                .unwrap_or_else(|| DEFAULT_FRAGMENT_EXTENSION.to_owned()),
        };
    }
}
