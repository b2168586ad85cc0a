//! Configuration types for chroma-lint.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::types::Severity;

/// Property names whose values may carry raw colors when nothing else is configured.
pub const DEFAULT_ALLOWED_PROPERTIES: &[&str] = &["color", "gradient", "iconBg", "iconColor"];

/// Source extensions analyzed when `[analyzer] extensions` is not set.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Top-level configuration for chroma-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Severity threshold for a failing run (default: error).
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Effective failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Error)
    }

    /// Resolves the options of `rule_name` over their defaults.
    #[must_use]
    pub fn rule_options(&self, rule_name: &str) -> ResolvedOptions {
        self.rules
            .get(rule_name)
            .map(RuleOptions::from_rule_config)
            .unwrap_or_default()
            .resolve()
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob or substring patterns excluded from discovery.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// File extensions to analyze, without the leading dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            extensions: default_extensions(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
    ]
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string option.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(toml::Value::as_str)
    }

    /// Gets a string-array option under the first key present.
    ///
    /// Returns `None` when no key is present or the value is not an array of
    /// strings; the latter is logged so a typo does not pass silently.
    #[must_use]
    pub fn get_str_array(&self, keys: &[&str]) -> Option<Vec<String>> {
        let (key, value) = keys
            .iter()
            .find_map(|k| self.options.get(*k).map(|v| (*k, v)))?;

        let items = value.as_array().and_then(|arr| {
            arr.iter()
                .map(|v| v.as_str().map(String::from))
                .collect::<Option<Vec<_>>>()
        });

        if items.is_none() {
            tracing::warn!("Option `{key}` must be an array of strings; using default");
        }
        items
    }
}

/// Raw options of the `no-raw-color` rule, as supplied by the user.
///
/// Every field is optional; [`RuleOptions::resolve`] fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    /// Path substrings whose files are exempt.
    pub allowed_files: Option<Vec<String>>,
    /// Object property names whose values are exempt.
    pub allowed_properties: Option<Vec<String>>,
    /// Reference to the color contract document, attached to each violation.
    pub doc_ref: Option<String>,
}

impl RuleOptions {
    /// Reads options from a `[rules.<name>]` table.
    ///
    /// Accepts both `allowedFiles` and `allowed_files` spellings.
    #[must_use]
    pub fn from_rule_config(config: &RuleConfig) -> Self {
        Self {
            allowed_files: config.get_str_array(&["allowedFiles", "allowed_files"]),
            allowed_properties: config
                .get_str_array(&["allowedProperties", "allowed_properties"]),
            doc_ref: config.get_str("doc_ref").map(String::from),
        }
    }

    /// Merges these options over the defaults.
    #[must_use]
    pub fn resolve(self) -> ResolvedOptions {
        let defaults = ResolvedOptions::default();

        let mut allowed_files = Vec::new();
        for pattern in self.allowed_files.unwrap_or(defaults.allowed_files) {
            if pattern.is_empty() && !allowed_files.contains(&pattern) {
                tracing::warn!("Empty pattern in `allowedFiles` exempts every file");
            }
            if !allowed_files.contains(&pattern) {
                allowed_files.push(pattern);
            }
        }

        ResolvedOptions {
            allowed_files,
            allowed_properties: self
                .allowed_properties
                .map_or(defaults.allowed_properties, |props| {
                    props.into_iter().collect()
                }),
            doc_ref: self.doc_ref.or(defaults.doc_ref),
        }
    }
}

/// Options of the `no-raw-color` rule after defaults are applied.
///
/// Built once per run and never mutated during analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Ordered, de-duplicated path substrings.
    pub allowed_files: Vec<String>,
    /// Exempt property names.
    pub allowed_properties: BTreeSet<String>,
    /// Color contract document reference.
    pub doc_ref: Option<String>,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            allowed_files: Vec::new(),
            allowed_properties: DEFAULT_ALLOWED_PROPERTIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            doc_ref: None,
        }
    }
}

impl ResolvedOptions {
    /// Adds an exempt file pattern.
    #[must_use]
    pub fn with_allowed_file(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.allowed_files.contains(&pattern) {
            self.allowed_files.push(pattern);
        }
        self
    }

    /// Adds an exempt property name.
    #[must_use]
    pub fn with_allowed_property(mut self, name: impl Into<String>) -> Self {
        self.allowed_properties.insert(name.into());
        self
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
