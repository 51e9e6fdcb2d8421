//! Configuration types for api-lint.
//!
//! ```toml
//! fail_on = "MUST"
//!
//! [analyzer]
//! parallel = true
//! exclude = ["**/node_modules/**"]
//!
//! [rules.proprietary-headers]
//! enabled = true
//! severity = "SHOULD"
//! custom_headers = ["X-Flow-ID"]
//! ```

use crate::types::Severity;
use miette::Diagnostic;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Top-level configuration for api-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lowest severity that makes the CLI exit with a failure status.
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
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
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
        let mut config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        for (name, rule) in &mut config.rules {
            rule.name.clone_from(name);
        }
        Ok(config)
    }

    /// Threshold for failing a run, `MUST` unless configured.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Must)
    }

    /// Returns the configuration of one rule; unconfigured rules get an
    /// empty configuration so every option falls back to its default.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> RuleConfig {
        self.rules
            .get(rule_name)
            .cloned()
            .unwrap_or_else(|| RuleConfig::named(rule_name))
    }

    /// Names of all configured rule sections.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
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
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Run checks on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Glob patterns of documents to skip when linting a directory.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            exclude: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
///
/// Option getters take the rule's default and only fail when an option is
/// present with the wrong shape, so a bad policy file is rejected before any
/// document is evaluated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(skip)]
    name: String,

    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for every check of this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

impl RuleConfig {
    /// An empty configuration for `rule_name`.
    #[must_use]
    pub fn named(rule_name: &str) -> Self {
        Self {
            name: rule_name.to_string(),
            ..Self::default()
        }
    }

    /// Adds an option, mostly useful in tests.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    /// The rule this configuration belongs to.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        &self.name
    }

    /// Whether the option is set.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidOptionType {
            rule: self.name.clone(),
            key: key.to_string(),
            expected,
        }
    }

    /// Gets an option value as a specific type.
    ///
    /// # Errors
    ///
    /// Returns an error if the option does not deserialize into `T`.
    pub fn get_option<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, ConfigError> {
        self.options
            .get(key)
            .map(|v| {
                v.clone()
                    .try_into()
                    .map_err(|_| self.invalid(key, std::any::type_name::<T>()))
            })
            .transpose()
    }

    /// Gets a boolean option with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| self.invalid(key, "a boolean")),
        }
    }

    /// Gets an integer option with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not an integer.
    pub fn get_int(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(v) => v.as_integer().ok_or_else(|| self.invalid(key, "an integer")),
        }
    }

    /// Gets a string option with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not a string.
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, ConfigError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(v) => v.as_str().ok_or_else(|| self.invalid(key, "a string")),
        }
    }

    /// Gets a string array option with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not an array of strings.
    pub fn get_str_array(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ConfigError> {
        match self.options.get(key) {
            None => Ok(default.iter().map(|s| (*s).to_string()).collect()),
            Some(v) => v
                .as_array()
                .and_then(|arr| {
                    arr.iter()
                        .map(|item| item.as_str().map(String::from))
                        .collect::<Option<Vec<_>>>()
                })
                .ok_or_else(|| self.invalid(key, "an array of strings")),
        }
    }

    /// Gets the keys of a table option, or the items of a string array
    /// option, with a default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is neither a table nor an array of
    /// strings.
    pub fn get_keys(&self, key: &str, default: &[&str]) -> Result<Vec<String>, ConfigError> {
        match self.options.get(key) {
            Some(toml::Value::Table(table)) => Ok(table.keys().cloned().collect()),
            Some(toml::Value::Array(_)) | None => self
                .get_str_array(key, default)
                .map_err(|_| self.invalid(key, "a table or an array of strings")),
            Some(_) => Err(self.invalid(key, "a table or an array of strings")),
        }
    }

    /// Gets and compiles a regex option with a default pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not a string or not a valid regex.
    pub fn get_regex(&self, key: &str, default: &str) -> Result<Regex, ConfigError> {
        let pattern = self.get_str(key, default)?;
        self.compile(key, pattern)
    }

    /// Gets and compiles a regex array option with default patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if the option is not an array of strings or any
    /// entry is not a valid regex.
    pub fn get_regex_array(&self, key: &str, default: &[&str]) -> Result<Vec<Regex>, ConfigError> {
        self.get_str_array(key, default)?
            .iter()
            .map(|pattern| self.compile(key, pattern))
            .collect()
    }

    fn compile(&self, key: &str, pattern: &str) -> Result<Regex, ConfigError> {
        Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
            rule: self.name.clone(),
            key: key.to_string(),
            pattern: pattern.to_string(),
            source,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(api_lint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(
        code(api_lint::config::parse),
        help("run `api-lint init` to generate a valid configuration file")
    )]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule option has the wrong type.
    #[error("Option `{key}` of rule `{rule}` must be {expected}")]
    #[diagnostic(code(api_lint::config::option_type))]
    InvalidOptionType {
        /// Rule name.
        rule: String,
        /// Option key.
        key: String,
        /// Description of the expected type.
        expected: &'static str,
    },

    /// A rule option is not a valid regular expression.
    #[error("Option `{key}` of rule `{rule}` is not a valid regex: `{pattern}`")]
    #[diagnostic(
        code(api_lint::config::regex),
        help("patterns use the syntax of the `regex` crate; escape `{{` and `}}` literally")
    )]
    InvalidRegex {
        /// Rule name.
        rule: String,
        /// Option key.
        key: String,
        /// The rejected pattern.
        pattern: String,
        /// Compilation error.
        source: regex::Error,
    },

    /// A `[rules.<name>]` section names no known rule.
    #[error("Unknown rule `{0}` in configuration")]
    #[diagnostic(
        code(api_lint::config::unknown_rule),
        help("run `api-lint list-rules` to see the available rules")
    )]
    UnknownRule(String),
}
