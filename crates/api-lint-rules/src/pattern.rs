//! Whole-string regex options.
//!
//! Several guidelines require a value to match a pattern as a whole (scope
//! names, API identifiers, property names). Patterns are configured without
//! anchors and compiled as `^(?:pattern)$`; the configured text is kept for
//! messages.

use api_lint_core::{ConfigError, RuleConfig};
use regex::Regex;
use std::fmt;

/// A regex that must match the entire input.
#[derive(Debug, Clone)]
pub struct FullMatch {
    source: String,
    regex: Regex,
}

impl FullMatch {
    /// Compiles `pattern` anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&format!("^(?:{pattern})$"))?,
            source: pattern.to_string(),
        })
    }

    /// Reads and compiles a string option.
    pub(crate) fn option(
        config: &RuleConfig,
        key: &str,
        default: &str,
    ) -> Result<Self, ConfigError> {
        let pattern = config.get_str(key, default)?;
        Self::new(pattern).map_err(|source| invalid(config, key, pattern, source))
    }

    /// Reads and compiles a string array option.
    pub(crate) fn options(
        config: &RuleConfig,
        key: &str,
        default: &[&str],
    ) -> Result<Vec<Self>, ConfigError> {
        config
            .get_str_array(key, default)?
            .iter()
            .map(|pattern| Self::new(pattern).map_err(|source| invalid(config, key, pattern, source)))
            .collect()
    }

    /// Whether the whole of `text` matches.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as configured, without the added anchors.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for FullMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(config: &RuleConfig, key: &str, pattern: &str, source: regex::Error) -> ConfigError {
    ConfigError::InvalidRegex {
        rule: config.rule_name().to_string(),
        key: key.to_string(),
        pattern: pattern.to_string(),
        source,
    }
}
