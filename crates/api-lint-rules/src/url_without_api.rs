//! Rule forbidding `/api` in server URL paths.
//!
//! The host already says this is an API; an `/api` path prefix is noise.
//!
//! # Configuration
//!
//! ```toml
//! [rules.url-without-api]
//! pattern = "^(http|https)://.*/api.*$"
//! ```

use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};
use regex::Regex;

/// Rule code for url-without-api.
pub const CODE: &str = "135";

/// Rule name for url-without-api.
pub const NAME: &str = "url-without-api";

/// URLs matching this pattern are reported.
pub const DEFAULT_PATTERN: &str = "^(http|https)://.*/api.*$";

/// Reports server URLs with an `/api` path.
#[derive(Debug, Clone)]
pub struct UrlWithoutApi {
    pattern: Regex,
}

impl UrlWithoutApi {
    /// Builds the rule from `[rules.url-without-api]`.
    ///
    /// # Errors
    ///
    /// Fails when `pattern` is not a valid regex.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: config.get_regex("pattern", DEFAULT_PATTERN)?,
        })
    }

    fn validate(&self, ctx: &Context<'_>) -> CheckResult {
        Ok(ctx
            .api()
            .servers
            .iter()
            .filter(|s| s.url.as_deref().is_some_and(|url| self.pattern.is_match(url)))
            .map(|s| ctx.violation("URL shouldn't contain /api", s))
            .collect())
    }
}

impl Rule for UrlWithoutApi {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Should not contain API in url"
    }

    fn default_severity(&self) -> Severity {
        Severity::Should
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Must, |ctx| self.validate(ctx))]
    }
}
