//! Rule requiring URI versioning on the server base URL.
//!
//! # Rationale
//!
//! The major version belongs to the base URL, once, as the first path
//! segment. Resource paths stay version-free so that they are identical
//! across versions.
//!
//! # Detected Patterns
//!
//! - Server URLs whose first path segment is not `v<major>` (one or two
//!   digits)
//! - Path templates containing a version token, e.g. `/v2/orders` or
//!   `/orders-v2`
//!
//! # Configuration
//!
//! ```toml
//! [rules.version-in-uri]
//! server_pattern = '^https?://[^/]+/v\d{1,2}/.*$'
//! ```

use api_lint_core::utils::version_tokens;
use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};
use regex::Regex;

/// Rule code for version-in-uri.
pub const CODE: &str = "115";

/// Rule name for version-in-uri.
pub const NAME: &str = "version-in-uri";

/// Server URLs must match this pattern unless configured otherwise.
pub const DEFAULT_SERVER_PATTERN: &str = r"^https?://[^/]+/v\d{1,2}/.*$";

const DESCRIPTION: &str = "URL must contain a single Major version number e.g. v1, v2 etc.";

/// Requires a major version in the server URL and none in paths.
#[derive(Debug, Clone)]
pub struct VersionInUri {
    server_pattern: Regex,
}

impl VersionInUri {
    /// Builds the rule from `[rules.version-in-uri]`.
    ///
    /// # Errors
    ///
    /// Fails when `server_pattern` is not a valid regex.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            server_pattern: config.get_regex("server_pattern", DEFAULT_SERVER_PATTERN)?,
        })
    }

    fn check_server_urls(&self, ctx: &Context<'_>) -> CheckResult {
        let api = ctx.api();
        let servers = api
            .servers
            .iter()
            .filter(|s| s.url.as_deref().is_some_and(|url| !self.server_pattern.is_match(url)))
            .map(|s| ctx.violation(DESCRIPTION, s));
        let paths = api
            .paths
            .iter()
            .filter(|p| !version_tokens(&p.template).is_empty())
            .map(|p| ctx.violation(DESCRIPTION, p));
        Ok(servers.chain(paths).collect())
    }
}

impl Rule for VersionInUri {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Should Use URI Versioning"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("server-urls", Severity::Must, |ctx| {
            self.check_server_urls(ctx)
        })]
    }
}
