//! Rule requiring exactly one well-formed version in the full URL.
//!
//! # Detected Patterns
//!
//! - Server URL versions with a decimal point (`/v1.2/`)
//! - Server URL versions that are not the first path segment
//! - Server URLs with more than one version
//! - Path templates carrying a version while the base URL already does (or
//!   carrying several)
//!
//! Each server gets at most one violation, the first reason that applies in
//! the order above.

use api_lint_core::utils::{url_path, version_tokens, VersionToken};
use api_lint_core::{Check, CheckResult, Context, Rule, Severity};

/// Rule code for single-version-in-url.
pub const CODE: &str = "116";

/// Rule name for single-version-in-url.
pub const NAME: &str = "single-version-in-url";

/// Reports duplicated or misplaced version numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleVersionInUrl;

impl SingleVersionInUrl {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn server_problem(tokens: &[VersionToken<'_>]) -> Option<&'static str> {
        let first = tokens.first()?;
        if tokens.iter().any(VersionToken::has_decimal) {
            Some("Version number must not contain a decimal point")
        } else if first.segment > 0 {
            Some("Version number must be the first path segment")
        } else if tokens.len() > 1 {
            Some("URL contains more than one version number")
        } else {
            None
        }
    }

    fn validate(ctx: &Context<'_>) -> CheckResult {
        let api = ctx.api();
        let mut violations = Vec::new();
        let mut server_versions = 0;

        for server in &api.servers {
            let Some(url) = &server.url else {
                continue;
            };
            let tokens = version_tokens(url_path(url));
            server_versions = server_versions.max(tokens.len());
            if let Some(problem) = Self::server_problem(&tokens) {
                violations.push(ctx.violation(problem, server));
            }
        }

        for path in &api.paths {
            let count = version_tokens(&path.template).len();
            if count > 0 && server_versions + count > 1 {
                violations.push(ctx.violation("Version number is duplicated in path", path));
            }
        }
        Ok(violations)
    }
}

impl Rule for SingleVersionInUrl {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "URL must not duplicate version"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Must, Self::validate)]
    }
}
