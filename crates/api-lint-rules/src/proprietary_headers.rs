//! Rule limiting headers to standardized or agreed custom ones.
//!
//! # Rationale
//!
//! Every proprietary header is a contract clients have to learn. Only
//! headers from the HTTP standards, plus a short list of organization-wide
//! custom headers, may appear in an API.
//!
//! # Detected Patterns
//!
//! - Header parameters (path-level or operation-level) whose name is not a
//!   standard request header or a custom header
//! - Response headers whose name is not a standard response header or a
//!   custom header
//!
//! Names are compared case-insensitively.
//!
//! # Configuration
//!
//! ```toml
//! [rules.proprietary-headers]
//! custom_headers = ["X-Flow-ID", "X-Tenant-ID"]
//! # standard_request_headers / standard_response_headers replace the
//! # built-in lists
//! ```

use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};
use std::collections::HashSet;

/// Rule code for proprietary-headers.
pub const CODE: &str = "183";

/// Rule name for proprietary-headers.
pub const NAME: &str = "proprietary-headers";

/// Request headers accepted without configuration.
pub const STANDARD_REQUEST_HEADERS: &[&str] = &[
    "Accept",
    "Accept-Charset",
    "Accept-Encoding",
    "Accept-Language",
    "Authorization",
    "Cache-Control",
    "Content-Encoding",
    "Content-Language",
    "Content-Length",
    "Content-Location",
    "Content-Type",
    "Cookie",
    "Date",
    "Forwarded",
    "If-Match",
    "If-Modified-Since",
    "If-None-Match",
    "If-Range",
    "If-Unmodified-Since",
    "Idempotency-Key",
    "Prefer",
    "Range",
    "User-Agent",
];

/// Response headers accepted without configuration.
pub const STANDARD_RESPONSE_HEADERS: &[&str] = &[
    "Accept-Ranges",
    "Age",
    "Allow",
    "Cache-Control",
    "Content-Disposition",
    "Content-Encoding",
    "Content-Language",
    "Content-Length",
    "Content-Location",
    "Content-Range",
    "Content-Type",
    "Date",
    "ETag",
    "Expires",
    "Last-Modified",
    "Link",
    "Location",
    "Preference-Applied",
    "Retry-After",
    "Vary",
    "WWW-Authenticate",
];

/// Restricts header names to an allow-list.
#[derive(Debug, Clone)]
pub struct ProprietaryHeaders {
    request_headers: HashSet<String>,
    response_headers: HashSet<String>,
}

impl Default for ProprietaryHeaders {
    fn default() -> Self {
        Self::new()
    }
}

fn lowercase_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|n| n.as_ref().to_lowercase()).collect()
}

impl ProprietaryHeaders {
    /// Creates the rule with the standard header lists and no custom headers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_headers: lowercase_set(STANDARD_REQUEST_HEADERS),
            response_headers: lowercase_set(STANDARD_RESPONSE_HEADERS),
        }
    }

    /// Allows a custom header in requests and responses.
    #[must_use]
    pub fn custom_header(mut self, name: &str) -> Self {
        self.request_headers.insert(name.to_lowercase());
        self.response_headers.insert(name.to_lowercase());
        self
    }

    /// Builds the rule from `[rules.proprietary-headers]`.
    ///
    /// # Errors
    ///
    /// Fails when a header list is not an array of strings.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let custom = config.get_str_array("custom_headers", &[])?;
        let mut request = config.get_str_array("standard_request_headers", STANDARD_REQUEST_HEADERS)?;
        let mut response =
            config.get_str_array("standard_response_headers", STANDARD_RESPONSE_HEADERS)?;
        request.extend(custom.iter().cloned());
        response.extend(custom);
        Ok(Self {
            request_headers: lowercase_set(request),
            response_headers: lowercase_set(response),
        })
    }

    fn validate_request_headers(&self, ctx: &Context<'_>) -> CheckResult {
        let mut violations = Vec::new();
        for path_item in &ctx.api().paths {
            let path_level = path_item.parameters.iter();
            let operation_level = path_item.operations.iter().flat_map(|op| op.parameters.iter());
            for parameter in path_level.chain(operation_level).filter(|p| p.is_header()) {
                let Some(name) = &parameter.name else {
                    continue;
                };
                if !self.request_headers.contains(&name.to_lowercase()) {
                    violations.push(
                        ctx.violation("use only standardized or specified request headers", parameter),
                    );
                }
            }
        }
        Ok(violations)
    }

    fn validate_response_headers(&self, ctx: &Context<'_>) -> CheckResult {
        Ok(ctx
            .all_operations()
            .flat_map(|entry| entry.operation.responses.iter())
            .flat_map(|response| response.headers.iter())
            .filter(|header| !self.response_headers.contains(&header.name.to_lowercase()))
            .map(|header| ctx.violation("use only standardized or specified response headers", header))
            .collect())
    }
}

impl Rule for ProprietaryHeaders {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Use Only the Specified Proprietary Headers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Should
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("request-headers", Severity::Should, |ctx| {
                self.validate_request_headers(ctx)
            }),
            Check::new("response-headers", Severity::Should, |ctx| {
                self.validate_response_headers(ctx)
            }),
        ]
    }
}
