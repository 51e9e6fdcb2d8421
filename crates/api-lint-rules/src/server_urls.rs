//! Rule checking the shape of server URLs.
//!
//! # Rationale
//!
//! Server URLs encode where an API is reachable: public APIs live under the
//! `public.api` host, everything else under `api`. The first path segment is
//! the major version and the second the lowercase, hyphenated resource name.
//! One server URL is templated with `{env}` so that every environment can be
//! addressed.
//!
//! # Detected Patterns
//!
//! - Server URLs not matching the pattern for the document's audience
//! - Server lists where every URL matches but none is templated with `{env}`
//! - `{env}` templates without an `env` variable declaring the expected
//!   values and default
//!
//! The pattern is chosen from `info.x-audience` on every run; an unknown
//! audience fails the check instead of silently using one of the patterns.
//!
//! # Configuration
//!
//! ```toml
//! [rules.server-urls]
//! domain = "example.com"
//! env_values = [".dev", ".env"]
//! env_default = ".dev"
//! # Resource segments must end in `s` (a naive plural test)
//! require_plural = false
//! # public_pattern / internal_pattern replace the generated patterns
//! ```

use api_lint_core::model::Server;
use api_lint_core::{
    ApiAudience, Check, CheckResult, ConfigError, Context, JsonPointer, Rule, RuleConfig,
    Severity,
};
use regex::Regex;

/// Rule code for server-urls.
pub const CODE: &str = "252";

/// Rule name for server-urls.
pub const NAME: &str = "server-urls";

/// Domain used when `domain` is not configured.
pub const DEFAULT_DOMAIN: &str = "example.com";

const ENV_PLACEHOLDER: &str = "{env}";

fn resource_token(plural: bool) -> &'static str {
    if plural {
        "[a-z]+(-[a-z]+)*s"
    } else {
        "[a-z]+(-[a-z]+)*"
    }
}

/// Pattern for `external-public` APIs under `domain`.
#[must_use]
pub fn public_pattern(domain: &str, plural: bool) -> String {
    format!(
        r"^https://public\.api(\.)?(\{{env\}}\.)?{}/v\d+/{}$",
        regex::escape(domain),
        resource_token(plural)
    )
}

/// Pattern for every other audience under `domain`.
#[must_use]
pub fn internal_pattern(domain: &str, plural: bool) -> String {
    format!(
        r"^https?://api(\.)?(\{{env\}}\.)?{}/v\d+/{}$",
        regex::escape(domain),
        resource_token(plural)
    )
}

/// Validates server URLs against audience-specific patterns.
#[derive(Debug, Clone)]
pub struct ServerUrls {
    public: Regex,
    internal: Regex,
    env_values: Vec<String>,
    env_default: String,
}

impl ServerUrls {
    /// Builds the rule from `[rules.server-urls]`.
    ///
    /// # Errors
    ///
    /// Fails when an option has the wrong type or a pattern does not compile.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let domain = config.get_str("domain", DEFAULT_DOMAIN)?;
        let plural = config.get_bool("require_plural", false)?;
        Ok(Self {
            public: config.get_regex("public_pattern", &public_pattern(domain, plural))?,
            internal: config.get_regex("internal_pattern", &internal_pattern(domain, plural))?,
            env_values: config.get_str_array("env_values", &[".dev", ".env"])?,
            env_default: config.get_str("env_default", ".dev")?.to_string(),
        })
    }

    /// The pattern server URLs must match for `audience`.
    #[must_use]
    pub fn pattern_for(&self, audience: Option<ApiAudience>) -> &Regex {
        match audience {
            Some(ApiAudience::ExternalPublic) => &self.public,
            Some(ApiAudience::CompanyInternal | ApiAudience::ComponentInternal) | None => {
                &self.internal
            }
        }
    }

    fn validate(&self, ctx: &Context<'_>) -> CheckResult {
        let pattern = self.pattern_for(ctx.api_audience()?);
        let servers = &ctx.api().servers;

        let failing: Vec<&Server> = servers
            .iter()
            .filter(|s| !s.url.as_deref().is_some_and(|url| pattern.is_match(url)))
            .collect();
        if !failing.is_empty() {
            return Ok(failing
                .into_iter()
                .map(|server| ctx.violation(format!("url doesn't pass regex {pattern}"), server))
                .collect());
        }

        let templated = servers
            .iter()
            .any(|s| s.url.as_deref().is_some_and(|url| url.contains(ENV_PLACEHOLDER)));
        if servers.is_empty() || templated {
            return Ok(vec![]);
        }
        Ok(vec![ctx.violation(
            "servers must contain one templated url containing {env}",
            &JsonPointer::root().child("servers"),
        )])
    }

    fn validate_env(&self, ctx: &Context<'_>) -> CheckResult {
        Ok(ctx
            .api()
            .servers
            .iter()
            .filter(|s| s.url.as_deref().is_some_and(|url| url.contains(ENV_PLACEHOLDER)))
            .filter(|s| !self.declares_env(s))
            .map(|s| ctx.violation("missing env variable for template", s))
            .collect())
    }

    fn declares_env(&self, server: &Server) -> bool {
        server.variable("env").is_some_and(|env| {
            env.allowed.as_deref() == Some(self.env_values.as_slice())
                && env.default.as_deref() == Some(self.env_default.as_str())
        })
    }
}

impl Rule for ServerUrls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Servers"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("validate", Severity::Must, |ctx| self.validate(ctx)),
            Check::new("validate-env", Severity::Must, |ctx| self.validate_env(ctx)),
        ]
    }
}
