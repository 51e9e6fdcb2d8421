//! Rule requiring bearer authentication for every endpoint.
//!
//! # Rationale
//!
//! Internal APIs are called with tokens issued by the identity provider, so
//! HTTP bearer authentication is the only accepted security scheme. OAuth2
//! and API keys are recognized by the model but rejected by this guideline.
//!
//! # Detected Patterns
//!
//! - A protected audience (see configuration) with no bearer scheme declared
//! - Any declared scheme that is not a bearer scheme
//! - OAuth2 scopes requested by an operation but not declared by any flow of
//!   the scheme (OpenAPI 3 only)
//!
//! # Configuration
//!
//! ```toml
//! [rules.secure-all-endpoints]
//! protected_audiences = ["company-internal", "component-internal"]
//! ```

use api_lint_core::{
    ApiAudience, Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity,
};

/// Rule code for secure-all-endpoints.
pub const CODE: &str = "104";

/// Rule name for secure-all-endpoints.
pub const NAME: &str = "secure-all-endpoints";

const MISSING_BEARER: &str = "API must be secured by Bearer Authentication";

/// Requires bearer authentication and declared scopes.
#[derive(Debug, Clone)]
pub struct SecureAllEndpoints {
    protected_audiences: Vec<String>,
}

impl Default for SecureAllEndpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureAllEndpoints {
    /// Creates the rule protecting the internal audiences.
    #[must_use]
    pub fn new() -> Self {
        Self {
            protected_audiences: [ApiAudience::CompanyInternal, ApiAudience::ComponentInternal]
                .iter()
                .map(|a| a.code().to_string())
                .collect(),
        }
    }

    /// Replaces the audiences that must declare a bearer scheme.
    #[must_use]
    pub fn protected_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_audiences = audiences.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the rule from `[rules.secure-all-endpoints]`.
    ///
    /// # Errors
    ///
    /// Fails when `protected_audiences` is not an array of strings.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let defaults = Self::new();
        let defaults: Vec<&str> = defaults.protected_audiences.iter().map(String::as_str).collect();
        Ok(Self {
            protected_audiences: config.get_str_array("protected_audiences", &defaults)?,
        })
    }

    fn is_protected(&self, ctx: &Context<'_>) -> bool {
        ctx.audience()
            .is_some_and(|audience| self.protected_audiences.iter().any(|p| p == audience))
    }

    fn check_has_bearer_scheme(&self, ctx: &Context<'_>) -> CheckResult {
        if !self.is_protected(ctx) || ctx.security_schemes().iter().any(|s| s.is_bearer()) {
            return Ok(vec![]);
        }
        Ok(vec![ctx.violation(MISSING_BEARER, ctx.security_schemes_pointer())])
    }

    fn check_no_invalid_schemes(ctx: &Context<'_>) -> CheckResult {
        Ok(ctx
            .security_schemes()
            .iter()
            .filter(|scheme| !scheme.is_bearer())
            .map(|scheme| ctx.violation(MISSING_BEARER, scheme))
            .collect())
    }

    fn check_used_scopes_are_declared(ctx: &Context<'_>) -> CheckResult {
        if !ctx.is_openapi3() {
            return Ok(vec![]);
        }
        let mut violations = Vec::new();
        for entry in ctx.all_operations() {
            let Some(security) = &entry.operation.security else {
                continue;
            };
            for requirement in security.requirements.iter().flat_map(|r| r.entries.iter()) {
                let Some(scheme) = ctx
                    .security_scheme(&requirement.scheme)
                    .filter(|s| s.is_oauth2())
                else {
                    continue;
                };
                for scope in requirement.scopes.iter().filter(|s| !scheme.declares_scope(&s.name)) {
                    violations.push(ctx.violation(
                        format!(
                            "The scope '{}/{}' is not specified in security definition",
                            requirement.scheme, scope.name
                        ),
                        scope,
                    ));
                }
            }
        }
        Ok(violations)
    }
}

impl Rule for SecureAllEndpoints {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Secure Endpoints"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("has-valid-security-schemes", Severity::Must, |ctx| {
                self.check_has_bearer_scheme(ctx)
            }),
            Check::new(
                "has-no-invalid-security-schemes",
                Severity::Must,
                Self::check_no_invalid_schemes,
            ),
            Check::new(
                "used-scopes-are-specified",
                Severity::Must,
                Self::check_used_scopes_are_declared,
            ),
        ]
    }
}
