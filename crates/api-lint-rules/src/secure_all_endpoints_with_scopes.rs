//! Rule requiring every endpoint to be protected by scopes.
//!
//! # Rationale
//!
//! Authentication alone says who the caller is; scopes say what the caller
//! may do. Every operation must therefore require at least one scope, and
//! every scope must follow the organization's naming scheme.
//!
//! # Detected Patterns
//!
//! - Declared OAuth2 scopes whose name does not fully match `scope_regex`
//! - Operations without any effective security requirement
//! - Operations requesting OAuth2 scopes their scheme does not declare
//! - Operations whose requirements name undeclared schemes, request no
//!   scopes, or request bearer scopes that do not match `scope_regex`
//!
//! Paths matching any `path_whitelist` regex (anywhere in the template) or
//! starting with any `path_whitelist_prefixes` entry are exempt from the
//! operation checks. Whitelist regexes must escape the braces of path
//! templates (`/orders/\{order-id\}`); prefixes are taken literally.
//!
//! # Configuration
//!
//! ```toml
//! [rules.secure-all-endpoints-with-scopes]
//! scope_regex = "[a-z-]+:(read|write|full)"
//! path_whitelist = ["^/health$", "/internal/"]
//! path_whitelist_prefixes = ["/orders/{order-id}/public"]
//! ```

use crate::pattern::FullMatch;
use api_lint_core::model::{FlowKind, RequirementEntry, SchemeKind, SecurityRequirement};
use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};
use regex::Regex;

/// Rule code for secure-all-endpoints-with-scopes.
pub const CODE: &str = "105";

/// Rule name for secure-all-endpoints-with-scopes.
pub const NAME: &str = "secure-all-endpoints-with-scopes";

/// Scope names accepted when `scope_regex` is not configured.
pub const DEFAULT_SCOPE_REGEX: &str = "[A-Za-z0-9._:/-]+";

const NOT_SCOPED: &str = "Endpoint is not secured by scope(s)";

/// Requires scoped security on every operation.
#[derive(Debug, Clone)]
pub struct SecureAllEndpointsWithScopes {
    scope_regex: FullMatch,
    path_whitelist: Vec<Regex>,
    path_whitelist_prefixes: Vec<String>,
}

impl SecureAllEndpointsWithScopes {
    /// Builds the rule from `[rules.secure-all-endpoints-with-scopes]`.
    ///
    /// # Errors
    ///
    /// Fails when `scope_regex` or an entry of `path_whitelist` is not a
    /// valid regex, or when `path_whitelist_prefixes` is not a string array.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            scope_regex: FullMatch::option(config, "scope_regex", DEFAULT_SCOPE_REGEX)?,
            path_whitelist: config.get_regex_array("path_whitelist", &[])?,
            path_whitelist_prefixes: config.get_str_array("path_whitelist_prefixes", &[])?,
        })
    }

    fn is_whitelisted(&self, template: &str) -> bool {
        self.path_whitelist.iter().any(|p| p.is_match(template))
            || self
                .path_whitelist_prefixes
                .iter()
                .any(|prefix| template.starts_with(prefix.as_str()))
    }

    fn check_defined_scope_formats(&self, ctx: &Context<'_>) -> CheckResult {
        let mut violations = Vec::new();
        let flows = ctx
            .security_schemes()
            .iter()
            .filter(|scheme| scheme.is_oauth2())
            .flat_map(|scheme| scheme.flows.iter())
            .filter(|flow| flow.kind != FlowKind::Unspecified);
        for flow in flows {
            for scope in flow.scopes.iter().filter(|s| !self.scope_regex.is_match(&s.name)) {
                violations.push(ctx.violation(
                    format!(
                        "scope '{}' does not match regex '{}'",
                        scope.name, self.scope_regex
                    ),
                    &flow.scopes_pointer,
                ));
            }
        }
        Ok(violations)
    }

    fn check_operations_are_scoped(&self, ctx: &Context<'_>) -> CheckResult {
        let mut violations = Vec::new();
        for entry in ctx.all_operations() {
            if self.is_whitelisted(entry.template) {
                continue;
            }
            let requirements = ctx.effective_security(entry.operation);
            if requirements.is_empty() {
                violations.push(ctx.violation(NOT_SCOPED, entry.operation));
                continue;
            }

            let undefined = undefined_oauth2_scopes(ctx, requirements);
            if !undefined.is_empty() {
                if let Some(block) = ctx.security_block(entry.operation) {
                    violations.push(ctx.violation(
                        format!(
                            "Endpoint is secured by undefined OAuth2 scope(s): {}",
                            undefined.join(", ")
                        ),
                        block,
                    ));
                }
                continue;
            }

            if requirements.iter().any(|r| self.is_satisfied(ctx, r)) {
                continue;
            }
            for requirement in requirements {
                let unknown: Vec<&str> = requirement
                    .entries
                    .iter()
                    .filter(|e| ctx.security_scheme(&e.scheme).is_none())
                    .map(|e| e.scheme.as_str())
                    .collect();
                let description = if unknown.is_empty() {
                    NOT_SCOPED.to_string()
                } else {
                    format!(
                        "Endpoint is secured by undefined security scheme(s): {}",
                        unknown.join(", ")
                    )
                };
                violations.push(ctx.violation(description, requirement));
            }
        }
        Ok(violations)
    }

    fn is_satisfied(&self, ctx: &Context<'_>, requirement: &SecurityRequirement) -> bool {
        !requirement.entries.is_empty()
            && requirement
                .entries
                .iter()
                .all(|entry| self.entry_is_satisfied(ctx, entry))
    }

    fn entry_is_satisfied(&self, ctx: &Context<'_>, entry: &RequirementEntry) -> bool {
        let Some(scheme) = ctx.security_scheme(&entry.scheme) else {
            return false;
        };
        match scheme.kind {
            SchemeKind::OAuth2 => {
                !entry.scopes.is_empty()
                    && entry.scopes.iter().all(|s| scheme.declares_scope(&s.name))
            }
            SchemeKind::HttpBearer => {
                !entry.scopes.is_empty()
                    && entry.scopes.iter().all(|s| self.scope_regex.is_match(&s.name))
            }
            SchemeKind::ApiKey | SchemeKind::Other(_) => true,
        }
    }
}

/// `scheme:scope` pairs requested from OAuth2 schemes that do not declare them.
fn undefined_oauth2_scopes(ctx: &Context<'_>, requirements: &[SecurityRequirement]) -> Vec<String> {
    requirements
        .iter()
        .flat_map(|r| r.entries.iter())
        .filter_map(|entry| {
            let scheme = ctx.security_scheme(&entry.scheme).filter(|s| s.is_oauth2())?;
            Some((entry, scheme))
        })
        .flat_map(|(entry, scheme)| {
            entry
                .scopes
                .iter()
                .filter(move |s| !scheme.declares_scope(&s.name))
                .map(move |s| format!("{}:{}", entry.scheme, s.name))
        })
        .collect()
}

impl Rule for SecureAllEndpointsWithScopes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Define and Assign Access Rights (Scopes)"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![
            Check::new("defined-scope-formats", Severity::Must, |ctx| {
                self.check_defined_scope_formats(ctx)
            }),
            Check::new("operations-are-scoped", Severity::Must, |ctx| {
                self.check_operations_are_scoped(ctx)
            }),
        ]
    }
}
