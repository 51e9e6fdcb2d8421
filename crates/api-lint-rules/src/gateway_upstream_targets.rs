//! Rule requiring gateway upstream targets on the document.
//!
//! # Rationale
//!
//! The API gateway routes each environment to an upstream service. The
//! routing table lives in the document itself, so a document without it
//! cannot be deployed behind the gateway.
//!
//! # Detected Patterns
//!
//! - Missing (or non-object) root `x-gateway-upstream-targets`
//! - An `x-gateway-upstream-targets` object lacking one of the configured
//!   target keys (reported once, not per key)
//!
//! # Configuration
//!
//! ```toml
//! [rules.gateway-upstream-targets]
//! targets = { production = "https://prod.internal", test = "https://test.internal" }
//! # or simply: targets = ["production", "test"]
//! ```

use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};

/// Rule code for gateway-upstream-targets.
pub const CODE: &str = "251";

/// Rule name for gateway-upstream-targets.
pub const NAME: &str = "gateway-upstream-targets";

/// The root extension holding the routing table.
pub const EXTENSION: &str = "x-gateway-upstream-targets";

/// Requires `x-gateway-upstream-targets` with every configured target.
#[derive(Debug, Clone, Default)]
pub struct GatewayUpstreamTargets {
    targets: Vec<String>,
}

impl GatewayUpstreamTargets {
    /// Creates the rule without required targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target key the extension must contain.
    #[must_use]
    pub fn target(mut self, key: impl Into<String>) -> Self {
        self.targets.push(key.into());
        self
    }

    /// Builds the rule from `[rules.gateway-upstream-targets]`.
    ///
    /// # Errors
    ///
    /// Fails when `targets` is neither a table nor a string array.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            targets: config.get_keys("targets", &[])?,
        })
    }

    fn validate(&self, ctx: &Context<'_>) -> CheckResult {
        let extensions = &ctx.api().extensions;
        let pointer = extensions.pointer_of(EXTENSION);

        let Some(declared) = extensions.object(EXTENSION).ok() else {
            return Ok(vec![
                ctx.violation(format!("{EXTENSION} extension missing"), &pointer)
            ]);
        };

        if self.targets.iter().all(|key| declared.contains_key(key)) {
            Ok(vec![])
        } else {
            Ok(vec![ctx.violation(
                format!("{EXTENSION} is missing the expected targets"),
                &pointer,
            )])
        }
    }
}

impl Rule for GatewayUpstreamTargets {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Provide x-gateway-upstream-targets"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Must, |ctx| self.validate(ctx))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, descriptions, document, pointers};
    use api_lint_core::Config;

    fn rule() -> GatewayUpstreamTargets {
        GatewayUpstreamTargets::new().target("production").target("test")
    }

    #[test]
    fn missing_extension_is_reported_once() {
        let doc = document("openapi: 3.0.1\ninfo: {title: t}\n");
        let violations = check(&rule(), "validate", &doc);
        assert_eq!(descriptions(&violations), ["x-gateway-upstream-targets extension missing"]);
        assert_eq!(pointers(&violations), ["/x-gateway-upstream-targets"]);
        assert_eq!(violations[0].severity, Severity::Must);
    }

    #[test]
    fn non_object_extension_counts_as_missing() {
        let doc = document("openapi: 3.0.1\nx-gateway-upstream-targets: [production]\n");
        let violations = check(&rule(), "validate", &doc);
        assert_eq!(descriptions(&violations), ["x-gateway-upstream-targets extension missing"]);
    }

    #[test]
    fn missing_keys_are_reported_once() {
        let doc = document(
            r"
openapi: 3.0.1
x-gateway-upstream-targets:
  staging: https://stage
",
        );
        let violations = check(&rule(), "validate", &doc);
        assert_eq!(
            descriptions(&violations),
            ["x-gateway-upstream-targets is missing the expected targets"]
        );
        assert_eq!(pointers(&violations), ["/x-gateway-upstream-targets"]);
    }

    #[test]
    fn all_targets_present_passes() {
        let doc = document(
            r"
swagger: '2.0'
x-gateway-upstream-targets:
  production: https://prod
  test: https://test
  extra: https://extra
",
        );
        assert!(check(&rule(), "validate", &doc).is_empty());
    }

    #[test]
    fn targets_come_from_config_table() {
        let config = Config::parse(
            r#"
[rules.gateway-upstream-targets]
targets = { production = "https://prod" }
"#,
        )
        .unwrap();
        let rule = GatewayUpstreamTargets::from_config(&config.rule(NAME)).unwrap();
        assert_eq!(rule.targets, ["production"]);

        let doc = document("openapi: 3.0.1\nx-gateway-upstream-targets: {test: x}\n");
        assert_eq!(check(&rule, "validate", &doc).len(), 1);
    }

    #[test]
    fn unconfigured_rule_only_requires_the_extension() {
        let rule = GatewayUpstreamTargets::from_config(&RuleConfig::named(NAME)).unwrap();
        let doc = document("openapi: 3.0.1\nx-gateway-upstream-targets: {}\n");
        assert!(check(&rule, "validate", &doc).is_empty());
    }
}
