//! Rule requiring an API identifier in `info.x-api-id`.
//!
//! # Rationale
//!
//! The identifier ties a document to its entry in the API catalogue. It
//! states the audience class, the resource and the major version, e.g.
//! `internal-titles-v1`.
//!
//! # Configuration
//!
//! ```toml
//! [rules.api-identifier]
//! pattern = '(public|internal)-[a-z]+(-[a-z]+)*-v\d{1,2}'
//! ```
//!
//! The pattern must match the whole identifier.

use crate::pattern::FullMatch;
use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};

/// Rule code for api-identifier.
pub const CODE: &str = "215";

/// Rule name for api-identifier.
pub const NAME: &str = "api-identifier";

/// The `info` extension holding the identifier.
pub const EXTENSION: &str = "x-api-id";

/// Identifier pattern used when `pattern` is not configured.
pub const DEFAULT_PATTERN: &str = r"^(public|internal)-[a-z]+(-[a-z]+)*-v\d{1,2}$";

/// Requires `info.x-api-id` in the agreed format.
#[derive(Debug, Clone)]
pub struct ApiIdentifier {
    pattern: FullMatch,
}

impl ApiIdentifier {
    /// Builds the rule from `[rules.api-identifier]`.
    ///
    /// # Errors
    ///
    /// Fails when `pattern` is not a valid regex.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            pattern: FullMatch::option(config, "pattern", DEFAULT_PATTERN)?,
        })
    }

    fn validate(&self, ctx: &Context<'_>) -> CheckResult {
        let info = &ctx.api().info;
        let pointer = info.extensions.pointer_of(EXTENSION);
        Ok(match info.extensions.str(EXTENSION).ok() {
            None => vec![ctx.violation("API identifier should be provided", &pointer)],
            Some(id) if self.pattern.is_match(id) => vec![],
            Some(id) => vec![ctx.violation(
                format!("API identifier '{id}' doesn't match '{}'", self.pattern),
                &pointer,
            )],
        })
    }
}

impl Rule for ApiIdentifier {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Provide API Identifier"
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Must, |ctx| self.validate(ctx))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, descriptions, document, pointers};

    fn with_api_id(id: &str) -> Vec<api_lint_core::Violation> {
        let rule = ApiIdentifier::from_config(&RuleConfig::named(NAME)).unwrap();
        let doc = document(&format!("openapi: '3.0.0'\ninfo:\n  x-api-id: {id}\npaths: {{}}\n"));
        check(&rule, "validate", &doc)
    }

    #[test]
    fn public_and_internal_ids_pass() {
        assert!(with_api_id("public-titles-v1").is_empty());
        assert!(with_api_id("internal-land-titles-v12").is_empty());
    }

    #[test]
    fn malformed_ids_are_reported() {
        for id in [
            "partner-titles-v1",
            "partner-api-v",
            "internal-titles-v123",
            "internal-titles",
            "internal-v1",
            "internal",
            "'This?iS//some|Incorrect+&ApI)(id!!!'",
        ] {
            let violations = with_api_id(id);
            assert_eq!(pointers(&violations), ["/info/x-api-id"], "{id}");
            assert!(violations[0].description.contains("doesn't match"), "{id}");
        }
    }

    #[test]
    fn message_names_id_and_pattern() {
        assert_eq!(
            descriptions(&with_api_id("internal")),
            [format!("API identifier 'internal' doesn't match '{DEFAULT_PATTERN}'")]
        );
    }

    #[test]
    fn missing_or_null_id_is_reported() {
        let violations = with_api_id("null");
        assert_eq!(descriptions(&violations), ["API identifier should be provided"]);
        assert_eq!(pointers(&violations), ["/info/x-api-id"]);

        let rule = ApiIdentifier::from_config(&RuleConfig::named(NAME)).unwrap();
        let bare = check(&rule, "validate", &document("swagger: '2.0'\n"));
        assert_eq!(descriptions(&bare), ["API identifier should be provided"]);
    }

    #[test]
    fn custom_pattern_is_anchored() {
        let config = RuleConfig::named(NAME).with_option("pattern", "[a-z]+-v1");
        let rule = ApiIdentifier::from_config(&config).unwrap();
        let doc = document("openapi: 3.0.1\ninfo:\n  x-api-id: titles-v12\n");
        assert_eq!(check(&rule, "validate", &doc).len(), 1);
    }
}
