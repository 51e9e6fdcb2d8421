//! Rule enforcing a naming suffix for date and time properties.
//!
//! # Rationale
//!
//! A consistent suffix (`createdAt`, `modified_at`) makes timestamps
//! recognizable without looking at the schema.
//!
//! # Detected Patterns
//!
//! - Properties of type `string` with format `date` or `date-time` whose
//!   name does not fully match one of the configured patterns, anywhere in
//!   `components.schemas` (v3) or `definitions` (v2), including nested
//!   objects, array items and `allOf`/`anyOf`/`oneOf` members
//!
//! # Configuration
//!
//! ```toml
//! [rules.date-time-properties-suffix]
//! patterns = ["[a-z][a-zA-Z0-9]*At", "was_.*"]
//! ```

use crate::pattern::FullMatch;
use api_lint_core::model::Property;
use api_lint_core::{Check, CheckResult, ConfigError, Context, Rule, RuleConfig, Severity};

/// Rule code for date-time-properties-suffix.
pub const CODE: &str = "235";

/// Rule name for date-time-properties-suffix.
pub const NAME: &str = "date-time-properties-suffix";

/// Accepted names when `patterns` is not configured: camelCase `...At` or
/// snake_case `..._at`.
pub const DEFAULT_PATTERNS: &[&str] = &["[a-z][a-zA-Z0-9]*At", "[a-z][a-z0-9]*(_[a-z0-9]+)*_at"];

/// Requires date and time properties to follow a naming pattern.
#[derive(Debug, Clone)]
pub struct DateTimePropertiesSuffix {
    patterns: Vec<FullMatch>,
}

impl DateTimePropertiesSuffix {
    /// Builds the rule from `[rules.date-time-properties-suffix]`.
    ///
    /// # Errors
    ///
    /// Fails when `patterns` is not an array of valid regexes.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: FullMatch::options(config, "patterns", DEFAULT_PATTERNS)?,
        })
    }

    fn message(&self, name: &str, schema_type: &str, format: &str) -> String {
        let patterns: Vec<&str> = self.patterns.iter().map(FullMatch::as_str).collect();
        format!(
            "Date/time property '{name}' ({schema_type}, {format}) should match one of: {}",
            patterns.join(", ")
        )
    }

    fn validate(&self, ctx: &Context<'_>) -> CheckResult {
        let mut violations = Vec::new();
        for named in &ctx.api().components.schemas {
            named.schema.walk_properties(&mut |property: &Property| {
                let schema = &property.schema;
                if schema.schema_type.as_deref() != Some("string") {
                    return;
                }
                let Some(format @ ("date" | "date-time")) = schema.format.as_deref() else {
                    return;
                };
                if !self.patterns.iter().any(|p| p.is_match(&property.name)) {
                    violations.push(
                        ctx.violation(self.message(&property.name, "string", format), property),
                    );
                }
            });
        }
        Ok(violations)
    }
}

impl Rule for DateTimePropertiesSuffix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Use Standard Suffixes for Date and Time Properties"
    }

    fn default_severity(&self) -> Severity {
        Severity::Should
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Should, |ctx| self.validate(ctx))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, descriptions, document, pointers};

    fn rule() -> DateTimePropertiesSuffix {
        DateTimePropertiesSuffix::from_config(&RuleConfig::named(NAME)).unwrap()
    }

    const CAR: &str = r"
openapi: '3.0.1'
info:
  title: Test API
components:
  schemas:
    Car:
      properties:
        created:
          type: string
          format: date-time
        occurred:
          type: string
          format: date
        returnedAt:
          type: string
          format: date-time
        modified_at:
          type: string
          format: date
        colour:
          type: string
        year:
          type: integer
          format: date
";

    #[test]
    fn unsuffixed_date_properties_are_reported() {
        let rule = rule();
        let violations = check(&rule, "validate", &document(CAR));
        assert_eq!(
            pointers(&violations),
            [
                "/components/schemas/Car/properties/created",
                "/components/schemas/Car/properties/occurred",
            ]
        );
        assert_eq!(
            violations[0].description,
            rule.message("created", "string", "date-time")
        );
        assert_eq!(violations[0].severity, Severity::Should);
    }

    #[test]
    fn nested_and_v2_properties_are_checked() {
        let doc = document(
            r"
swagger: '2.0'
definitions:
  Order:
    properties:
      lines:
        type: array
        items:
          properties:
            shipped:
              type: string
              format: date
      audit:
        allOf:
          - properties:
              changedAt:
                type: string
                format: date-time
              changed:
                type: string
                format: date-time
",
        );
        assert_eq!(
            pointers(&check(&rule(), "validate", &doc)),
            [
                "/definitions/Order/properties/lines/items/properties/shipped",
                "/definitions/Order/properties/audit/allOf/0/properties/changed",
            ]
        );
    }

    #[test]
    fn patterns_are_configurable() {
        let config = RuleConfig::named(NAME).with_option("patterns", vec!["was_.*"]);
        let rule = DateTimePropertiesSuffix::from_config(&config).unwrap();
        let violations = check(&rule, "validate", &document(CAR));
        assert_eq!(violations.len(), 4);
        assert!(descriptions(&violations)[0].ends_with("should match one of: was_.*"));
    }

    #[test]
    fn documents_without_schemas_pass() {
        assert!(check(&rule(), "validate", &document("openapi: 3.0.1\n")).is_empty());
    }
}
