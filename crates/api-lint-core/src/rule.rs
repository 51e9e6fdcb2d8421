//! Rule and check abstractions.

use crate::audience::UnsupportedAudience;
use crate::context::Context;
use crate::pointer::JsonPointer;
use crate::types::{Severity, Violation};

/// Errors a check can raise instead of producing violations.
///
/// The [`Analyzer`](crate::Analyzer) isolates these: the failing check
/// contributes no violations and the error is recorded as a
/// [`CheckFailure`](crate::CheckFailure).
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// `x-audience` holds an unknown code.
    #[error(transparent)]
    UnsupportedAudience(#[from] UnsupportedAudience),

    /// A value had a type the check cannot interpret.
    #[error("unexpected value at `{pointer}`: expected {expected}, found {found}")]
    UnexpectedType {
        /// Where the value was found.
        pointer: JsonPointer,
        /// What the check expected.
        expected: &'static str,
        /// What was there instead.
        found: String,
    },

    /// Any other structural problem.
    #[error("{0}")]
    Other(String),
}

/// What a check returns.
pub type CheckResult = Result<Vec<Violation>, CheckError>;

type CheckFn<'r> = Box<dyn Fn(&Context<'_>) -> CheckResult + Send + Sync + 'r>;

/// A single validation function of a rule.
pub struct Check<'r> {
    name: &'static str,
    severity: Severity,
    run: CheckFn<'r>,
}

impl<'r> Check<'r> {
    /// Creates a check with its declared severity.
    pub fn new<F>(name: &'static str, severity: Severity, run: F) -> Self
    where
        F: Fn(&Context<'_>) -> CheckResult + Send + Sync + 'r,
    {
        Self {
            name,
            severity,
            run: Box::new(run),
        }
    }

    /// Name of the check, unique within its rule.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Runs the check against a context scoped to it.
    ///
    /// # Errors
    ///
    /// Propagates whatever the check function returns.
    pub fn run(&self, ctx: &Context<'_>) -> CheckResult {
        (self.run)(ctx)
    }
}

impl std::fmt::Debug for Check<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

/// A named guideline with one or more checks.
///
/// Rules are built once from their configuration and then evaluated against
/// any number of documents; they hold no per-document state.
///
/// # Example
///
/// ```ignore
/// use api_lint_core::{Check, CheckResult, Context, Rule, Severity};
///
/// pub struct RequireTitle;
///
/// impl RequireTitle {
///     fn validate(&self, ctx: &Context<'_>) -> CheckResult {
///         Ok(match ctx.api().info.title {
///             Some(_) => vec![],
///             None => vec![ctx.violation("API title is missing", &ctx.api().info)],
///         })
///     }
/// }
///
/// impl Rule for RequireTitle {
///     fn name(&self) -> &'static str { "require-title" }
///     fn code(&self) -> &'static str { "218" }
///
///     fn checks(&self) -> Vec<Check<'_>> {
///         vec![Check::new("validate", Severity::Must, |ctx| self.validate(ctx))]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "server-urls").
    fn name(&self) -> &'static str;

    /// Returns the guideline code (e.g., "252").
    fn code(&self) -> &'static str;

    /// Returns the guideline title.
    fn title(&self) -> &'static str {
        ""
    }

    /// Returns the severity of the guideline itself.
    fn default_severity(&self) -> Severity {
        Severity::Must
    }

    /// Returns the checks of this rule in execution order.
    fn checks(&self) -> Vec<Check<'_>>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpecificationDocument;
    use serde_json::json;

    struct TestRule {
        message: String,
    }

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "999"
        }

        fn checks(&self) -> Vec<Check<'_>> {
            vec![
                Check::new("always", Severity::Should, |ctx| {
                    Ok(vec![ctx.violation(self.message.as_str(), &ctx.api().info)])
                }),
                Check::new("never", Severity::Hint, |_| Ok(vec![])),
            ]
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = TestRule {
            message: "m".into(),
        };
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.title(), "");
        assert_eq!(rule.default_severity(), Severity::Must);
    }

    #[test]
    fn checks_borrow_rule_state() {
        let rule = TestRule {
            message: "from config".into(),
        };
        let doc = SpecificationDocument::from_value(&json!({"openapi": "3.0.0"})).unwrap();
        let checks = rule.checks();
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].name(), "always");

        let base = Context::new(&doc);
        let ctx = base.scoped("test-rule", "999", checks[0].name(), checks[0].severity());
        let violations = checks[0].run(&ctx).unwrap();
        assert_eq!(violations[0].description, "from config");
        assert_eq!(violations[0].severity, Severity::Should);
        assert_eq!(violations[0].pointer.to_string(), "/info");
    }
}
