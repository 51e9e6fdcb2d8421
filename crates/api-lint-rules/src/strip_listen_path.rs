//! Rule checking the type of `x-gateway-strip-listen-path`.
//!
//! # Detected Patterns
//!
//! - A root `x-gateway-strip-listen-path` that is set but not a boolean
//!
//! An absent or `null` extension passes; the gateway default applies.

use api_lint_core::model::ExtensionValue;
use api_lint_core::{Check, CheckResult, Context, Rule, Severity};

/// Rule code for strip-listen-path.
pub const CODE: &str = "250";

/// Rule name for strip-listen-path.
pub const NAME: &str = "strip-listen-path";

/// The root extension controlling listen path stripping.
pub const EXTENSION: &str = "x-gateway-strip-listen-path";

/// Requires `x-gateway-strip-listen-path` to be a boolean when set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripListenPath;

impl StripListenPath {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn validate(ctx: &Context<'_>) -> CheckResult {
        let extensions = &ctx.api().extensions;
        Ok(match extensions.bool(EXTENSION) {
            ExtensionValue::Absent | ExtensionValue::Present(_) => vec![],
            ExtensionValue::WrongType(_) => vec![ctx.violation(
                "Strip listen path must be a boolean",
                &extensions.pointer_of(EXTENSION),
            )],
        })
    }
}

impl Rule for StripListenPath {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Strip Gateway listen Path"
    }

    fn default_severity(&self) -> Severity {
        Severity::May
    }

    fn checks(&self) -> Vec<Check<'_>> {
        vec![Check::new("validate", Severity::Must, Self::validate)]
    }
}
