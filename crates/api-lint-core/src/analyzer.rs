//! Core analyzer for orchestrating rule execution.

use crate::config::Config;
use crate::context::Context;
use crate::model::SpecificationDocument;
use crate::rule::{Check, Rule, RuleBox};
use crate::types::{CheckFailure, LintResult, Severity, Violation};

use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    parallel: Option<bool>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules, keeping their order.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides `[analyzer] parallel` from the configuration.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Builds the analyzer.
    #[must_use]
    pub fn build(self) -> Analyzer {
        let config = self.config.unwrap_or_default();
        let parallel = self.parallel.unwrap_or(config.analyzer.parallel);
        Analyzer {
            rules: self.rules,
            config,
            parallel,
        }
    }
}

/// Runs every check of every enabled rule against a document.
///
/// Use [`Analyzer::builder()`] to construct an instance. An analyzer holds no
/// per-document state and can be reused for any number of documents.
pub struct Analyzer {
    rules: Vec<RuleBox>,
    config: Config,
    parallel: bool,
}

struct PlannedCheck<'r> {
    rule: &'r dyn Rule,
    check: Check<'r>,
    severity: Severity,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the registered rules in execution order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyzes one document.
    ///
    /// Violations come back grouped by rule registration order, then by
    /// check order, then in the order each check reported them, no matter
    /// whether checks ran in parallel. A check that errors or panics
    /// contributes no violations and is recorded in
    /// [`LintResult::failures`].
    #[must_use]
    pub fn analyze(&self, document: &SpecificationDocument) -> LintResult {
        let plan = self.plan();
        let base = Context::new(document);

        let outcomes: Vec<Result<Vec<Violation>, CheckFailure>> = if self.parallel {
            plan.par_iter().map(|p| run_check(&base, p)).collect()
        } else {
            plan.iter().map(|p| run_check(&base, p)).collect()
        };

        let mut result = LintResult::new();
        result.checks_run = plan.len();
        for outcome in outcomes {
            match outcome {
                Ok(violations) => result.violations.extend(violations),
                Err(failure) => {
                    warn!("Check {}::{} failed: {}", failure.rule, failure.check, failure.message);
                    result.failures.push(failure);
                }
            }
        }

        info!(
            "Analysis complete: {} violation(s) from {} check(s)",
            result.violations.len(),
            result.checks_run
        );
        result
    }

    fn plan(&self) -> Vec<PlannedCheck<'_>> {
        let mut plan = Vec::new();
        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }
            let severity_override = self.config.rule_severity(rule.name());
            for check in rule.checks() {
                let severity = severity_override.unwrap_or(check.severity());
                plan.push(PlannedCheck {
                    rule: rule.as_ref(),
                    check,
                    severity,
                });
            }
        }
        plan
    }
}

fn run_check(base: &Context<'_>, planned: &PlannedCheck<'_>) -> Result<Vec<Violation>, CheckFailure> {
    let ctx = base.scoped(
        planned.rule.name(),
        planned.rule.code(),
        planned.check.name(),
        planned.severity,
    );
    let failure = |message: String| CheckFailure {
        rule: planned.rule.name().to_string(),
        check: planned.check.name().to_string(),
        message,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| planned.check.run(&ctx))) {
        Ok(Ok(violations)) => Ok(violations),
        Ok(Err(err)) => Err(failure(err.to_string())),
        Err(payload) => Err(failure(format!("panicked: {}", panic_message(&*payload)))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return s;
    }
    payload
        .downcast_ref::<String>()
        .map_or("unknown panic payload", String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{CheckError, CheckResult};
    use serde_json::json;

    struct Fixed {
        name: &'static str,
        count: usize,
    }

    impl Rule for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            "900"
        }
        fn checks(&self) -> Vec<Check<'_>> {
            vec![
                Check::new("servers", Severity::Should, |ctx| {
                    Ok(ctx
                        .api()
                        .servers
                        .iter()
                        .take(self.count)
                        .map(|s| ctx.violation(format!("{} server", self.name), s))
                        .collect())
                }),
                Check::new("info", Severity::Hint, |ctx| {
                    Ok(vec![ctx.violation(format!("{} info", self.name), &ctx.api().info)])
                }),
            ]
        }
    }

    struct Broken;

    impl Broken {
        fn fails(&self, _ctx: &Context<'_>) -> CheckResult {
            Err(CheckError::Other("boom".into()))
        }
    }

    impl Rule for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }
        fn code(&self) -> &'static str {
            "901"
        }
        fn checks(&self) -> Vec<Check<'_>> {
            vec![
                Check::new("errors", Severity::Must, |ctx| self.fails(ctx)),
                Check::new("panics", Severity::Must, |_| panic!("exploded")),
                Check::new("works", Severity::Must, |ctx| {
                    Ok(vec![ctx.violation("still here", &ctx.api().info)])
                }),
            ]
        }
    }

    fn document() -> SpecificationDocument {
        SpecificationDocument::from_value(&json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://a"}, {"url": "https://b"}]
        }))
        .unwrap()
    }

    fn descriptions(result: &LintResult) -> Vec<&str> {
        result
            .violations
            .iter()
            .map(|v| v.description.as_str())
            .collect()
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .rule(Fixed { name: "one", count: 1 })
            .rule_box(Box::new(Broken))
            .build();
        assert_eq!(analyzer.rule_count(), 2);
        assert!(analyzer.parallel);
    }

    #[test]
    fn output_follows_rule_then_check_order() {
        let analyzer = Analyzer::builder()
            .rule(Fixed { name: "b", count: 2 })
            .rule(Fixed { name: "a", count: 1 })
            .build();
        let result = analyzer.analyze(&document());
        assert_eq!(
            descriptions(&result),
            ["b server", "b server", "b info", "a server", "a info"]
        );
        assert_eq!(result.violations[1].pointer.to_string(), "/servers/1");
        assert_eq!(result.checks_run, 4);
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let build = |parallel| {
            Analyzer::builder()
                .rule(Fixed { name: "x", count: 2 })
                .rule(Broken)
                .rule(Fixed { name: "y", count: 1 })
                .parallel(parallel)
                .build()
        };
        let doc = document();
        let a = build(true).analyze(&doc);
        let b = build(false).analyze(&doc);
        assert_eq!(a.violations, b.violations);
        assert_eq!(a.failures, b.failures);
    }

    #[test]
    fn failing_checks_are_isolated() {
        let analyzer = Analyzer::builder()
            .rule(Broken)
            .rule(Fixed { name: "after", count: 0 })
            .parallel(false)
            .build();
        let result = analyzer.analyze(&document());

        assert_eq!(descriptions(&result), ["still here", "after info"]);
        assert_eq!(result.failures.len(), 2);
        assert_eq!(result.failures[0].check, "errors");
        assert_eq!(result.failures[0].message, "boom");
        assert_eq!(result.failures[1].check, "panics");
        assert!(result.failures[1].message.contains("exploded"));
    }

    #[test]
    fn disabled_rules_are_skipped_and_severity_overridden() {
        let config = Config::parse(
            r#"
[rules.off]
enabled = false

[rules.loud]
severity = "MUST"
"#,
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .config(config)
            .rule(Fixed { name: "off", count: 2 })
            .rule(Fixed { name: "loud", count: 1 })
            .build();
        let result = analyzer.analyze(&document());

        assert_eq!(descriptions(&result), ["loud server", "loud info"]);
        assert!(result.violations.iter().all(|v| v.severity == Severity::Must));
        assert_eq!(result.checks_run, 2);
    }

    #[test]
    fn declared_check_severity_is_used_without_override() {
        let analyzer = Analyzer::builder().rule(Fixed { name: "r", count: 1 }).build();
        let result = analyzer.analyze(&document());
        assert_eq!(result.violations[0].severity, Severity::Should);
        assert_eq!(result.violations[1].severity, Severity::Hint);
        assert_eq!(result.violations[0].code, "900");
        assert_eq!(result.violations[0].check, "servers");
    }

    #[test]
    fn analyzing_twice_is_identical() {
        let analyzer = Analyzer::builder()
            .rule(Fixed { name: "x", count: 2 })
            .rule(Broken)
            .build();
        let doc = document();
        let first = serde_json::to_string(&analyzer.analyze(&doc)).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&doc)).unwrap();
        assert_eq!(first, second);
    }
}
