//! Helpers shared by rule tests.

use api_lint_core::{CheckResult, Context, Rule, SpecificationDocument, Violation};

/// Builds a model from inline YAML.
pub(crate) fn document(yaml: &str) -> SpecificationDocument {
    let value: serde_json::Value = serde_yaml::from_str(yaml).unwrap();
    SpecificationDocument::from_value(&value).unwrap()
}

/// Runs one named check the way the analyzer would.
pub(crate) fn try_check(rule: &dyn Rule, check: &str, doc: &SpecificationDocument) -> CheckResult {
    let checks = rule.checks();
    let check = checks
        .iter()
        .find(|c| c.name() == check)
        .unwrap_or_else(|| panic!("{} has no check named {check}", rule.name()));
    let base = Context::new(doc);
    let ctx = base.scoped(rule.name(), rule.code(), check.name(), check.severity());
    check.run(&ctx)
}

/// Runs one named check and expects it to succeed.
pub(crate) fn check(rule: &dyn Rule, check: &str, doc: &SpecificationDocument) -> Vec<Violation> {
    try_check(rule, check, doc).unwrap()
}

/// Runs every check of a rule in order.
pub(crate) fn all(rule: &dyn Rule, doc: &SpecificationDocument) -> Vec<Violation> {
    rule.checks()
        .iter()
        .flat_map(|c| check(rule, c.name(), doc))
        .collect()
}

pub(crate) fn descriptions(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.description.as_str()).collect()
}

pub(crate) fn pointers(violations: &[Violation]) -> Vec<String> {
    violations.iter().map(|v| v.pointer.to_string()).collect()
}
