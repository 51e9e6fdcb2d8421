//! Core types for violations and lint results.

use crate::pointer::JsonPointer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a violation, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Style hint.
    #[serde(alias = "hint")]
    Hint,
    /// Optional guideline.
    #[serde(alias = "may")]
    May,
    /// Recommended guideline.
    #[serde(alias = "should")]
    Should,
    /// Mandatory guideline.
    #[serde(alias = "must")]
    Must,
}

impl Severity {
    /// All severities, highest first.
    pub const DESCENDING: [Self; 4] = [Self::Must, Self::Should, Self::May, Self::Hint];

    /// Uppercase name as used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hint => "HINT",
            Self::May => "MAY",
            Self::Should => "SHOULD",
            Self::Must => "MUST",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error for a severity name that is not one of MUST, SHOULD, MAY, HINT.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity `{0}` (expected MUST, SHOULD, MAY or HINT)")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DESCENDING
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSeverity(s.to_string()))
    }
}

/// A guideline violation found in a specification.
///
/// Only a [`Context`](crate::Context) creates violations, so rule name, check
/// name and severity always match the check that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Violation {
    /// Rule name (e.g., "server-urls").
    pub rule: String,
    /// Guideline code (e.g., "252").
    pub code: String,
    /// Name of the check within the rule.
    pub check: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
    /// Location in the specification.
    pub pointer: JsonPointer,
}

impl Violation {
    pub(crate) fn new(
        rule: &str,
        code: &str,
        check: &str,
        severity: Severity,
        description: impl Into<String>,
        pointer: JsonPointer,
    ) -> Self {
        Self {
            rule: rule.to_string(),
            code: code.to_string(),
            check: check.to_string(),
            severity,
            description: description.into(),
            pointer,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_root() {
            "/".to_string()
        } else {
            self.pointer.to_string()
        };
        write!(
            f,
            "{}: {} [{} {}] {}",
            pointer, self.severity, self.code, self.rule, self.description
        )
    }
}

/// A check that failed to run to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Rule name.
    pub rule: String,
    /// Check name.
    pub check: String,
    /// Error or panic message.
    pub message: String,
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{} failed: {}", self.rule, self.check, self.message)
    }
}

/// Violation counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    /// MUST violations.
    pub must: usize,
    /// SHOULD violations.
    pub should: usize,
    /// MAY violations.
    pub may: usize,
    /// HINT violations.
    pub hint: usize,
}

impl SeverityCounts {
    /// Count for one severity.
    #[must_use]
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Must => self.must,
            Severity::Should => self.should,
            Severity::May => self.may,
            Severity::Hint => self.hint,
        }
    }

    /// Sum over all severities.
    #[must_use]
    pub fn total(&self) -> usize {
        self.must + self.should + self.may + self.hint
    }
}

impl fmt::Display for SeverityCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} MUST, {} SHOULD, {} MAY, {} HINT",
            self.must, self.should, self.may, self.hint
        )
    }
}

/// Result of analyzing one specification.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LintResult {
    /// Violations in rule order, then discovery order.
    pub violations: Vec<Violation>,
    /// Checks that errored or panicked.
    pub failures: Vec<CheckFailure>,
    /// Number of checks executed.
    pub checks_run: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any violation meets or exceeds the given severity.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations with exactly this severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> SeverityCounts {
        self.violations
            .iter()
            .fold(SeverityCounts::default(), |mut counts, v| {
                match v.severity {
                    Severity::Must => counts.must += 1,
                    Severity::Should => counts.should += 1,
                    Severity::May => counts.may += 1,
                    Severity::Hint => counts.hint += 1,
                }
                counts
            })
    }

    /// Whether nothing was reported and every check completed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.failures.is_empty()
    }
}
