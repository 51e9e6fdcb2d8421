//! Shared output formatting for check results.

use anyhow::Result;
use api_lint_core::{Severity, SeverityCounts};

use super::check::CheckOutcome;
use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(outcome: &CheckOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(outcome),
        OutputFormat::Json => return print_json(outcome),
        OutputFormat::Compact => print_compact(outcome),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Must => "\x1b[31mMUST\x1b[0m",
        Severity::Should => "\x1b[33mSHOULD\x1b[0m",
        Severity::May => "\x1b[34mMAY\x1b[0m",
        Severity::Hint => "\x1b[36mHINT\x1b[0m",
    }
}

fn print_text(outcome: &CheckOutcome) {
    let mut totals = SeverityCounts::default();

    for file in &outcome.files {
        for violation in &file.result.violations {
            println!(
                "{} {} at {}#{}",
                violation.code,
                violation.rule,
                file.path.display(),
                violation.pointer,
            );
            println!(
                "  {}: {}",
                severity_indicator(violation.severity),
                violation.description
            );
            println!();
        }
        for failure in &file.result.failures {
            println!("\x1b[35mcheck failed\x1b[0m in {}: {failure}", file.path.display());
        }
        let counts = file.result.count_by_severity();
        totals.must += counts.must;
        totals.should += counts.should;
        totals.may += counts.may;
        totals.hint += counts.hint;
    }

    for failure in &outcome.load_failures {
        println!("\x1b[31mcould not lint\x1b[0m {}: {}", failure.path.display(), failure.message);
    }

    let summary_color = if !outcome.passed() {
        "\x1b[31m"
    } else if totals.total() > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} in {} file(s), {} unreadable (failing on {} and above)\x1b[0m",
        summary_color,
        totals,
        outcome.files.len(),
        outcome.load_failures.len(),
        outcome.fail_on,
    );
}

fn print_json(outcome: &CheckOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome)?;
    println!("{json}");
    Ok(())
}

fn print_compact(outcome: &CheckOutcome) {
    for file in &outcome.files {
        for violation in &file.result.violations {
            println!(
                "{}#{}: {} [{}] {}",
                file.path.display(),
                violation.pointer,
                violation.severity,
                violation.code,
                violation.description,
            );
        }
    }
    for failure in &outcome.load_failures {
        println!("{}: ERROR {}", failure.path.display(), failure.message);
    }
}
