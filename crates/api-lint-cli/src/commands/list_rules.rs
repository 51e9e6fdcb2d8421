//! List rules command implementation.

use anyhow::Result;
use api_lint_core::Check;
use api_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() -> Result<()> {
    println!("Available rules:\n");
    println!("{:<6} {:<34} {:<8} Title", "Code", "Name", "Default");
    println!("{}", "-".repeat(100));

    for rule in all_rules()? {
        println!(
            "{:<6} {:<34} {:<8} {}",
            rule.code(),
            rule.name(),
            rule.default_severity(),
            rule.title()
        );
        let checks: Vec<&str> = rule.checks().iter().map(Check::name).collect();
        println!("{:<6} {:<34} checks: {}", "", "", checks.join(", "));
    }

    println!("\nRules run in the order listed. Configure them under [rules.<name>]:");
    println!("  [rules.server-urls]");
    println!("  domain = \"example.com\"");
    println!("\nUse --rules to run a subset, by name or code, e.g.:");
    println!("  api-lint check --rules server-urls,api-identifier");
    println!("  api-lint check --rules 252,215");
    Ok(())
}
