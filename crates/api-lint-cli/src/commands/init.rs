//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "api-lint.toml";

const DEFAULT_CONFIG: &str = r#"# api-lint configuration

# Lowest severity that makes `api-lint check` exit with status 1
# (MUST, SHOULD, MAY or HINT)
fail_on = "MUST"

[analyzer]
# Run checks in parallel
parallel = true

# Glob patterns of documents to skip
exclude = [
    "**/node_modules/**",
    "**/generated/**",
]

# Rule configurations
# Every rule can be disabled and have its severity overridden:
#
# [rules.url-without-api]
# enabled = false
# severity = "SHOULD"

[rules.gateway-upstream-targets]
# Keys the x-gateway-upstream-targets object must contain
targets = ["production", "test"]

[rules.proprietary-headers]
# Headers allowed in addition to the standard ones
custom_headers = ["X-Flow-ID"]

[rules.secure-all-endpoints]
protected_audiences = ["company-internal", "component-internal"]

[rules.secure-all-endpoints-with-scopes]
scope_regex = "[A-Za-z0-9._:/-]+"
# Paths exempt from scope checks: unanchored regexes (escape template
# braces, e.g. '^/orders/\{order-id\}/public') or literal prefixes
path_whitelist = ["^/health$"]
# path_whitelist_prefixes = ["/orders/{order-id}/public"]

[rules.server-urls]
domain = "example.com"
env_values = [".dev", ".env"]
env_default = ".dev"

# [rules.api-identifier]
# pattern = '^(public|internal)-[a-z]+(-[a-z]+)*-v\d{1,2}$'

# [rules.date-time-properties-suffix]
# patterns = ["[a-z][a-zA-Z0-9]*At", "[a-z][a-z0-9]*(_[a-z0-9]+)*_at"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: api-lint check path/to/openapi.yaml");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_lint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn default_config_builds_every_rule() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.fail_on(), Severity::Must);
        let rules = api_lint_rules::build_rules(&config).unwrap();
        assert_eq!(rules.len(), api_lint_rules::catalogue().len());
    }

    #[test]
    fn existing_file_needs_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
