//! Check command implementation.

use anyhow::{anyhow, Context, Result};
use api_lint_core::{Analyzer, Config, ConfigError, LintResult, RuleBox, Severity};
use glob::Pattern;
use ignore::WalkBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::loader;

/// Lint result of one document.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// The linted file.
    pub path: PathBuf,
    /// What the analyzer found.
    #[serde(flatten)]
    pub result: LintResult,
}

/// A file that could not be turned into a specification model.
#[derive(Debug, Serialize)]
pub struct LoadFailure {
    /// The offending file.
    pub path: PathBuf,
    /// Why it could not be loaded.
    pub message: String,
}

/// Everything a `check` run produced.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    /// Reports in path order.
    pub files: Vec<FileReport>,
    /// Files that failed to load.
    pub load_failures: Vec<LoadFailure>,
    /// Lowest severity that fails the run.
    pub fail_on: Severity,
}

impl CheckOutcome {
    /// Whether the run succeeds: every file loaded and no violation reached
    /// the `fail_on` threshold.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.load_failures.is_empty()
            && !self
                .files
                .iter()
                .any(|f| f.result.has_violations_at(self.fail_on))
    }

    /// Total number of violations over all files.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.result.violations.len()).sum()
    }
}

/// Runs the check command.
///
/// # Errors
///
/// Fails when the configuration cannot be loaded, names unknown rules or
/// carries malformed rule options, or when `path` cannot be walked.
pub fn run(
    path: &Path,
    rules_filter: Option<&str>,
    exclude: &[String],
    source: &ConfigSource,
) -> Result<CheckOutcome> {
    let config = source.load()?;
    let rules = build_rules(&config, rules_filter)?;

    let mut patterns = config.analyzer.exclude.clone();
    patterns.extend(exclude.iter().cloned());
    let excludes = compile_excludes(&patterns)?;

    let fail_on = config.fail_on();
    let analyzer = Analyzer::builder().rules(rules).config(config).build();
    tracing::info!("Analyzing {} with {} rules", path.display(), analyzer.rule_count());

    let mut outcome = CheckOutcome {
        files: Vec::new(),
        load_failures: Vec::new(),
        fail_on,
    };
    for file in collect_documents(path, &excludes)? {
        match loader::load(&file) {
            Ok(document) => {
                tracing::debug!("Linting {}", file.display());
                let result = analyzer.analyze(&document);
                outcome.files.push(FileReport { path: file, result });
            }
            Err(err) => {
                tracing::warn!("Skipping {}: {err:#}", file.display());
                outcome.load_failures.push(LoadFailure {
                    path: file,
                    message: format!("{err:#}"),
                });
            }
        }
    }
    Ok(outcome)
}

fn build_rules(config: &Config, rules_filter: Option<&str>) -> Result<Vec<RuleBox>> {
    let built = match rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            api_lint_rules::select_rules(config, &names)
        }
        None => api_lint_rules::build_rules(config),
    };
    built.map_err(report_config_error)
}

fn report_config_error(err: ConfigError) -> anyhow::Error {
    let message = err.to_string();
    eprintln!("{:?}", miette::Report::new(err));
    anyhow!("Invalid configuration: {message}")
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude pattern: {p}")))
        .collect()
}

fn is_excluded(path: &Path, root: &Path, excludes: &[Pattern]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    excludes
        .iter()
        .any(|p| p.matches_path(relative) || p.matches_path(path))
}

/// Specification files at `path`: the file itself, or every YAML/JSON file
/// below the directory (honoring `.gitignore`), sorted.
fn collect_documents(path: &Path, excludes: &[Pattern]) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(anyhow!("No such file or directory: {}", path.display()));
    }

    let mut files = Vec::new();
    for entry in WalkBuilder::new(path).build() {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        let file = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) || !loader::is_spec_file(file) {
            continue;
        }
        if is_excluded(file, path, excludes) {
            tracing::debug!("Excluded {}", file.display());
            continue;
        }
        files.push(file.to_path_buf());
    }
    files.sort();
    Ok(files)
}
