//! Locating and loading the lint policy.
//!
//! The policy file is chosen in this order:
//!
//! 1. `--config <PATH>`
//! 2. `api-lint.toml`, then `.api-lint.toml`, in the linted directory
//! 3. `config.toml` in `$API_LINT_CONFIG_DIR`, or in `~/.api-lint/`
//! 4. built-in defaults

use anyhow::{Context, Result};
use api_lint_core::Config;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where the policy comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found next to the linted documents.
    Project(PathBuf),
    /// Found in the per-user configuration directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The policy file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the policy; [`ConfigSource::Default`] yields the
    /// built-in defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };
        tracing::info!("Using {self}");
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "config {}", p.display()),
            Self::Project(p) => write!(f, "project config {}", p.display()),
            Self::Global(p) => write!(f, "global config {}", p.display()),
            Self::Default => f.write_str("default config"),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["api-lint.toml", ".api-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "API_LINT_CONFIG_DIR";

/// Finds the policy for documents under `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir().as_deref())
}

fn resolve_in(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// The per-user configuration directory.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".api-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("api-lint.toml"), "").unwrap();

        let explicit = Path::new("/nonexistent/policy.toml");
        assert_eq!(
            resolve_in(project.path(), Some(explicit), None),
            ConfigSource::Explicit(explicit.to_path_buf())
        );
    }

    #[test]
    fn project_config_names_are_tried_in_order() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".api-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join(".api-lint.toml"))
        );

        fs::write(project.path().join("api-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join("api-lint.toml"))
        );
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolve_in(project.path(), None, Some(global.path())),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, Some(global.path())),
            ConfigSource::Global(global.path().join("config.toml"))
        );

        fs::write(project.path().join("api-lint.toml"), "").unwrap();
        assert!(matches!(
            resolve_in(project.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn load_parses_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("api-lint.toml");
        fs::write(&path, "fail_on = \"SHOULD\"\n[analyzer]\nparallel = false\n").unwrap();

        let config = ConfigSource::Project(path).load().unwrap();
        assert_eq!(config.fail_on(), api_lint_core::Severity::Should);
        assert!(!config.analyzer.parallel);
    }

    #[test]
    fn load_reports_missing_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        let missing = ConfigSource::Explicit(dir.path().join("missing.toml"));
        assert!(missing.load().is_err());

        let broken = dir.path().join("api-lint.toml");
        fs::write(&broken, "fail_on = [").unwrap();
        let err = ConfigSource::Project(broken).load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
    }

    #[test]
    fn default_source_loads_defaults() {
        let config = ConfigSource::Default.load().unwrap();
        assert!(config.rules.is_empty());
        assert_eq!(ConfigSource::Default.to_string(), "default config");
        assert!(ConfigSource::Default.path().is_none());
    }
}
