//! # api-lint-core
//!
//! Core engine for linting OpenAPI 3 and Swagger 2 specifications against
//! API design guidelines.
//!
//! This crate provides:
//!
//! - [`SpecificationDocument`], a read-only model built from an already
//!   parsed document, with every node stamped with its [`JsonPointer`]
//! - [`Context`], the per-document view rules query and the factory for
//!   [`Violation`]s
//! - [`Rule`] and [`Check`] for writing guidelines
//! - [`Config`] / [`RuleConfig`] for externally supplied rule parameters
//! - [`Analyzer`] for running checks and isolating their failures
//!
//! ## Example
//!
//! ```ignore
//! use api_lint_core::{Analyzer, Config, SpecificationDocument};
//!
//! let value: serde_json::Value = serde_yaml::from_str(&text)?;
//! let document = SpecificationDocument::from_value(&value)?;
//!
//! let analyzer = Analyzer::builder()
//!     .config(Config::from_file("api-lint.toml".as_ref())?)
//!     .rule(MyRule::new())
//!     .build();
//!
//! let result = analyzer.analyze(&document);
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod audience;
mod config;
mod context;
pub mod model;
mod pointer;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use audience::{ApiAudience, UnsupportedAudience, AUDIENCE_EXTENSION};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{Context, OperationEntry};
pub use model::{ApiVersionKind, ModelError, SpecificationDocument};
pub use pointer::{JsonPointer, Locatable, PointerError};
pub use rule::{Check, CheckError, CheckResult, Rule, RuleBox};
pub use types::{
    CheckFailure, LintResult, Severity, SeverityCounts, UnknownSeverity, Violation,
};
