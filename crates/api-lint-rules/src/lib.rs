//! # api-lint-rules
//!
//! Built-in API design rules for api-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | 251 | `gateway-upstream-targets` | Requires `x-gateway-upstream-targets` with the configured targets |
//! | 250 | `strip-listen-path` | `x-gateway-strip-listen-path` must be a boolean |
//! | 183 | `proprietary-headers` | Only standard or agreed custom headers |
//! | 104 | `secure-all-endpoints` | Bearer authentication only, declared scopes only |
//! | 105 | `secure-all-endpoints-with-scopes` | Every operation requires well-formed scopes |
//! | 252 | `server-urls` | Server URL shape per audience, templated `{env}` |
//! | 135 | `url-without-api` | No `/api` in server URLs |
//! | 115 | `version-in-uri` | Major version in the server URL, not in paths |
//! | 116 | `single-version-in-url` | Exactly one well-formed version across server and path |
//! | 215 | `api-identifier` | `info.x-api-id` in the agreed format |
//! | 235 | `date-time-properties-suffix` | Naming suffix for date and time properties |
//!
//! ## Usage
//!
//! ```ignore
//! use api_lint_core::{Analyzer, Config};
//!
//! let config = Config::from_file("api-lint.toml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .rules(api_lint_rules::build_rules(&config)?)
//!     .config(config)
//!     .build();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api_identifier;
pub mod date_time_properties_suffix;
pub mod gateway_upstream_targets;
mod pattern;
pub mod proprietary_headers;
mod registry;
pub mod secure_all_endpoints;
pub mod secure_all_endpoints_with_scopes;
pub mod server_urls;
pub mod single_version_in_url;
pub mod strip_listen_path;
pub mod url_without_api;
pub mod version_in_uri;

#[cfg(test)]
mod test_support;

pub use api_identifier::ApiIdentifier;
pub use date_time_properties_suffix::DateTimePropertiesSuffix;
pub use gateway_upstream_targets::GatewayUpstreamTargets;
pub use pattern::FullMatch;
pub use proprietary_headers::ProprietaryHeaders;
pub use registry::{
    all_rules, build_rules, catalogue, find, rule_names, select_rules, RuleEntry,
};
pub use secure_all_endpoints::SecureAllEndpoints;
pub use secure_all_endpoints_with_scopes::SecureAllEndpointsWithScopes;
pub use server_urls::ServerUrls;
pub use single_version_in_url::SingleVersionInUrl;
pub use strip_listen_path::StripListenPath;
pub use url_without_api::UrlWithoutApi;
pub use version_in_uri::VersionInUri;

/// Re-export core types for convenience.
pub use api_lint_core::{Rule, Severity, Violation};
