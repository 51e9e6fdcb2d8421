//! The table of built-in rules.
//!
//! Rules are registered in a fixed order, which is also the order in which
//! they run and report.

use crate::{
    ApiIdentifier, DateTimePropertiesSuffix, GatewayUpstreamTargets, ProprietaryHeaders,
    SecureAllEndpoints, SecureAllEndpointsWithScopes, ServerUrls, SingleVersionInUrl,
    StripListenPath, UrlWithoutApi, VersionInUri,
};
use api_lint_core::{Config, ConfigError, RuleBox, RuleConfig};
use tracing::debug;

type BuildFn = fn(&RuleConfig) -> Result<RuleBox, ConfigError>;

/// A registered rule: its identity and how to build it from configuration.
#[derive(Clone, Copy)]
pub struct RuleEntry {
    /// Rule name, also the `[rules.<name>]` configuration key.
    pub name: &'static str,
    /// Guideline code.
    pub code: &'static str,
    build: BuildFn,
}

impl RuleEntry {
    /// Builds the rule from its section of `config`.
    ///
    /// # Errors
    ///
    /// Fails when the rule's options are malformed.
    pub fn build(&self, config: &Config) -> Result<RuleBox, ConfigError> {
        (self.build)(&config.rule(self.name))
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("code", &self.code)
            .finish_non_exhaustive()
    }
}

const RULES: &[RuleEntry] = &[
    RuleEntry {
        name: crate::gateway_upstream_targets::NAME,
        code: crate::gateway_upstream_targets::CODE,
        build: |c| Ok(Box::new(GatewayUpstreamTargets::from_config(c)?)),
    },
    RuleEntry {
        name: crate::strip_listen_path::NAME,
        code: crate::strip_listen_path::CODE,
        build: |_| Ok(Box::new(StripListenPath::new())),
    },
    RuleEntry {
        name: crate::proprietary_headers::NAME,
        code: crate::proprietary_headers::CODE,
        build: |c| Ok(Box::new(ProprietaryHeaders::from_config(c)?)),
    },
    RuleEntry {
        name: crate::secure_all_endpoints::NAME,
        code: crate::secure_all_endpoints::CODE,
        build: |c| Ok(Box::new(SecureAllEndpoints::from_config(c)?)),
    },
    RuleEntry {
        name: crate::secure_all_endpoints_with_scopes::NAME,
        code: crate::secure_all_endpoints_with_scopes::CODE,
        build: |c| Ok(Box::new(SecureAllEndpointsWithScopes::from_config(c)?)),
    },
    RuleEntry {
        name: crate::server_urls::NAME,
        code: crate::server_urls::CODE,
        build: |c| Ok(Box::new(ServerUrls::from_config(c)?)),
    },
    RuleEntry {
        name: crate::url_without_api::NAME,
        code: crate::url_without_api::CODE,
        build: |c| Ok(Box::new(UrlWithoutApi::from_config(c)?)),
    },
    RuleEntry {
        name: crate::version_in_uri::NAME,
        code: crate::version_in_uri::CODE,
        build: |c| Ok(Box::new(VersionInUri::from_config(c)?)),
    },
    RuleEntry {
        name: crate::single_version_in_url::NAME,
        code: crate::single_version_in_url::CODE,
        build: |_| Ok(Box::new(SingleVersionInUrl::new())),
    },
    RuleEntry {
        name: crate::api_identifier::NAME,
        code: crate::api_identifier::CODE,
        build: |c| Ok(Box::new(ApiIdentifier::from_config(c)?)),
    },
    RuleEntry {
        name: crate::date_time_properties_suffix::NAME,
        code: crate::date_time_properties_suffix::CODE,
        build: |c| Ok(Box::new(DateTimePropertiesSuffix::from_config(c)?)),
    },
];

/// All registered rules in execution order.
#[must_use]
pub fn catalogue() -> &'static [RuleEntry] {
    RULES
}

/// Looks up a rule by name or code.
#[must_use]
pub fn find(name_or_code: &str) -> Option<&'static RuleEntry> {
    RULES
        .iter()
        .find(|e| e.name == name_or_code || e.code == name_or_code)
}

/// Names of all registered rules in execution order.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|e| e.name)
}

fn check_known_rules(config: &Config) -> Result<(), ConfigError> {
    let mut configured: Vec<&str> = config.rule_names().collect();
    configured.sort_unstable();
    match configured.into_iter().find(|name| find(name).is_none()) {
        Some(unknown) => Err(ConfigError::UnknownRule(unknown.to_string())),
        None => Ok(()),
    }
}

/// Builds every registered rule from `config`.
///
/// # Errors
///
/// Fails when `config` has a section for an unknown rule or when any rule's
/// options are malformed. No partial rule set is returned.
pub fn build_rules(config: &Config) -> Result<Vec<RuleBox>, ConfigError> {
    check_known_rules(config)?;
    let rules = RULES
        .iter()
        .map(|entry| entry.build(config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Built {} rule(s)", rules.len());
    Ok(rules)
}

/// Builds only the named rules (names or codes), keeping registry order.
///
/// # Errors
///
/// Fails when a name is unknown, `config` has a section for an unknown
/// rule, or a selected rule's options are malformed.
pub fn select_rules(config: &Config, selection: &[&str]) -> Result<Vec<RuleBox>, ConfigError> {
    check_known_rules(config)?;
    if let Some(unknown) = selection.iter().find(|s| find(s).is_none()) {
        return Err(ConfigError::UnknownRule((*unknown).to_string()));
    }
    RULES
        .iter()
        .filter(|entry| {
            selection
                .iter()
                .any(|s| *s == entry.name || *s == entry.code)
        })
        .map(|entry| entry.build(config))
        .collect()
}

/// Builds every registered rule with its default options.
///
/// # Errors
///
/// Fails only if a built-in default pattern does not compile.
pub fn all_rules() -> Result<Vec<RuleBox>, ConfigError> {
    build_rules(&Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_builds_with_defaults() {
        let rules = all_rules().unwrap();
        assert_eq!(rules.len(), RULES.len());
        for (rule, entry) in rules.iter().zip(RULES) {
            assert_eq!(rule.name(), entry.name);
            assert_eq!(rule.code(), entry.code);
            assert!(!rule.title().is_empty());
            assert!(!rule.checks().is_empty());
        }
    }

    #[test]
    fn registry_order_is_fixed() {
        let names: Vec<_> = rule_names().collect();
        assert_eq!(
            names,
            [
                "gateway-upstream-targets",
                "strip-listen-path",
                "proprietary-headers",
                "secure-all-endpoints",
                "secure-all-endpoints-with-scopes",
                "server-urls",
                "url-without-api",
                "version-in-uri",
                "single-version-in-url",
                "api-identifier",
                "date-time-properties-suffix",
            ]
        );
    }

    #[test]
    fn names_and_codes_are_unique() {
        for (i, a) in RULES.iter().enumerate() {
            for b in &RULES[i + 1..] {
                assert_ne!(a.name, b.name);
                assert_ne!(a.code, b.code);
            }
        }
    }

    #[test]
    fn unknown_config_section_is_rejected() {
        let config = Config::parse("[rules.no-such-rule]\nenabled = true\n").unwrap();
        assert!(matches!(
            build_rules(&config),
            Err(ConfigError::UnknownRule(name)) if name == "no-such-rule"
        ));
    }

    #[test]
    fn malformed_option_aborts_the_whole_build() {
        let config = Config::parse("[rules.api-identifier]\npattern = \"(\"\n").unwrap();
        assert!(matches!(
            build_rules(&config),
            Err(ConfigError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn selection_accepts_names_and_codes() {
        let rules = select_rules(&Config::default(), &["251", "api-identifier"]).unwrap();
        let names: Vec<_> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["gateway-upstream-targets", "api-identifier"]);

        assert!(matches!(
            select_rules(&Config::default(), &["nope"]),
            Err(ConfigError::UnknownRule(_))
        ));
    }
}
