//! API audience classification (`info.x-audience`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the extension on `info` that declares the audience.
pub const AUDIENCE_EXTENSION: &str = "x-audience";

/// Intended consumers of an API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiAudience {
    /// Published to third parties.
    ExternalPublic,
    /// Used across the whole company.
    CompanyInternal,
    /// Used only inside one component.
    ComponentInternal,
}

impl ApiAudience {
    /// Every audience in declaration order.
    pub const ALL: [Self; 3] = [
        Self::ExternalPublic,
        Self::CompanyInternal,
        Self::ComponentInternal,
    ];

    /// The code used in `x-audience`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ExternalPublic => "external-public",
            Self::CompanyInternal => "company-internal",
            Self::ComponentInternal => "component-internal",
        }
    }
}

impl fmt::Display for ApiAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An `x-audience` value outside the known codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API audience {code} is not supported.")]
pub struct UnsupportedAudience {
    /// The rejected code.
    pub code: String,
}

impl FromStr for ApiAudience {
    type Err = UnsupportedAudience;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.code() == s)
            .ok_or_else(|| UnsupportedAudience {
                code: s.to_string(),
            })
    }
}
