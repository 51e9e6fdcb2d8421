//! Security schemes, flows, scopes and requirements.
//!
//! Swagger v2 `securityDefinitions` (singular `flow`) and OpenAPI v3
//! `components.securitySchemes` (named `flows`) are both normalized into
//! [`SecurityScheme`] and [`Flow`], so rules never look at version-specific
//! shapes. Pointers still refer to the original location of each node.

use crate::pointer::{JsonPointer, Locatable};

/// The kind of authentication a scheme declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeKind {
    /// `type: http` with `scheme: bearer`.
    HttpBearer,
    /// `type: oauth2`.
    OAuth2,
    /// `type: apiKey`.
    ApiKey,
    /// Anything else (`basic`, `openIdConnect`, non-bearer http, ...).
    Other(String),
}

impl SchemeKind {
    /// Short name used in messages.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::HttpBearer => "bearer",
            Self::OAuth2 => "oauth2",
            Self::ApiKey => "apiKey",
            Self::Other(kind) => kind,
        }
    }
}

/// OAuth2 flow kinds, named after their OpenAPI v3 counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// `implicit`.
    Implicit,
    /// `password`.
    Password,
    /// `clientCredentials` (v2 `application`).
    ClientCredentials,
    /// `authorizationCode` (v2 `accessCode`).
    AuthorizationCode,
    /// A v2 scheme without a `flow` property.
    Unspecified,
}

impl FlowKind {
    /// Flow keys of a v3 `flows` object, in declaration order.
    pub(crate) const V3_KEYS: [(&'static str, Self); 4] = [
        ("implicit", Self::Implicit),
        ("password", Self::Password),
        ("clientCredentials", Self::ClientCredentials),
        ("authorizationCode", Self::AuthorizationCode),
    ];

    /// Maps a v2 `flow` value.
    pub(crate) fn from_v2(flow: Option<&str>) -> Self {
        match flow {
            Some("implicit") => Self::Implicit,
            Some("password") => Self::Password,
            Some("application") => Self::ClientCredentials,
            Some("accessCode") => Self::AuthorizationCode,
            _ => Self::Unspecified,
        }
    }
}

/// One declared OAuth2 scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Scope name.
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// Pointer of the scope entry.
    pub pointer: JsonPointer,
}

impl Locatable for Scope {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// One OAuth2 flow with its scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    /// Flow kind.
    pub kind: FlowKind,
    /// Declared scopes in document order.
    pub scopes: Vec<Scope>,
    /// Pointer of the flow object (the scheme itself for v2).
    pub pointer: JsonPointer,
    /// Pointer of the `scopes` map.
    pub scopes_pointer: JsonPointer,
}

impl Flow {
    /// Whether the flow declares a scope with this name.
    #[must_use]
    pub fn declares(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s.name == scope)
    }
}

impl Locatable for Flow {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A named security scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityScheme {
    /// Name under which the scheme is declared.
    pub name: String,
    /// Normalized kind.
    pub kind: SchemeKind,
    /// OAuth2 flows; empty for every other kind.
    pub flows: Vec<Flow>,
    /// Pointer of the scheme declaration.
    pub pointer: JsonPointer,
}

impl SecurityScheme {
    /// Whether this is an HTTP bearer scheme.
    #[must_use]
    pub fn is_bearer(&self) -> bool {
        self.kind == SchemeKind::HttpBearer
    }

    /// Whether this is an OAuth2 scheme.
    #[must_use]
    pub fn is_oauth2(&self) -> bool {
        self.kind == SchemeKind::OAuth2
    }

    /// Whether any flow declares this scope.
    #[must_use]
    pub fn declares_scope(&self, scope: &str) -> bool {
        self.flows.iter().any(|f| f.declares(scope))
    }

    /// All declared scopes across flows.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.flows.iter().flat_map(|f| f.scopes.iter())
    }
}

impl Locatable for SecurityScheme {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A scope token used inside a security requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRef {
    /// Scope name.
    pub name: String,
    /// Pointer of the array item.
    pub pointer: JsonPointer,
}

impl Locatable for ScopeRef {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// One `scheme: [scopes]` pair of a requirement object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementEntry {
    /// Referenced scheme name.
    pub scheme: String,
    /// Requested scopes.
    pub scopes: Vec<ScopeRef>,
    /// Pointer of the scope array.
    pub pointer: JsonPointer,
}

impl Locatable for RequirementEntry {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// One security requirement object. All entries must be satisfied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirement {
    /// Entries in document order.
    pub entries: Vec<RequirementEntry>,
    /// Pointer of the requirement object.
    pub pointer: JsonPointer,
}

impl Locatable for SecurityRequirement {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A `security` array. Any one requirement grants access.
///
/// An empty list is meaningful: it explicitly removes authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityRequirements {
    /// Alternative requirements.
    pub requirements: Vec<SecurityRequirement>,
    /// Pointer of the `security` array.
    pub pointer: JsonPointer,
}

impl Locatable for SecurityRequirements {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}
