//! In-memory specification model.
//!
//! # Architecture
//!
//! ```text
//! YAML / JSON text
//!   ↓ (caller parses into serde_json::Value)
//! serde_json::Value
//!   ↓ loader: version detection + normalization + pointer stamping
//! SpecificationDocument (read-only)
//! ```
//!
//! The model is deliberately lenient: a field with an unexpected shape is
//! treated as absent instead of failing construction. Structural conformance
//! of the document is not this crate's concern.

mod extensions;
mod loader;
mod schema;
mod security;

pub use extensions::{ExtensionValue, Extensions};
pub use loader::ModelError;
pub use schema::{NamedSchema, Property, Schema};
pub use security::{
    Flow, FlowKind, RequirementEntry, SchemeKind, Scope, ScopeRef, SecurityRequirement,
    SecurityRequirements, SecurityScheme,
};

use crate::pointer::{JsonPointer, Locatable};
use std::fmt;

/// Which specification family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersionKind {
    /// OpenAPI 3.x (`openapi: 3.x.y`).
    OpenApi3,
    /// Swagger 2.0 (`swagger: "2.0"`).
    Swagger2,
}

/// HTTP methods an operation can be declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// `get`
    Get,
    /// `put`
    Put,
    /// `post`
    Post,
    /// `delete`
    Delete,
    /// `options`
    Options,
    /// `head`
    Head,
    /// `patch`
    Patch,
    /// `trace`
    Trace,
}

impl Method {
    /// All methods in traversal order.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// The lowercase key used in a path item.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `info` object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    /// `title`.
    pub title: Option<String>,
    /// `version` (numbers are rendered as strings).
    pub version: Option<String>,
    /// `x-*` properties of `info`.
    pub extensions: Extensions,
    /// Always `/info`.
    pub pointer: JsonPointer,
}

impl Locatable for Info {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A server template variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerVariable {
    /// Variable name.
    pub name: String,
    /// Allowed values, `None` when `enum` is absent.
    pub allowed: Option<Vec<String>>,
    /// `default`.
    pub default: Option<String>,
    /// Pointer of the variable object.
    pub pointer: JsonPointer,
}

/// An entry of `servers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Server {
    /// URL template; `None` when missing or not a string.
    pub url: Option<String>,
    /// Declared variables.
    pub variables: Vec<ServerVariable>,
    /// `/servers/<index>`.
    pub pointer: JsonPointer,
}

impl Server {
    /// Looks up a declared variable.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&ServerVariable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

impl Locatable for Server {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// Where a parameter is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLocation {
    /// `in: header`
    Header,
    /// `in: query`
    Query,
    /// `in: path`
    Path,
    /// `in: cookie`
    Cookie,
    /// `in: body` (Swagger v2)
    Body,
    /// `in: formData` (Swagger v2)
    FormData,
    /// Missing or unknown `in`.
    Other(String),
}

impl ParameterLocation {
    pub(crate) fn parse(value: Option<&str>) -> Self {
        match value {
            Some("header") => Self::Header,
            Some("query") => Self::Query,
            Some("path") => Self::Path,
            Some("cookie") => Self::Cookie,
            Some("body") => Self::Body,
            Some("formData") => Self::FormData,
            other => Self::Other(other.unwrap_or_default().to_string()),
        }
    }
}

/// An operation or path-level parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// `name`; `None` for `$ref` parameters.
    pub name: Option<String>,
    /// `in`.
    pub location: ParameterLocation,
    /// Pointer of the parameter object.
    pub pointer: JsonPointer,
}

impl Parameter {
    /// Whether this is a header parameter.
    #[must_use]
    pub fn is_header(&self) -> bool {
        self.location == ParameterLocation::Header
    }
}

impl Locatable for Parameter {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A response header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Header name (the map key).
    pub name: String,
    /// `x-*` properties of the header object.
    pub extensions: Extensions,
    /// Pointer of the header entry.
    pub pointer: JsonPointer,
}

impl Locatable for Header {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A response of an operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code or `default`.
    pub status: String,
    /// Response headers in document order.
    pub headers: Vec<Header>,
    /// Pointer of the response object.
    pub pointer: JsonPointer,
}

impl Locatable for Response {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// An HTTP operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// The method this operation is declared under.
    pub method: Method,
    /// `operationId`.
    pub operation_id: Option<String>,
    /// Operation-level parameters.
    pub parameters: Vec<Parameter>,
    /// Responses in document order.
    pub responses: Vec<Response>,
    /// Operation-level `security`; `None` when the property is absent.
    pub security: Option<SecurityRequirements>,
    /// `x-*` properties of the operation.
    pub extensions: Extensions,
    /// `/paths/<template>/<method>`.
    pub pointer: JsonPointer,
}

impl Locatable for Operation {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A path template and its operations.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// The path template, e.g. `/orders/{order-id}`.
    pub template: String,
    /// Path-level parameters shared by all operations.
    pub parameters: Vec<Parameter>,
    /// Operations in [`Method::ALL`] order.
    pub operations: Vec<Operation>,
    /// `x-*` properties of the path item.
    pub extensions: Extensions,
    /// `/paths/<template>`.
    pub pointer: JsonPointer,
}

impl PathItem {
    /// Looks up the operation for a method.
    #[must_use]
    pub fn operation(&self, method: Method) -> Option<&Operation> {
        self.operations.iter().find(|o| o.method == method)
    }
}

impl Locatable for PathItem {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// Reusable components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    /// Declared security schemes in document order.
    pub security_schemes: Vec<SecurityScheme>,
    /// `/components/securitySchemes` (v3) or `/securityDefinitions` (v2).
    pub security_schemes_pointer: JsonPointer,
    /// Declared schemas in document order.
    pub schemas: Vec<NamedSchema>,
}

/// A parsed, normalized API specification.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecificationDocument {
    /// Specification family, fixed at construction time.
    pub version_kind: ApiVersionKind,
    /// The `info` object.
    pub info: Info,
    /// `servers`, in order.
    pub servers: Vec<Server>,
    /// `paths`, in document order.
    pub paths: Vec<PathItem>,
    /// Components (security schemes, schemas).
    pub components: Components,
    /// Document-level `security`; `None` when absent.
    pub security: Option<SecurityRequirements>,
    /// Root-level `x-*` properties.
    pub extensions: Extensions,
}

impl SpecificationDocument {
    /// Builds the model from a parsed YAML/JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error when the root is not an object or carries neither
    /// an `openapi` nor a `swagger` property.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ModelError> {
        loader::load(value)
    }

    /// Looks up a path item by its template.
    #[must_use]
    pub fn path(&self, template: &str) -> Option<&PathItem> {
        self.paths.iter().find(|p| p.template == template)
    }

    /// Looks up a security scheme by name.
    #[must_use]
    pub fn security_scheme(&self, name: &str) -> Option<&SecurityScheme> {
        self.components
            .security_schemes
            .iter()
            .find(|s| s.name == name)
    }
}
