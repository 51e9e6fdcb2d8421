//! Per-document context handed to every check.

use crate::audience::{ApiAudience, UnsupportedAudience, AUDIENCE_EXTENSION};
use crate::model::{
    ApiVersionKind, Method, Operation, PathItem, SecurityRequirement, SecurityRequirements,
    SecurityScheme, SpecificationDocument,
};
use crate::pointer::{JsonPointer, Locatable};
use crate::types::{Severity, Violation};

/// One operation found while walking `paths`.
#[derive(Debug, Clone, Copy)]
pub struct OperationEntry<'a> {
    /// The path template the operation is declared under.
    pub template: &'a str,
    /// The HTTP method.
    pub method: Method,
    /// The owning path item (for path-level parameters).
    pub path_item: &'a PathItem,
    /// The operation itself.
    pub operation: &'a Operation,
}

/// Read-only view of one document, scoped to the check being run.
///
/// A context borrows the document; it never owns or mutates it. The
/// [`Analyzer`](crate::Analyzer) derives one scoped context per check so that
/// [`Context::violation`] can stamp rule, check and severity.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    document: &'a SpecificationDocument,
    rule: &'a str,
    code: &'a str,
    check: &'a str,
    severity: Severity,
}

impl<'a> Context<'a> {
    /// Creates an unscoped context. Violations it creates carry empty rule
    /// and check names and [`Severity::Must`].
    #[must_use]
    pub fn new(document: &'a SpecificationDocument) -> Self {
        Self {
            document,
            rule: "",
            code: "",
            check: "",
            severity: Severity::Must,
        }
    }

    /// Derives a context for one check of one rule.
    #[must_use]
    pub fn scoped(&self, rule: &'a str, code: &'a str, check: &'a str, severity: Severity) -> Self {
        Self {
            document: self.document,
            rule,
            code,
            check,
            severity,
        }
    }

    /// The document under validation.
    #[must_use]
    pub fn api(&self) -> &'a SpecificationDocument {
        self.document
    }

    /// Severity stamped on violations created by this context.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Name of the rule this context is scoped to.
    #[must_use]
    pub fn rule_name(&self) -> &'a str {
        self.rule
    }

    /// Creates a violation located at `at`.
    pub fn violation<L>(&self, description: impl Into<String>, at: &L) -> Violation
    where
        L: Locatable + ?Sized,
    {
        Violation::new(
            self.rule,
            self.code,
            self.check,
            self.severity,
            description,
            at.pointer().clone(),
        )
    }

    /// Walks every operation in path order, then in [`Method::ALL`] order.
    pub fn all_operations(&self) -> impl Iterator<Item = OperationEntry<'a>> + 'a {
        self.document.paths.iter().flat_map(|path_item| {
            path_item.operations.iter().map(move |operation| OperationEntry {
                template: &path_item.template,
                method: operation.method,
                path_item,
                operation,
            })
        })
    }

    /// Raw `info.x-audience` value, if set to a string.
    #[must_use]
    pub fn audience(&self) -> Option<&'a str> {
        self.document.info.extensions.str(AUDIENCE_EXTENSION).ok()
    }

    /// Parsed audience.
    ///
    /// # Errors
    ///
    /// Fails when `x-audience` is set to an unknown code.
    pub fn api_audience(&self) -> Result<Option<ApiAudience>, UnsupportedAudience> {
        self.audience().map(str::parse::<ApiAudience>).transpose()
    }

    /// Whether the document is OpenAPI 3.x.
    #[must_use]
    pub fn is_openapi3(&self) -> bool {
        self.document.version_kind == ApiVersionKind::OpenApi3
    }

    /// Whether the document is Swagger 2.0.
    #[must_use]
    pub fn is_swagger2(&self) -> bool {
        self.document.version_kind == ApiVersionKind::Swagger2
    }

    /// Declared security schemes in document order.
    #[must_use]
    pub fn security_schemes(&self) -> &'a [SecurityScheme] {
        &self.document.components.security_schemes
    }

    /// Looks up a declared security scheme.
    #[must_use]
    pub fn security_scheme(&self, name: &str) -> Option<&'a SecurityScheme> {
        self.security_schemes().iter().find(|s| s.name == name)
    }

    /// Where security schemes are declared for this document's version.
    #[must_use]
    pub fn security_schemes_pointer(&self) -> &'a JsonPointer {
        &self.document.components.security_schemes_pointer
    }

    /// The `security` block that applies to `operation`: its own, else the
    /// document-level one.
    #[must_use]
    pub fn security_block(&self, operation: &'a Operation) -> Option<&'a SecurityRequirements> {
        operation
            .security
            .as_ref()
            .or(self.document.security.as_ref())
    }

    /// Requirements that apply to `operation`. An explicitly empty operation
    /// `security` wins over the document-level one.
    #[must_use]
    pub fn effective_security(&self, operation: &'a Operation) -> &'a [SecurityRequirement] {
        self.security_block(operation)
            .map(|block| block.requirements.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: &serde_json::Value) -> SpecificationDocument {
        SpecificationDocument::from_value(value).unwrap()
    }

    #[test]
    fn all_operations_follow_document_then_method_order() {
        let doc = document(&json!({
            "openapi": "3.0.0",
            "paths": {
                "/b": {"patch": {}, "get": {}},
                "/a": {"post": {}}
            }
        }));
        let ctx = Context::new(&doc);
        let seen: Vec<_> = ctx
            .all_operations()
            .map(|e| (e.template, e.method))
            .collect();
        assert_eq!(
            seen,
            [("/b", Method::Get), ("/b", Method::Patch), ("/a", Method::Post)]
        );
    }

    #[test]
    fn audience_is_read_from_info() {
        let doc = document(&json!({
            "openapi": "3.0.0",
            "info": {"x-audience": "company-internal"}
        }));
        let ctx = Context::new(&doc);
        assert_eq!(ctx.audience(), Some("company-internal"));
        assert_eq!(ctx.api_audience(), Ok(Some(ApiAudience::CompanyInternal)));
    }

    #[test]
    fn unknown_audience_is_an_error() {
        let doc = document(&json!({"openapi": "3.0.0", "info": {"x-audience": "everyone"}}));
        let err = Context::new(&doc).api_audience().unwrap_err();
        assert_eq!(err.code, "everyone");
    }

    #[test]
    fn missing_audience_is_none() {
        let doc = document(&json!({"swagger": "2.0"}));
        let ctx = Context::new(&doc);
        assert_eq!(ctx.api_audience(), Ok(None));
        assert!(ctx.is_swagger2());
        assert!(!ctx.is_openapi3());
    }

    #[test]
    fn effective_security_prefers_operation_level() {
        let doc = document(&json!({
            "openapi": "3.0.0",
            "security": [{"BearerAuth": []}],
            "paths": {"/a": {
                "get": {},
                "put": {"security": []},
                "post": {"security": [{"oauth2": ["write"]}]}
            }}
        }));
        let ctx = Context::new(&doc);
        let ops: Vec<_> = ctx.all_operations().collect();

        let inherited = ctx.effective_security(ops[0].operation);
        assert_eq!(inherited[0].entries[0].scheme, "BearerAuth");
        assert_eq!(
            ctx.security_block(ops[0].operation).unwrap().pointer.to_string(),
            "/security"
        );

        assert!(ctx.effective_security(ops[1].operation).is_empty());
        assert!(ctx.security_block(ops[1].operation).is_some());

        let own = ctx.effective_security(ops[2].operation);
        assert_eq!(own[0].entries[0].scheme, "oauth2");
    }

    #[test]
    fn effective_security_defaults_to_empty() {
        let doc = document(&json!({"openapi": "3.0.0", "paths": {"/a": {"get": {}}}}));
        let ctx = Context::new(&doc);
        let op = ctx.all_operations().next().unwrap().operation;
        assert!(ctx.effective_security(op).is_empty());
        assert!(ctx.security_block(op).is_none());
    }

    #[test]
    fn violation_uses_scope_and_node_pointer() {
        let doc = document(&json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://a"}, {"url": "https://b"}]
        }));
        let base = Context::new(&doc);
        let ctx = base.scoped("server-urls", "252", "validate", Severity::Should);
        let v = ctx.violation("bad url", &doc.servers[1]);
        assert_eq!(v.rule, "server-urls");
        assert_eq!(v.check, "validate");
        assert_eq!(v.severity, Severity::Should);
        assert_eq!(v.pointer.to_string(), "/servers/1");

        let synthetic = JsonPointer::root().child("servers");
        assert_eq!(ctx.violation("whole", &synthetic).pointer.to_string(), "/servers");
    }

    #[test]
    fn security_schemes_pointer_depends_on_version() {
        let v3 = document(&json!({"openapi": "3.0.0"}));
        let v2 = document(&json!({"swagger": "2.0"}));
        assert_eq!(
            Context::new(&v3).security_schemes_pointer().to_string(),
            "/components/securitySchemes"
        );
        assert_eq!(
            Context::new(&v2).security_schemes_pointer().to_string(),
            "/securityDefinitions"
        );
    }
}
