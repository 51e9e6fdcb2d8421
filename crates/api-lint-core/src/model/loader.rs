//! Construction of the model from a generic JSON value.
//!
//! Only two things can make construction fail: a root that is not an object
//! and a root that declares neither `openapi` nor `swagger`. Everything else
//! with an unexpected shape is skipped.

use super::{
    ApiVersionKind, Components, Extensions, Flow, FlowKind, Header, Info, Method, NamedSchema,
    Operation, Parameter, ParameterLocation, PathItem, Property, RequirementEntry, Response,
    Schema, SchemeKind, Scope, ScopeRef, SecurityRequirement, SecurityRequirements,
    SecurityScheme, Server, ServerVariable, SpecificationDocument,
};
use crate::pointer::JsonPointer;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Errors raised while building a [`SpecificationDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The document root is a scalar or an array.
    #[error("specification root must be an object, found {found}")]
    NotAnObject {
        /// JSON type of the root value.
        found: &'static str,
    },

    /// Neither `openapi` nor `swagger` is present at the root.
    #[error("document declares neither `openapi` nor `swagger`; not an API specification")]
    UnknownVersion,
}

type Object = Map<String, Value>;

pub(super) fn load(value: &Value) -> Result<SpecificationDocument, ModelError> {
    let Value::Object(root) = value else {
        return Err(ModelError::NotAnObject {
            found: json_type(value),
        });
    };

    let version_kind = if root.contains_key("openapi") {
        ApiVersionKind::OpenApi3
    } else if root.contains_key("swagger") {
        ApiVersionKind::Swagger2
    } else {
        return Err(ModelError::UnknownVersion);
    };

    let ptr = JsonPointer::root();
    let components = match version_kind {
        ApiVersionKind::OpenApi3 => {
            let components_ptr = ptr.child("components");
            let section = object(root.get("components"));
            let schemes_ptr = components_ptr.child("securitySchemes");
            Components {
                security_schemes: load_schemes(
                    section.and_then(|c| c.get("securitySchemes")),
                    &schemes_ptr,
                    version_kind,
                ),
                security_schemes_pointer: schemes_ptr,
                schemas: load_named_schemas(
                    section.and_then(|c| c.get("schemas")),
                    &components_ptr.child("schemas"),
                ),
            }
        }
        ApiVersionKind::Swagger2 => {
            let schemes_ptr = ptr.child("securityDefinitions");
            Components {
                security_schemes: load_schemes(
                    root.get("securityDefinitions"),
                    &schemes_ptr,
                    version_kind,
                ),
                security_schemes_pointer: schemes_ptr,
                schemas: load_named_schemas(root.get("definitions"), &ptr.child("definitions")),
            }
        }
    };

    let document = SpecificationDocument {
        version_kind,
        info: load_info(root.get("info"), &ptr.child("info")),
        servers: load_servers(root.get("servers"), &ptr.child("servers")),
        paths: load_paths(root.get("paths"), &ptr.child("paths")),
        components,
        security: load_requirements(root.get("security"), &ptr.child("security")),
        extensions: Extensions::collect(root, &ptr),
    };

    debug!(
        kind = ?document.version_kind,
        paths = document.paths.len(),
        schemes = document.components.security_schemes.len(),
        "Built specification model"
    );
    Ok(document)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn object(value: Option<&Value>) -> Option<&Object> {
    value.and_then(Value::as_object)
}

fn string(map: &Object, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(String::from)
}

/// Renders a scalar as a string; YAML readily turns `1.0` or `true` into
/// non-string values where authors meant text.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn load_info(value: Option<&Value>, ptr: &JsonPointer) -> Info {
    let empty = Object::new();
    let map = object(value).unwrap_or(&empty);
    Info {
        title: string(map, "title"),
        version: map.get("version").and_then(scalar),
        extensions: Extensions::collect(map, ptr),
        pointer: ptr.clone(),
    }
}

fn load_servers(value: Option<&Value>, ptr: &JsonPointer) -> Vec<Server> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let server_ptr = ptr.index(i);
            let map = item.as_object();
            Server {
                url: map.and_then(|m| string(m, "url")),
                variables: map
                    .map(|m| load_server_variables(m.get("variables"), &server_ptr.child("variables")))
                    .unwrap_or_default(),
                pointer: server_ptr,
            }
        })
        .collect()
}

fn load_server_variables(value: Option<&Value>, ptr: &JsonPointer) -> Vec<ServerVariable> {
    let Some(map) = object(value) else {
        return Vec::new();
    };
    map.iter()
        .map(|(name, variable)| {
            let variable = variable.as_object();
            ServerVariable {
                name: name.clone(),
                allowed: variable
                    .and_then(|v| v.get("enum"))
                    .and_then(Value::as_array)
                    .map(|values| values.iter().filter_map(scalar).collect()),
                default: variable.and_then(|v| v.get("default")).and_then(scalar),
                pointer: ptr.child(name.as_str()),
            }
        })
        .collect()
}

fn load_paths(value: Option<&Value>, ptr: &JsonPointer) -> Vec<PathItem> {
    let Some(map) = object(value) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(template, item)| {
            let item = item.as_object()?;
            let item_ptr = ptr.child(template.as_str());
            let operations = Method::ALL
                .iter()
                .filter_map(|&method| {
                    let op = object(item.get(method.as_str()))?;
                    Some(load_operation(method, op, &item_ptr.child(method.as_str())))
                })
                .collect();
            Some(PathItem {
                template: template.clone(),
                parameters: load_parameters(item.get("parameters"), &item_ptr.child("parameters")),
                operations,
                extensions: Extensions::collect(item, &item_ptr),
                pointer: item_ptr,
            })
        })
        .collect()
}

fn load_operation(method: Method, op: &Object, ptr: &JsonPointer) -> Operation {
    Operation {
        method,
        operation_id: string(op, "operationId"),
        parameters: load_parameters(op.get("parameters"), &ptr.child("parameters")),
        responses: load_responses(op.get("responses"), &ptr.child("responses")),
        security: load_requirements(op.get("security"), &ptr.child("security")),
        extensions: Extensions::collect(op, ptr),
        pointer: ptr.clone(),
    }
}

fn load_parameters(value: Option<&Value>, ptr: &JsonPointer) -> Vec<Parameter> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let map = item.as_object()?;
            Some(Parameter {
                name: string(map, "name"),
                location: ParameterLocation::parse(map.get("in").and_then(Value::as_str)),
                pointer: ptr.index(i),
            })
        })
        .collect()
}

fn load_responses(value: Option<&Value>, ptr: &JsonPointer) -> Vec<Response> {
    let Some(map) = object(value) else {
        return Vec::new();
    };
    map.iter()
        .map(|(status, response)| {
            let response_ptr = ptr.child(status.as_str());
            let headers_ptr = response_ptr.child("headers");
            let empty = Object::new();
            let headers = object(response.get("headers"))
                .map(|headers| {
                    headers
                        .iter()
                        .map(|(name, header)| {
                            let header_ptr = headers_ptr.child(name.as_str());
                            Header {
                                name: name.clone(),
                                extensions: Extensions::collect(
                                    header.as_object().unwrap_or(&empty),
                                    &header_ptr,
                                ),
                                pointer: header_ptr,
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();
            Response {
                status: status.clone(),
                headers,
                pointer: response_ptr,
            }
        })
        .collect()
}

fn load_requirements(value: Option<&Value>, ptr: &JsonPointer) -> Option<SecurityRequirements> {
    let items = value?.as_array()?;
    let requirements = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let requirement_ptr = ptr.index(i);
            let entries = item
                .as_object()
                .map(|map| {
                    map.iter()
                        .map(|(scheme, scopes)| {
                            let entry_ptr = requirement_ptr.child(scheme.as_str());
                            let scopes = scopes
                                .as_array()
                                .map(|scopes| {
                                    scopes
                                        .iter()
                                        .enumerate()
                                        .filter_map(|(j, scope)| {
                                            Some(ScopeRef {
                                                name: scope.as_str()?.to_string(),
                                                pointer: entry_ptr.index(j),
                                            })
                                        })
                                        .collect()
                                })
                                .unwrap_or_default();
                            RequirementEntry {
                                scheme: scheme.clone(),
                                scopes,
                                pointer: entry_ptr,
                            }
                        })
                        .collect()
                })
                .unwrap_or_default();
            SecurityRequirement {
                entries,
                pointer: requirement_ptr,
            }
        })
        .collect();
    Some(SecurityRequirements {
        requirements,
        pointer: ptr.clone(),
    })
}

fn load_schemes(
    value: Option<&Value>,
    ptr: &JsonPointer,
    version_kind: ApiVersionKind,
) -> Vec<SecurityScheme> {
    let Some(map) = object(value) else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(name, scheme)| {
            let scheme = scheme.as_object()?;
            let scheme_ptr = ptr.child(name.as_str());
            let kind = scheme_kind(scheme);
            let flows = if kind == SchemeKind::OAuth2 {
                match version_kind {
                    ApiVersionKind::OpenApi3 => load_v3_flows(scheme, &scheme_ptr),
                    ApiVersionKind::Swagger2 => vec![load_v2_flow(scheme, &scheme_ptr)],
                }
            } else {
                Vec::new()
            };
            Some(SecurityScheme {
                name: name.clone(),
                kind,
                flows,
                pointer: scheme_ptr,
            })
        })
        .collect()
}

fn scheme_kind(scheme: &Object) -> SchemeKind {
    match scheme.get("type").and_then(Value::as_str) {
        Some("http") => match scheme.get("scheme").and_then(Value::as_str) {
            Some(s) if s.eq_ignore_ascii_case("bearer") => SchemeKind::HttpBearer,
            Some(s) => SchemeKind::Other(s.to_ascii_lowercase()),
            None => SchemeKind::Other("http".to_string()),
        },
        Some("oauth2") => SchemeKind::OAuth2,
        Some("apiKey") => SchemeKind::ApiKey,
        Some(other) => SchemeKind::Other(other.to_string()),
        None => SchemeKind::Other("unknown".to_string()),
    }
}

fn load_v3_flows(scheme: &Object, scheme_ptr: &JsonPointer) -> Vec<Flow> {
    let flows_ptr = scheme_ptr.child("flows");
    let Some(flows) = object(scheme.get("flows")) else {
        return Vec::new();
    };
    flows
        .iter()
        .filter_map(|(key, flow)| {
            let (_, kind) = FlowKind::V3_KEYS.iter().find(|(k, _)| *k == key.as_str())?;
            let flow = flow.as_object()?;
            let flow_ptr = flows_ptr.child(key.as_str());
            let scopes_ptr = flow_ptr.child("scopes");
            Some(Flow {
                kind: *kind,
                scopes: load_scopes(flow.get("scopes"), &scopes_ptr),
                pointer: flow_ptr,
                scopes_pointer: scopes_ptr,
            })
        })
        .collect()
}

fn load_v2_flow(scheme: &Object, scheme_ptr: &JsonPointer) -> Flow {
    let scopes_ptr = scheme_ptr.child("scopes");
    Flow {
        kind: FlowKind::from_v2(scheme.get("flow").and_then(Value::as_str)),
        scopes: load_scopes(scheme.get("scopes"), &scopes_ptr),
        pointer: scheme_ptr.clone(),
        scopes_pointer: scopes_ptr,
    }
}

fn load_scopes(value: Option<&Value>, ptr: &JsonPointer) -> Vec<Scope> {
    object(value)
        .map(|scopes| {
            scopes
                .iter()
                .map(|(name, description)| Scope {
                    name: name.clone(),
                    description: description.as_str().map(String::from),
                    pointer: ptr.child(name.as_str()),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn load_named_schemas(value: Option<&Value>, ptr: &JsonPointer) -> Vec<NamedSchema> {
    let Some(map) = object(value) else {
        return Vec::new();
    };
    map.iter()
        .map(|(name, schema)| NamedSchema {
            name: name.clone(),
            schema: load_schema(schema, &ptr.child(name.as_str())),
        })
        .collect()
}

fn load_schema(value: &Value, ptr: &JsonPointer) -> Schema {
    let Some(map) = value.as_object() else {
        return Schema {
            pointer: ptr.clone(),
            ..Schema::default()
        };
    };

    let properties_ptr = ptr.child("properties");
    let properties = object(map.get("properties"))
        .map(|props| {
            props
                .iter()
                .map(|(name, schema)| Property {
                    name: name.clone(),
                    schema: load_schema(schema, &properties_ptr.child(name.as_str())),
                })
                .collect()
        })
        .unwrap_or_default();

    let composed = ["allOf", "anyOf", "oneOf"]
        .iter()
        .filter_map(|key| {
            let members = map.get(*key)?.as_array()?;
            let key_ptr = ptr.child(*key);
            Some(
                members
                    .iter()
                    .enumerate()
                    .map(move |(i, member)| load_schema(member, &key_ptr.index(i))),
            )
        })
        .flatten()
        .collect();

    Schema {
        schema_type: string(map, "type"),
        format: string(map, "format"),
        properties,
        items: map
            .get("items")
            .map(|items| Box::new(load_schema(items, &ptr.child("items")))),
        composed,
        pointer: ptr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn build(value: &Value) -> SpecificationDocument {
        load(value).unwrap()
    }

    #[test]
    fn detects_version_kind() {
        assert_eq!(
            build(&json!({"openapi": "3.0.1"})).version_kind,
            ApiVersionKind::OpenApi3
        );
        assert_eq!(
            build(&json!({"swagger": "2.0"})).version_kind,
            ApiVersionKind::Swagger2
        );
    }

    #[test]
    fn rejects_non_specifications() {
        assert_eq!(load(&json!({"info": {}})), Err(ModelError::UnknownVersion));
        assert_eq!(
            load(&json!(["openapi"])),
            Err(ModelError::NotAnObject { found: "array" })
        );
    }

    #[test]
    fn keeps_path_order_and_fixed_method_order() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "paths": {
                "/zeta": {"post": {}, "get": {}},
                "/alpha": {"trace": {}, "delete": {}}
            }
        }));
        let templates: Vec<_> = doc.paths.iter().map(|p| p.template.as_str()).collect();
        assert_eq!(templates, ["/zeta", "/alpha"]);

        let zeta: Vec<_> = doc.paths[0].operations.iter().map(|o| o.method).collect();
        assert_eq!(zeta, [Method::Get, Method::Post]);
        assert_eq!(
            doc.paths[1].operations[1].pointer.to_string(),
            "/paths/~1alpha/trace"
        );
    }

    #[test]
    fn stamps_pointers_on_nested_nodes() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "paths": {
                "/orders": {
                    "parameters": [{"name": "X-Flow-ID", "in": "header"}],
                    "get": {
                        "parameters": [
                            {"$ref": "#/components/parameters/Limit"},
                            {"name": "X-Tenant", "in": "header"}
                        ],
                        "responses": {
                            "200": {"headers": {"X-RateLimit": {"schema": {"type": "integer"}}}}
                        },
                        "security": [{"oauth2": ["read", "write"]}]
                    }
                }
            }
        }));
        let item = doc.path("/orders").unwrap();
        assert_eq!(item.parameters[0].pointer.to_string(), "/paths/~1orders/parameters/0");

        let op = item.operation(Method::Get).unwrap();
        assert_eq!(op.parameters[0].name, None);
        assert!(op.parameters[1].is_header());
        assert_eq!(op.parameters[1].pointer.to_string(), "/paths/~1orders/get/parameters/1");
        assert_eq!(
            op.responses[0].headers[0].pointer.to_string(),
            "/paths/~1orders/get/responses/200/headers/X-RateLimit"
        );

        let security = op.security.as_ref().unwrap();
        let entry = &security.requirements[0].entries[0];
        assert_eq!(entry.pointer.to_string(), "/paths/~1orders/get/security/0/oauth2");
        assert_eq!(entry.scopes[1].name, "write");
        assert_eq!(
            entry.scopes[1].pointer.to_string(),
            "/paths/~1orders/get/security/0/oauth2/1"
        );
    }

    #[test]
    fn normalizes_v3_security_schemes() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "components": {"securitySchemes": {
                "BearerAuth": {"type": "http", "scheme": "Bearer"},
                "Basic": {"type": "http", "scheme": "basic"},
                "Key": {"type": "apiKey", "in": "header", "name": "X-Key"},
                "oauth2": {"type": "oauth2", "flows": {
                    "clientCredentials": {"tokenUrl": "https://t", "scopes": {"read": "Read"}},
                    "implicit": {"authorizationUrl": "https://a", "scopes": {"write": "Write"}}
                }}
            }}
        }));
        let schemes = &doc.components.security_schemes;
        assert_eq!(schemes[0].kind, SchemeKind::HttpBearer);
        assert_eq!(schemes[1].kind, SchemeKind::Other("basic".into()));
        assert_eq!(schemes[2].kind, SchemeKind::ApiKey);

        let oauth = doc.security_scheme("oauth2").unwrap();
        assert_eq!(oauth.flows.len(), 2);
        assert_eq!(oauth.flows[0].kind, FlowKind::ClientCredentials);
        assert!(oauth.declares_scope("write"));
        assert_eq!(
            oauth.flows[1].scopes[0].pointer.to_string(),
            "/components/securitySchemes/oauth2/flows/implicit/scopes/write"
        );
        assert_eq!(
            doc.components.security_schemes_pointer.to_string(),
            "/components/securitySchemes"
        );
    }

    #[test]
    fn normalizes_v2_security_definitions() {
        let doc = build(&json!({
            "swagger": "2.0",
            "securityDefinitions": {
                "oauth2": {"type": "oauth2", "flow": "application", "scopes": {"uid": "User id"}},
                "basic": {"type": "basic"}
            }
        }));
        let oauth = doc.security_scheme("oauth2").unwrap();
        assert_eq!(oauth.flows.len(), 1);
        assert_eq!(oauth.flows[0].kind, FlowKind::ClientCredentials);
        assert_eq!(
            oauth.flows[0].scopes_pointer.to_string(),
            "/securityDefinitions/oauth2/scopes"
        );
        assert_eq!(
            doc.security_scheme("basic").unwrap().kind,
            SchemeKind::Other("basic".into())
        );
        assert_eq!(
            doc.components.security_schemes_pointer.to_string(),
            "/securityDefinitions"
        );
    }

    #[test]
    fn loads_v2_security_definitions_from_yaml() {
        let value: Value = serde_yaml::from_str(
            r"
swagger: '2.0'
securityDefinitions:
  oauth2:
    type: oauth2
    flow: accessCode
    authorizationUrl: https://auth/authorize
    tokenUrl: https://auth/token
    scopes:
      write: Modify things
      read: Read things
  legacy:
    type: oauth2
security:
  - oauth2: [read]
",
        )
        .unwrap();
        let doc = build(&value);

        let oauth = doc.security_scheme("oauth2").unwrap();
        assert_eq!(oauth.flows[0].kind, FlowKind::AuthorizationCode);
        let scopes: Vec<_> = oauth.flows[0].scopes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(scopes, ["write", "read"]);
        assert_eq!(
            oauth.flows[0].scopes[1].pointer.to_string(),
            "/securityDefinitions/oauth2/scopes/read"
        );
        assert_eq!(
            doc.security_scheme("legacy").unwrap().flows[0].kind,
            FlowKind::Unspecified
        );
        assert_eq!(doc.security.as_ref().unwrap().requirements.len(), 1);
    }

    #[test]
    fn distinguishes_absent_and_empty_security() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "security": [],
            "paths": {"/a": {"get": {}, "put": {"security": []}}}
        }));
        assert!(doc.security.as_ref().unwrap().requirements.is_empty());
        let item = doc.path("/a").unwrap();
        assert!(item.operation(Method::Get).unwrap().security.is_none());
        assert!(item.operation(Method::Put).unwrap().security.is_some());
    }

    #[test]
    fn tolerates_malformed_fields() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "info": "not an object",
            "servers": [{"url": 42}, "bogus"],
            "paths": {"/a": "nope"},
            "security": {"oauth2": []}
        }));
        assert_eq!(doc.servers.len(), 2);
        assert!(doc.servers.iter().all(|s| s.url.is_none()));
        assert!(doc.paths.is_empty());
        assert!(doc.security.is_none());
        assert_eq!(doc.info.extensions.pointer_of("x-api-id").to_string(), "/info/x-api-id");
    }

    #[test]
    fn reads_server_variables() {
        let doc = build(&json!({
            "openapi": "3.0.0",
            "servers": [{
                "url": "https://api{env}.example.com/v1/things",
                "variables": {"env": {"enum": [".dev", ".env"], "default": ".dev"}}
            }]
        }));
        let env = doc.servers[0].variable("env").unwrap();
        assert_eq!(env.allowed.as_deref(), Some(&[".dev".to_string(), ".env".to_string()][..]));
        assert_eq!(env.default.as_deref(), Some(".dev"));
        assert_eq!(env.pointer.to_string(), "/servers/0/variables/env");
    }

    #[test]
    fn builds_schema_trees_from_definitions() {
        let doc = build(&json!({
            "swagger": "2.0",
            "definitions": {"Order": {
                "type": "object",
                "properties": {
                    "created": {"type": "string", "format": "date-time"},
                    "lines": {"type": "array", "items": {
                        "allOf": [{"properties": {"shipped_at": {"type": "string", "format": "date"}}}]
                    }}
                }
            }}
        }));
        let order = &doc.components.schemas[0];
        let mut names = Vec::new();
        order.schema.walk_properties(&mut |p: &Property| names.push((p.name.clone(), p.schema.pointer.to_string())));
        assert_eq!(
            names,
            [
                ("created".to_string(), "/definitions/Order/properties/created".to_string()),
                ("lines".to_string(), "/definitions/Order/properties/lines".to_string()),
                (
                    "shipped_at".to_string(),
                    "/definitions/Order/properties/lines/items/allOf/0/properties/shipped_at"
                        .to_string()
                ),
            ]
        );
    }
}
