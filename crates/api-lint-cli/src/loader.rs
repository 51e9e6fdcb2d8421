//! Reading specification files into the model.
//!
//! `.json` files are parsed as JSON, everything else as YAML. YAML allows
//! non-string mapping keys (`200:` under `responses`); those are turned into
//! their string form so that the document fits a JSON object model.

use anyhow::{Context, Result};
use api_lint_core::SpecificationDocument;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as Yaml;
use std::path::Path;

/// Extensions of files picked up when linting a directory.
pub const SPEC_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Whether `path` looks like a specification file.
#[must_use]
pub fn is_spec_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SPEC_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Reads and models one specification file.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid YAML/JSON, or is not an
/// OpenAPI/Swagger document.
pub fn load(path: &Path) -> Result<SpecificationDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value = parse(&text, is_json).with_context(|| format!("Failed to parse {}", path.display()))?;
    SpecificationDocument::from_value(&value)
        .with_context(|| format!("{} is not an API specification", path.display()))
}

fn parse(text: &str, is_json: bool) -> Result<Value> {
    if is_json {
        return Ok(serde_json::from_str(text)?);
    }
    let yaml: Yaml = serde_yaml::from_str(text)?;
    Ok(to_json(yaml))
}

fn to_json(yaml: Yaml) -> Value {
    match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => number(&n),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(to_json).collect()),
        Yaml::Mapping(mapping) => Value::Object(
            mapping
                .into_iter()
                .map(|(key, value)| (key_string(key), to_json(value)))
                .collect::<Map<_, _>>(),
        ),
        Yaml::Tagged(tagged) => to_json(tagged.value),
    }
}

fn number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)
    }
}

fn key_string(key: Yaml) -> String {
    match key {
        Yaml::String(s) => s,
        Yaml::Null => "null".to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
