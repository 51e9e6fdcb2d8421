//! Vendor extensions (`x-*` properties).

use crate::pointer::JsonPointer;
use serde_json::{Map, Value};

/// Result of a typed extension lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExtensionValue<'a, T> {
    /// The extension is not set.
    Absent,
    /// The extension is set and has the requested type.
    Present(T),
    /// The extension is set but holds a value of another type.
    WrongType(&'a Value),
}

impl<'a, T> ExtensionValue<'a, T> {
    /// Collapses wrong types into `None`.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::WrongType(_) => None,
        }
    }

    /// Whether the extension is not set at all.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// The `x-*` properties of one object in the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extensions {
    values: Map<String, Value>,
    pointer: JsonPointer,
}

impl Extensions {
    /// Collects every `x-` prefixed property of `object`.
    pub(crate) fn collect(object: &Map<String, Value>, pointer: &JsonPointer) -> Self {
        let values = object
            .iter()
            .filter(|(k, _)| k.starts_with("x-"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            values,
            pointer: pointer.clone(),
        }
    }

    /// Raw access to an extension value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an extension with this name is set (even to `null`).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Pointer of the named extension, whether or not it is set.
    #[must_use]
    pub fn pointer_of(&self, name: &str) -> JsonPointer {
        self.pointer.child(name)
    }

    /// Number of extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no extension is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a string extension. `null` counts as absent.
    #[must_use]
    pub fn str(&self, name: &str) -> ExtensionValue<'_, &str> {
        self.typed(name, Value::as_str)
    }

    /// Looks up a boolean extension. `null` counts as absent.
    #[must_use]
    pub fn bool(&self, name: &str) -> ExtensionValue<'_, bool> {
        self.typed(name, Value::as_bool)
    }

    /// Looks up an object extension. `null` counts as absent.
    #[must_use]
    pub fn object(&self, name: &str) -> ExtensionValue<'_, &Map<String, Value>> {
        self.typed(name, Value::as_object)
    }

    /// Looks up an array extension. `null` counts as absent.
    #[must_use]
    pub fn array(&self, name: &str) -> ExtensionValue<'_, &Vec<Value>> {
        self.typed(name, Value::as_array)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> ExtensionValue<'a, T> {
        match self.values.get(name) {
            None | Some(Value::Null) => ExtensionValue::Absent,
            Some(value) => convert(value).map_or(ExtensionValue::WrongType(value), |v| {
                ExtensionValue::Present(v)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extensions(value: Value) -> Extensions {
        let object = value.as_object().cloned().unwrap_or_default();
        Extensions::collect(&object, &JsonPointer::root().child("info"))
    }

    #[test]
    fn keeps_only_x_prefixed_keys() {
        let ext = extensions(json!({"title": "t", "x-audience": "company-internal"}));
        assert_eq!(ext.len(), 1);
        assert!(ext.contains("x-audience"));
        assert!(!ext.contains("title"));
    }

    #[test]
    fn typed_lookup_distinguishes_absent_and_wrong_type() {
        let ext = extensions(json!({
            "x-flag": true,
            "x-text": "sure",
            "x-null": null
        }));
        assert_eq!(ext.bool("x-flag"), ExtensionValue::Present(true));
        assert!(matches!(ext.bool("x-text"), ExtensionValue::WrongType(_)));
        assert!(ext.bool("x-missing").is_absent());
        assert!(ext.str("x-null").is_absent());
        assert_eq!(ext.str("x-text").ok(), Some("sure"));
    }

    #[test]
    fn pointer_of_is_relative_to_owner() {
        let ext = extensions(json!({}));
        assert_eq!(ext.pointer_of("x-api-id").to_string(), "/info/x-api-id");
    }
}
