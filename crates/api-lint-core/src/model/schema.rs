//! Data schemas (`components.schemas` / `definitions`).

use crate::pointer::{JsonPointer, Locatable};

/// A schema node. Only the parts rules inspect are modelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    /// `type`, when it is a single string.
    pub schema_type: Option<String>,
    /// `format`.
    pub format: Option<String>,
    /// `properties` in document order.
    pub properties: Vec<Property>,
    /// `items` of an array schema.
    pub items: Option<Box<Schema>>,
    /// Members of `allOf`, `anyOf` and `oneOf`.
    pub composed: Vec<Schema>,
    /// Pointer of the schema object.
    pub pointer: JsonPointer,
}

impl Schema {
    /// Visits every property of this schema and of all nested schemas,
    /// depth first in document order.
    pub fn walk_properties<'a>(&'a self, visit: &mut impl FnMut(&'a Property)) {
        for property in &self.properties {
            visit(property);
            property.schema.walk_properties(visit);
        }
        if let Some(items) = &self.items {
            items.walk_properties(visit);
        }
        for member in &self.composed {
            member.walk_properties(visit);
        }
    }
}

impl Locatable for Schema {
    fn pointer(&self) -> &JsonPointer {
        &self.pointer
    }
}

/// A named property of an object schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    /// Property schema; its pointer is the property's pointer.
    pub schema: Schema,
}

impl Locatable for Property {
    fn pointer(&self) -> &JsonPointer {
        &self.schema.pointer
    }
}

/// A named top-level schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSchema {
    /// Schema name.
    pub name: String,
    /// The schema.
    pub schema: Schema,
}
