//! JSON Pointer locations for specification nodes.
//!
//! Every node of the [`SpecificationDocument`](crate::SpecificationDocument)
//! records the pointer of its position in the source document while the
//! model is built. Violations carry that pointer, so a location stays the
//! same no matter which traversal path a rule took to reach the node.
//!
//! Tokens are escaped per RFC 6901 when rendered: `~` becomes `~0` and `/`
//! becomes `~1`. Path templates contain `/`, so `/paths/~1things/get` is the
//! pointer of the `get` operation under `/things`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Errors produced when parsing a pointer string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    /// A non-empty pointer must start with `/`.
    #[error("JSON pointer `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    /// `~` must be followed by `0` or `1`.
    #[error("JSON pointer `{0}` contains an invalid escape sequence")]
    InvalidEscape(String),
}

/// A hierarchical location inside a specification document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the document root (renders as the empty string).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a pointer from unescaped reference tokens.
    #[must_use]
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns a new pointer one property deeper.
    #[must_use]
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    /// Returns a new pointer one array element deeper.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// The unescaped reference tokens.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this is the root pointer.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Looks the pointer up in a raw document value.
    ///
    /// Returns `None` when any token does not resolve, e.g. for synthetic
    /// pointers to collections that are absent from the document.
    #[must_use]
    pub fn resolve<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        self.tokens
            .iter()
            .try_fold(value, |current, token| match current {
                Value::Object(map) => map.get(token),
                Value::Array(items) => token.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape(token: &str, whole: &str) -> Result<String, PointerError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return Err(PointerError::InvalidEscape(whole.to_string())),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape(token))?;
        }
        Ok(())
    }
}

impl FromStr for JsonPointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let Some(rest) = s.strip_prefix('/') else {
            return Err(PointerError::MissingLeadingSlash(s.to_string()));
        };
        let tokens = rest
            .split('/')
            .map(|t| unescape(t, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { tokens })
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Anything that knows its own location in the document.
///
/// Implemented by model nodes and by [`JsonPointer`] itself, so a rule can
/// report either a concrete node or a synthetic location such as `/servers`.
pub trait Locatable {
    /// The pointer of this node.
    fn pointer(&self) -> &JsonPointer;
}

impl Locatable for JsonPointer {
    fn pointer(&self) -> &JsonPointer {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_path_templates() {
        let pointer = JsonPointer::root()
            .child("paths")
            .child("/shop/orders-v1/{order-id}");
        assert_eq!(pointer.to_string(), "/paths/~1shop~1orders-v1~1{order-id}");
    }

    #[test]
    fn escapes_tilde_before_slash() {
        let pointer = JsonPointer::from_tokens(["a~/b"]);
        assert_eq!(pointer.to_string(), "/a~0~1b");
    }

    #[test]
    fn parse_round_trips_escaped_tokens() {
        let pointer: JsonPointer = "/paths/~1article/post/security/0/oauth2/0"
            .parse()
            .unwrap();
        assert_eq!(pointer.tokens()[1], "/article");
        assert_eq!(pointer.to_string(), "/paths/~1article/post/security/0/oauth2/0");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            "servers".parse::<JsonPointer>(),
            Err(PointerError::MissingLeadingSlash(_))
        ));
        assert!(matches!(
            "/a~2".parse::<JsonPointer>(),
            Err(PointerError::InvalidEscape(_))
        ));
    }

    #[test]
    fn root_renders_empty() {
        assert_eq!(JsonPointer::root().to_string(), "");
        assert!("".parse::<JsonPointer>().unwrap().is_root());
    }

    #[test]
    fn resolves_against_raw_value() {
        let doc = json!({
            "servers": [{"url": "https://a"}, {"url": "https://b"}],
            "paths": {"/x": {"get": {}}}
        });
        let server = JsonPointer::root().child("servers").index(1).child("url");
        assert_eq!(server.resolve(&doc), Some(&json!("https://b")));

        let op = JsonPointer::from_tokens(["paths", "/x", "get"]);
        assert_eq!(op.resolve(&doc), Some(&json!({})));

        let missing = JsonPointer::from_tokens(["components", "securitySchemes"]);
        assert!(missing.resolve(&doc).is_none());
    }

    #[test]
    fn serializes_as_string() {
        let pointer = JsonPointer::from_tokens(["servers", "0"]);
        assert_eq!(serde_json::to_string(&pointer).unwrap(), "\"/servers/0\"");
        let back: JsonPointer = serde_json::from_str("\"/servers/0\"").unwrap();
        assert_eq!(back, pointer);
    }
}
