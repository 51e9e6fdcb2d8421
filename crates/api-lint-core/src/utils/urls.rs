//! URL and path-template helpers for versioning rules.

/// Splits a server URL into host and path.
///
/// The scheme is optional; the path keeps its leading `/` and is empty when
/// the URL has none.
///
/// # Example
///
/// ```
/// use api_lint_core::utils::urls::split_url;
///
/// assert_eq!(split_url("https://api.example.com/v1/things"), ("api.example.com", "/v1/things"));
/// assert_eq!(split_url("api.example.com"), ("api.example.com", ""));
/// ```
#[must_use]
pub fn split_url(url: &str) -> (&str, &str) {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    }
}

/// The path part of a server URL.
#[must_use]
pub fn url_path(url: &str) -> &str {
    split_url(url).1
}

/// A `v<major>` token found in a URL path or path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionToken<'a> {
    /// The token itself, e.g. `v1` or `v1.2`.
    pub text: &'a str,
    /// Index of the non-empty path segment that holds the token.
    pub segment: usize,
}

impl VersionToken<'_> {
    /// Whether the version carries a minor part (`v1.2`).
    #[must_use]
    pub fn has_decimal(&self) -> bool {
        self.text.contains('.')
    }
}

fn is_version(word: &str) -> bool {
    let Some(number) = word.strip_prefix(['v', 'V']) else {
        return false;
    };
    !number.is_empty()
        && number
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// Finds version tokens in a path, in order.
///
/// Segments are split on `-` and `_`, so `orders-v2` holds a token while
/// `vouchers` or `v1beta` do not.
///
/// # Example
///
/// ```
/// use api_lint_core::utils::urls::version_tokens;
///
/// let tokens = version_tokens("/shop/orders-v2/{id}");
/// assert_eq!(tokens.len(), 1);
/// assert_eq!(tokens[0].text, "v2");
/// assert_eq!(tokens[0].segment, 1);
/// ```
#[must_use]
pub fn version_tokens(path: &str) -> Vec<VersionToken<'_>> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .enumerate()
        .flat_map(|(index, segment)| {
            segment
                .split(['-', '_'])
                .filter(|word| is_version(word))
                .map(move |text| VersionToken {
                    text,
                    segment: index,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_urls_with_and_without_scheme() {
        assert_eq!(
            split_url("http://api{env}.example.com/v1/orders"),
            ("api{env}.example.com", "/v1/orders")
        );
        assert_eq!(split_url("api.example.com/x"), ("api.example.com", "/x"));
        assert_eq!(url_path("https://host"), "");
    }

    #[test]
    fn recognizes_version_words() {
        assert!(is_version("v1"));
        assert!(is_version("V12"));
        assert!(is_version("v1.2"));
        assert!(!is_version("v"));
        assert!(!is_version("v1."));
        assert!(!is_version("v1beta"));
        assert!(!is_version("vouchers"));
    }

    #[test]
    fn finds_whole_and_embedded_tokens() {
        let tokens = version_tokens("/v1/things/items_v2");
        assert_eq!(
            tokens,
            [
                VersionToken {
                    text: "v1",
                    segment: 0
                },
                VersionToken {
                    text: "v2",
                    segment: 2
                },
            ]
        );
    }

    #[test]
    fn decimal_versions_are_tokens() {
        let tokens = version_tokens("/api/v1.5/things");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].has_decimal());
        assert_eq!(tokens[0].segment, 1);
    }

    #[test]
    fn plain_paths_have_no_tokens() {
        assert!(version_tokens("/orders/{order-id}/lines").is_empty());
        assert!(version_tokens("").is_empty());
    }
}
