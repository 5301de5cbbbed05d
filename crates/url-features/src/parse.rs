//! URL Normalization and Component Split

use regex::Regex;
use thiserror::Error;

use crate::lexical::is_trimmable;

/// Generic URI split (RFC 3986, appendix B)
const URI_PATTERN: &str = r"(?s)^([a-z][a-z0-9+.\-]*):(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$";

/// Errors when splitting a normalized URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlParseError {
    /// Authority has a `[` without `]` or the reverse
    #[error("Invalid IPv6 authority: {0}")]
    UnbalancedBrackets(String),
    /// Input does not look like `scheme:rest`
    #[error("Unrecognized URL: {0}")]
    Unrecognized(String),
}

/// Components of a normalized URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Normalized URL, exactly as features are counted over it
    pub full: String,
    /// Authority (userinfo and port included)
    pub host: String,
    /// Path without the `;params` of its last segment
    pub path: String,
    /// Query string without the leading `?`
    pub query: String,
}

impl UrlParts {
    /// Parts used when the split fails: only `full` is populated
    pub fn unparsed(full: String) -> Self {
        Self {
            full,
            ..Default::default()
        }
    }
}

/// Trim, lower-case and make sure the URL carries an http(s) scheme.
pub fn normalize(raw: &str) -> String {
    let url = raw.trim_matches(is_trimmable).to_lowercase();
    if url.starts_with("http://") || url.starts_with("https://") {
        url
    } else {
        format!("https://{}", url)
    }
}

/// Splits normalized URLs into host, path and query
pub struct UrlSplitter {
    uri: Regex,
}

impl UrlSplitter {
    /// Create a new splitter
    pub fn new() -> Self {
        Self {
            uri: Regex::new(URI_PATTERN).expect("URI pattern is a valid regex"),
        }
    }

    /// Split a normalized URL into its components
    pub fn split(&self, normalized: &str) -> Result<UrlParts, UrlParseError> {
        // Tab, CR and LF are dropped before splitting but still count in `full`
        let cleaned: String = normalized
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();

        let caps = self
            .uri
            .captures(&cleaned)
            .ok_or_else(|| UrlParseError::Unrecognized(normalized.to_string()))?;

        let host = caps.get(2).map_or("", |m| m.as_str());
        if host.contains('[') != host.contains(']') {
            return Err(UrlParseError::UnbalancedBrackets(host.to_string()));
        }

        let path = caps.get(3).map_or("", |m| m.as_str());
        let query = caps.get(4).map_or("", |m| m.as_str());

        Ok(UrlParts {
            full: normalized.to_string(),
            host: host.to_string(),
            path: strip_params(path).to_string(),
            query: query.to_string(),
        })
    }

    /// Normalize and split, falling back to an empty host/path/query on failure
    pub fn parse(&self, raw: &str) -> UrlParts {
        let normalized = normalize(raw);
        match self.split(&normalized) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::debug!("URL split failed, using unparsed form: {}", e);
                UrlParts::unparsed(normalized)
            }
        }
    }
}

impl Default for UrlSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop `;params` from the last path segment.
fn strip_params(path: &str) -> &str {
    let last_segment = path.rfind('/').unwrap_or(0);
    match path[last_segment..].find(';') {
        Some(offset) => &path[..last_segment + offset],
        None => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize("  Example.COM/Login "), "https://example.com/login");
        assert_eq!(normalize("http://a.b"), "http://a.b");
        assert_eq!(normalize(""), "https://");
    }

    #[test]
    fn test_normalize_trims_separators() {
        assert_eq!(normalize("  \u{1c}example.com\u{1f}"), "https://example.com");
        assert_eq!(normalize("\u{3000}Example.com\u{a0}"), "https://example.com");
    }

    #[test]
    fn test_split_components() {
        let splitter = UrlSplitter::new();
        let parts = splitter
            .split("https://user@shop.example.com:8443/a/b.html?x=1&y=2#top")
            .unwrap();
        assert_eq!(parts.host, "user@shop.example.com:8443");
        assert_eq!(parts.path, "/a/b.html");
        assert_eq!(parts.query, "x=1&y=2");
    }

    #[test]
    fn test_split_without_path() {
        let splitter = UrlSplitter::new();
        let parts = splitter.split("https://example.com").unwrap();
        assert_eq!(parts.host, "example.com");
        assert_eq!(parts.path, "");
        assert_eq!(parts.query, "");
    }

    #[test]
    fn test_params_stripped_from_last_segment_only() {
        assert_eq!(strip_params("/a;v=1/b;jsessionid=42"), "/a;v=1/b");
        assert_eq!(strip_params("/a/b"), "/a/b");
        assert_eq!(strip_params(""), "");
    }

    #[test]
    fn test_unbalanced_brackets_fall_back() {
        let splitter = UrlSplitter::new();
        assert!(matches!(
            splitter.split("https://[::1/x"),
            Err(UrlParseError::UnbalancedBrackets(_))
        ));

        let parts = splitter.parse("https://[::1/x?q=1");
        assert_eq!(parts.full, "https://[::1/x?q=1");
        assert!(parts.host.is_empty());
        assert!(parts.path.is_empty());
        assert!(parts.query.is_empty());
    }

    #[test]
    fn test_control_characters_removed_before_split() {
        let splitter = UrlSplitter::new();
        let parts = splitter.split("https://exa\tmple.com/p\nath").unwrap();
        assert_eq!(parts.host, "example.com");
        assert_eq!(parts.path, "/path");
        assert_eq!(parts.full, "https://exa\tmple.com/p\nath");
    }
}
