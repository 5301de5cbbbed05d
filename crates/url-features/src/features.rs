//! Feature Vector Assembly

use crate::lexical::{self, CharProfile, COUNTED_CHARS};
use crate::parse::{UrlParts, UrlSplitter};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::trace;

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 30;

/// Substrings commonly found in credential-harvesting URLs
pub const SUSPICIOUS_KEYWORDS: [&str; 8] = [
    "login", "signin", "account", "verify", "secure", "bank", "paypal", "update",
];

/// Dotted-quad pattern; syntactic only, octets are not range checked
const DOTTED_QUAD: &str = r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}";

/// Positions with a meaning outside the extractor
pub mod feature_index {
    /// Length of the full URL
    pub const URL_LENGTH: usize = 0;
    /// 1.0 when the host contains a dotted quad
    pub const HAS_IP_HOST: usize = 18;
    /// Dots in the host minus one, floored at zero
    pub const SUBDOMAIN_COUNT: usize = 19;
    /// 1.0 when the URL starts with "https"
    pub const USES_HTTPS: usize = 20;
    /// Number of distinct suspicious keywords present
    pub const KEYWORD_HITS: usize = 23;
    /// Hyphens in the host
    pub const HOST_HYPHENS: usize = 24;
}

/// Fixed-width feature vector for URL classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Raw feature values
    pub values: [f64; FEATURE_DIMENSION],
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self {
            values: [0.0; FEATURE_DIMENSION],
        }
    }
}

impl FeatureVector {
    /// Build a vector from any number of values, zero-padding or truncating to width
    pub fn from_values(computed: &[f64]) -> Self {
        let mut values = [0.0; FEATURE_DIMENSION];
        let n = computed.len().min(FEATURE_DIMENSION);
        values[..n].copy_from_slice(&computed[..n]);
        Self { values }
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Value at an index
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn url_length(&self) -> f64 {
        self.values[feature_index::URL_LENGTH]
    }

    pub fn has_ip_host(&self) -> f64 {
        self.values[feature_index::HAS_IP_HOST]
    }

    pub fn subdomain_count(&self) -> f64 {
        self.values[feature_index::SUBDOMAIN_COUNT]
    }

    pub fn uses_https(&self) -> f64 {
        self.values[feature_index::USES_HTTPS]
    }

    pub fn keyword_hits(&self) -> f64 {
        self.values[feature_index::KEYWORD_HITS]
    }

    pub fn host_hyphens(&self) -> f64 {
        self.values[feature_index::HOST_HYPHENS]
    }
}

/// Feature extractor for raw URL strings
///
/// Holds compiled patterns only, so one instance can be shared across threads.
pub struct FeatureExtractor {
    splitter: UrlSplitter,
    dotted_quad: Regex,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new() -> Self {
        Self {
            splitter: UrlSplitter::new(),
            dotted_quad: Regex::new(DOTTED_QUAD).expect("dotted quad pattern is a valid regex"),
        }
    }

    /// Extract features from a raw URL. Never fails.
    pub fn extract(&self, url: &str) -> FeatureVector {
        let parts = self.splitter.parse(url);
        let computed = self.compute(&parts);
        trace!("Extracted {} features from {:?}", computed.len(), parts.full);
        FeatureVector::from_values(&computed)
    }

    fn compute(&self, parts: &UrlParts) -> Vec<f64> {
        let UrlParts {
            full,
            host,
            path,
            query,
        } = parts;

        let full_len = lexical::char_len(full);
        let host_len = lexical::char_len(host);
        let path_len = lexical::char_len(path);

        let mut values = Vec::with_capacity(FEATURE_DIMENSION);

        // Lengths
        values.push(full_len as f64);
        values.push(host_len as f64);
        values.push(path_len as f64);
        values.push(lexical::char_len(query) as f64);

        // Punctuation counts
        for c in COUNTED_CHARS {
            values.push(lexical::count_char(full, c) as f64);
        }

        // Composition ratios
        let profile = CharProfile::of(full);
        values.push(profile.digit_ratio());
        values.push(profile.letter_ratio());
        values.push(profile.special_ratio());

        // Host
        values.push(if self.dotted_quad.is_match(host) { 1.0 } else { 0.0 });
        values.push(lexical::count_char(host, '.').saturating_sub(1) as f64);
        values.push(if full.starts_with("https") { 1.0 } else { 0.0 });
        values.push(CharProfile::of(host).digits as f64);
        values.push(host_len as f64 / path_len.max(1) as f64);

        // Keywords
        let hits = SUSPICIOUS_KEYWORDS
            .iter()
            .filter(|keyword| full.contains(*keyword))
            .count();
        values.push(hits as f64);
        values.push(lexical::count_char(host, '-') as f64);

        // Path tokens
        let (longest, non_empty) = lexical::path_segments(path);
        values.push(longest as f64);
        values.push(non_empty as f64);

        values
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract features using a process-wide extractor
pub fn extract(url: &str) -> FeatureVector {
    static EXTRACTOR: OnceLock<FeatureExtractor> = OnceLock::new();
    EXTRACTOR.get_or_init(FeatureExtractor::new).extract(url)
}
