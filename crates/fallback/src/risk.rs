//! Risk Factor Rules
//!
//! Explainability strings derived from fixed positions of the unscaled
//! feature vector. Each rule fires at most once, so the output never holds
//! duplicates and its order is the rule order.

use serde::{Deserialize, Serialize};
use url_features::FeatureVector;

/// Length above which a URL is reported as abnormally long
pub const LONG_URL_THRESHOLD: f64 = 75.0;

/// Subdomain count above which the host is reported
pub const SUBDOMAIN_THRESHOLD: f64 = 2.0;

/// Host hyphen count above which the host is reported
pub const HYPHEN_THRESHOLD: f64 = 1.0;

/// A single explainable risk signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    IpAddressHost,
    NoHttps,
    SuspiciousKeywords,
    LongUrl,
    ManySubdomains,
    ManyHyphens,
}

impl RiskFactor {
    /// Rules evaluated when scoring with trained models
    pub const ALL: [RiskFactor; 6] = [
        RiskFactor::IpAddressHost,
        RiskFactor::NoHttps,
        RiskFactor::SuspiciousKeywords,
        RiskFactor::LongUrl,
        RiskFactor::ManySubdomains,
        RiskFactor::ManyHyphens,
    ];

    /// Rules evaluated by the heuristic scorer
    pub const BASE: [RiskFactor; 4] = [
        RiskFactor::IpAddressHost,
        RiskFactor::NoHttps,
        RiskFactor::SuspiciousKeywords,
        RiskFactor::LongUrl,
    ];

    /// Whether the rule fires for a feature vector
    pub fn applies(&self, features: &FeatureVector) -> bool {
        match self {
            RiskFactor::IpAddressHost => features.has_ip_host() == 1.0,
            RiskFactor::NoHttps => features.uses_https() == 0.0,
            RiskFactor::SuspiciousKeywords => features.keyword_hits() > 0.0,
            RiskFactor::LongUrl => features.url_length() > LONG_URL_THRESHOLD,
            RiskFactor::ManySubdomains => features.subdomain_count() > SUBDOMAIN_THRESHOLD,
            RiskFactor::ManyHyphens => features.host_hyphens() > HYPHEN_THRESHOLD,
        }
    }

    /// Full description, as reported alongside a trained prediction
    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::IpAddressHost => "IP Address used in domain",
            RiskFactor::NoHttps => "No HTTPS/SSL certificate",
            RiskFactor::SuspiciousKeywords => "Suspicious keywords in URL (e.g., login, bank)",
            RiskFactor::LongUrl => "URL is abnormally long",
            RiskFactor::ManySubdomains => "Multiple subdomains detected",
            RiskFactor::ManyHyphens => "Multiple hyphens in domain",
        }
    }

    /// Short description used by the heuristic scorer
    pub fn summary(&self) -> &'static str {
        match self {
            RiskFactor::SuspiciousKeywords => "Suspicious keywords in URL",
            other => other.description(),
        }
    }
}

/// Evaluate rules in order and return those that fire
pub fn assess(features: &FeatureVector, rules: &[RiskFactor]) -> Vec<RiskFactor> {
    rules
        .iter()
        .copied()
        .filter(|rule| rule.applies(features))
        .collect()
}
