//! Heuristic URL Scoring

use crate::risk::{assess, RiskFactor};
use crate::verdict::{Label, ScoringPath, Verdict};
use crate::FallbackError;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url_features::FeatureVector;

/// Lowest confidence a heuristic verdict may carry
pub const CONFIDENCE_FLOOR: f64 = 0.5;

/// Highest confidence a heuristic verdict may carry
pub const CONFIDENCE_CEILING: f64 = 0.95;

/// Heuristic scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Scores strictly above this are phishing
    pub phishing_threshold: f64,
    /// URL length that saturates the length term
    pub length_scale: f64,
    /// Lower confidence bound
    pub min_confidence: f64,
    /// Upper confidence bound
    pub max_confidence: f64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            phishing_threshold: 0.45,
            length_scale: 200.0,
            min_confidence: CONFIDENCE_FLOOR,
            max_confidence: CONFIDENCE_CEILING,
        }
    }
}

impl HeuristicConfig {
    /// Check that the bounds are usable. Confidence bounds may narrow
    /// [`CONFIDENCE_FLOOR`, `CONFIDENCE_CEILING`] but never widen it.
    pub fn validate(&self) -> Result<(), FallbackError> {
        if !(0.0..=1.0).contains(&self.phishing_threshold) {
            return Err(FallbackError::InvalidConfig(format!(
                "phishing_threshold {} outside [0, 1]",
                self.phishing_threshold
            )));
        }
        if !(self.length_scale > 0.0) {
            return Err(FallbackError::InvalidConfig(format!(
                "length_scale must be positive, got {}",
                self.length_scale
            )));
        }
        if !(CONFIDENCE_FLOOR <= self.min_confidence
            && self.min_confidence <= self.max_confidence
            && self.max_confidence <= CONFIDENCE_CEILING)
        {
            return Err(FallbackError::InvalidConfig(format!(
                "confidence bounds [{}, {}] must be ordered within [{}, {}]",
                self.min_confidence, self.max_confidence, CONFIDENCE_FLOOR, CONFIDENCE_CEILING
            )));
        }
        Ok(())
    }
}

/// Deterministic scorer over raw features
#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    config: HeuristicConfig,
}

impl HeuristicScorer {
    /// Create a scorer with a validated configuration
    pub fn new(config: HeuristicConfig) -> Result<Self, FallbackError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Suspicion score in [0, 1]: mean of the IP flag, the missing-HTTPS flag and
    /// the saturated length.
    pub fn suspicion(&self, features: &FeatureVector) -> f64 {
        let length_term = (features.url_length() / self.config.length_scale).min(1.0);
        (features.has_ip_host() + (1.0 - features.uses_https()) + length_term) / 3.0
    }

    /// Confidence grows with distance from 0.5, within the configured bounds.
    pub fn confidence(&self, score: f64) -> f64 {
        (0.5 + (score - 0.5).abs()).clamp(self.config.min_confidence, self.config.max_confidence)
    }

    /// Score a feature vector
    pub fn score(&self, features: &FeatureVector) -> Verdict {
        let score = self.suspicion(features);
        let label = if score > self.config.phishing_threshold {
            Label::Phishing
        } else {
            Label::Legitimate
        };
        let confidence = self.confidence(score);

        let risk_factors = assess(features, &RiskFactor::BASE)
            .into_iter()
            .map(|factor| factor.summary().to_string())
            .collect();

        debug!(
            "Heuristic score {:.4}: {} (conf={:.4})",
            score, label, confidence
        );

        Verdict {
            label,
            confidence,
            risk_factors,
            path: ScoringPath::Heuristic,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use url_features::{extract, feature_index, FEATURE_DIMENSION};

    #[test]
    fn test_ip_over_http_is_phishing() {
        let scorer = HeuristicScorer::default();
        let verdict = scorer.score(&extract("http://1.2.3.4/login"));

        // (1 + 1 + 20/200) / 3 = 0.7
        assert_eq!(verdict.label, Label::Phishing);
        assert!((verdict.confidence - 0.7).abs() < 1e-9);
        assert_eq!(verdict.path, ScoringPath::Heuristic);
        assert_eq!(
            verdict.risk_factors,
            vec![
                "IP Address used in domain",
                "No HTTPS/SSL certificate",
                "Suspicious keywords in URL"
            ]
        );
    }

    #[test]
    fn test_short_https_url_is_legitimate() {
        let scorer = HeuristicScorer::default();
        let verdict = scorer.score(&extract("https://example.com"));

        assert_eq!(verdict.label, Label::Legitimate);
        // score = 19/600, confidence = 0.5 + |score - 0.5|
        assert!(verdict.confidence > 0.9 && verdict.confidence <= 0.95);
        assert!(verdict.risk_factors.is_empty());
    }

    #[test]
    fn test_no_subdomain_or_hyphen_factors() {
        let scorer = HeuristicScorer::default();
        let verdict = scorer.score(&extract("http://a.b.c.d-e-f.example.com/"));

        assert_eq!(verdict.risk_factors, vec!["No HTTPS/SSL certificate"]);
    }

    #[test]
    fn test_confidence_minimal_at_boundary() {
        let scorer = HeuristicScorer::default();
        assert_eq!(scorer.confidence(0.5), 0.5);
        assert_eq!(scorer.confidence(1.0), 0.95);
        assert_eq!(scorer.confidence(0.0), 0.95);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HeuristicConfig {
            min_confidence: 0.9,
            max_confidence: 0.6,
            ..Default::default()
        };
        assert!(HeuristicScorer::new(config).is_err());

        let config = HeuristicConfig {
            length_scale: 0.0,
            ..Default::default()
        };
        assert!(HeuristicScorer::new(config).is_err());
    }

    #[test]
    fn test_confidence_bounds_cannot_widen() {
        for (min, max) in [(0.0, 0.95), (0.5, 1.0), (0.4, 0.99)] {
            let config = HeuristicConfig {
                min_confidence: min,
                max_confidence: max,
                ..Default::default()
            };
            assert!(HeuristicScorer::new(config).is_err(), "[{}, {}]", min, max);
        }

        let narrowed = HeuristicConfig {
            min_confidence: 0.6,
            max_confidence: 0.9,
            ..Default::default()
        };
        let scorer = HeuristicScorer::new(narrowed).unwrap();
        assert_eq!(scorer.confidence(1.0), 0.9);
        assert_eq!(scorer.confidence(0.5), 0.6);
    }

    proptest! {
        #[test]
        fn prop_label_and_confidence_follow_formula(
            length in 0.0f64..1000.0,
            ip in prop::bool::ANY,
            https in prop::bool::ANY,
        ) {
            let mut values = [0.0; FEATURE_DIMENSION];
            values[feature_index::URL_LENGTH] = length;
            values[feature_index::HAS_IP_HOST] = if ip { 1.0 } else { 0.0 };
            values[feature_index::USES_HTTPS] = if https { 1.0 } else { 0.0 };
            let features = FeatureVector { values };

            let verdict = HeuristicScorer::default().score(&features);

            let ip_term = if ip { 1.0 } else { 0.0 };
            let https_term = if https { 0.0 } else { 1.0 };
            let score = (ip_term + https_term + (length / 200.0).min(1.0)) / 3.0;
            let expected = if score > 0.45 { Label::Phishing } else { Label::Legitimate };

            prop_assert_eq!(verdict.label, expected);
            prop_assert!((0.5..=0.95).contains(&verdict.confidence));
        }

        #[test]
        fn prop_any_url_confidence_in_bounds(url in any::<String>()) {
            let verdict = HeuristicScorer::default().score(&extract(&url));
            prop_assert!((0.5..=0.95).contains(&verdict.confidence));
        }
    }
}
