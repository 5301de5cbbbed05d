//! Classification Verdict

use serde::{Deserialize, Serialize};

/// Final classification of a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Phishing,
    Legitimate,
}

impl Label {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Phishing => "phishing",
            Label::Legitimate => "legitimate",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which scoring path produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPath {
    /// Scaler, optional enrichment and classifier
    Trained,
    /// Fixed formula over raw features
    Heuristic,
}

impl ScoringPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPath::Trained => "trained",
            ScoringPath::Heuristic => "heuristic",
        }
    }
}

/// Result of scoring a single URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Predicted label
    pub label: Label,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f64,
    /// Human-readable reasons, in rule order
    pub risk_factors: Vec<String>,
    /// Path that produced the verdict
    pub path: ScoringPath,
}

impl Verdict {
    /// Whether the URL was classified as phishing
    pub fn is_phishing(&self) -> bool {
        self.label == Label::Phishing
    }
}
