//! Rule-Based Fallback System
//!
//! Provides a heuristic URL scorer for when trained models are unavailable,
//! along with the risk-factor rules shared by every scoring path.

mod risk;
mod rules;
mod verdict;

pub use risk::{assess, RiskFactor};
pub use rules::{HeuristicConfig, HeuristicScorer, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
pub use verdict::{Label, ScoringPath, Verdict};

use thiserror::Error;

/// Errors in the fallback system
#[derive(Debug, Clone, Error)]
pub enum FallbackError {
    #[error("Invalid heuristic configuration: {0}")]
    InvalidConfig(String),
}
