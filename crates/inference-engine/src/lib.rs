//! URL Scoring Engine
//!
//! Loads optional trained components (JSON parameter files or ONNX models via
//! tract) and scores URL feature vectors, degrading to the heuristic scorer
//! from the `fallback` crate when the scaler or classifier is unavailable.

mod artifact;
mod component;
mod components;
mod config;
mod engine;
mod loader;
mod onnx;

pub use artifact::{ArtifactModel, JsonComponent};
pub use component::{Capabilities, ClassLabel, Component};
pub use components::{
    ClassifierHandle, ComponentSlots, Enrichment, SharedComponent, Slot, TrainedComponents,
};
pub use config::ArtifactConfig;
pub use engine::{EnrichmentOutcome, ScoringPipeline, FIXED_CONFIDENCE};
pub use fallback::{
    FallbackError, HeuristicConfig, HeuristicScorer, Label, RiskFactor, ScoringPath, Verdict,
};
pub use loader::{load_artifact, ArtifactFormat, ComponentLoader};
pub use onnx::OnnxComponent;

use thiserror::Error;

/// Errors during scoring
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error("{component} does not support {operation}")]
    Unsupported {
        component: String,
        operation: &'static str,
    },
}

/// Errors while reading a trained artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed JSON artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ONNX model error: {0}")]
    Onnx(String),
    #[error("Invalid artifact: {0}")]
    Invalid(String),
}
