//! Scoring Pipeline Implementation

use crate::components::{ClassifierHandle, Enrichment, SharedComponent, TrainedComponents};
use crate::InferenceError;
use fallback::{assess, HeuristicScorer, Label, RiskFactor, ScoringPath, Verdict};
use std::sync::Arc;
use tracing::{debug, warn};
use url_features::FeatureVector;

/// Confidence reported when the classifier has no probabilities
pub const FIXED_CONFIDENCE: f64 = 0.9;

/// Class name accepted as phishing when the classifier has a label list
const PHISHING_CLASS: &str = "phishing";

/// Output of the best-effort enrichment stage
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentOutcome {
    /// Columns to append to the scaled row
    Enriched(Vec<f64>),
    /// Not configured or failed; the scaled row is used alone
    Unavailable,
}

/// Scores feature vectors with trained components, or heuristically when the
/// scaler or classifier is missing.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    components: Arc<TrainedComponents>,
    heuristic: HeuristicScorer,
}

impl ScoringPipeline {
    /// Create a pipeline with the default heuristic scorer
    pub fn new(components: Arc<TrainedComponents>) -> Self {
        Self::with_heuristic(components, HeuristicScorer::default())
    }

    /// Create a pipeline with a custom heuristic scorer
    pub fn with_heuristic(components: Arc<TrainedComponents>, heuristic: HeuristicScorer) -> Self {
        Self {
            components,
            heuristic,
        }
    }

    /// Score a feature vector.
    ///
    /// Scaler and classifier failures are returned as errors; enrichment
    /// failures are not.
    pub fn score(&self, features: &FeatureVector) -> Result<Verdict, InferenceError> {
        match self.components.trained_path() {
            Some((scaler, classifier)) => self.score_trained(features, scaler, classifier),
            None => Ok(self.heuristic.score(features)),
        }
    }

    /// Which path [`ScoringPipeline::score`] will take
    pub fn path(&self) -> ScoringPath {
        if self.components.trained_path().is_some() {
            ScoringPath::Trained
        } else {
            ScoringPath::Heuristic
        }
    }

    /// Get components
    pub fn components(&self) -> &TrainedComponents {
        &self.components
    }

    fn score_trained(
        &self,
        features: &FeatureVector,
        scaler: &SharedComponent,
        classifier: &ClassifierHandle,
    ) -> Result<Verdict, InferenceError> {
        let start = std::time::Instant::now();

        let scaled = scaler.transform(features.as_slice())?;

        let row = match self.enrich(&scaled) {
            EnrichmentOutcome::Enriched(extra) if !extra.is_empty() => {
                let mut row = scaled;
                row.extend(extra);
                row
            }
            _ => scaled,
        };

        let prediction = classifier.component.predict(&row)?;
        let confidence = if classifier.probabilities {
            let proba = classifier.component.predict_proba(&row)?;
            proba
                .into_iter()
                .reduce(f64::max)
                .ok_or_else(|| {
                    InferenceError::InferenceFailed(format!(
                        "{} returned no probabilities",
                        classifier.component.name()
                    ))
                })?
        } else {
            FIXED_CONFIDENCE
        };

        let label = if prediction.is_one()
            || (classifier.class_labels && prediction.names(PHISHING_CLASS))
        {
            Label::Phishing
        } else {
            Label::Legitimate
        };

        // Explanations come from the unscaled features
        let risk_factors = assess(features, &RiskFactor::ALL)
            .into_iter()
            .map(|factor| factor.description().to_string())
            .collect();

        debug!(
            "Trained prediction {} -> {} (conf={:.4}, features={}, latency={:?})",
            prediction,
            label,
            confidence,
            row.len(),
            start.elapsed()
        );

        Ok(Verdict {
            label,
            confidence,
            risk_factors,
            path: ScoringPath::Trained,
        })
    }

    /// Run the enrichment stage on a scaled row, absorbing any failure
    pub fn enrich(&self, scaled: &[f64]) -> EnrichmentOutcome {
        match self.try_enrich(scaled) {
            Ok(Some(output)) => EnrichmentOutcome::Enriched(output),
            Ok(None) => EnrichmentOutcome::Unavailable,
            Err(e) => {
                warn!("Enrichment failed, using scaled features only: {}", e);
                EnrichmentOutcome::Unavailable
            }
        }
    }

    fn try_enrich(&self, scaled: &[f64]) -> Result<Option<Vec<f64>>, InferenceError> {
        let output = match &self.components.enrichment {
            Enrichment::None => return Ok(None),
            Enrichment::Transform(component) => component.transform(scaled)?,
            Enrichment::PredictOnly(component) => vec![component.predict(scaled)?.as_feature()?],
            Enrichment::Passthrough => scaled.to_vec(),
        };

        match &self.components.enrichment_scaler {
            Some(scaler) => Ok(Some(scaler.transform(&output)?)),
            None => Ok(Some(output)),
        }
    }
}
