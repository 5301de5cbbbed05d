//! Prediction Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use inference_engine::{Label, Verdict};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::ApiError;
use crate::AppState;

/// Request body for the prediction endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    /// URL to classify; anything other than a string counts as empty
    #[serde(default)]
    pub url: Option<serde_json::Value>,
}

impl PredictRequest {
    /// Trimmed URL, empty when missing or not a string
    pub fn url(&self) -> &str {
        self.url
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .trim()
    }
}

/// Response for the prediction endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Label,
    /// Confidence rounded to 4 decimal places
    pub confidence: f64,
    pub risk_factors: Vec<String>,
}

impl From<Verdict> for PredictResponse {
    fn from(verdict: Verdict) -> Self {
        Self {
            prediction: verdict.label,
            confidence: round4(verdict.confidence),
            risk_factors: verdict.risk_factors,
        }
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Classify a URL
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected request body: {}", rejection);
        counter!("phishing_prediction_errors_total", "kind" => "bad_request").increment(1);
        ApiError::BadRequest(rejection.body_text())
    })?;

    let url = request.url().to_string();
    if url.is_empty() {
        counter!("phishing_prediction_errors_total", "kind" => "bad_request").increment(1);
        return Err(ApiError::BadRequest("URL is required".to_string()));
    }

    let start = std::time::Instant::now();
    let scorer = Arc::clone(&state);
    let verdict = tokio::task::spawn_blocking(move || scorer.score(&url))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            error!("Scoring failed: {}", e);
            counter!("phishing_prediction_errors_total", "kind" => "inference").increment(1);
            ApiError::from(e)
        })?;

    histogram!("phishing_prediction_duration_seconds").record(start.elapsed().as_secs_f64());
    counter!(
        "phishing_predictions_total",
        "label" => verdict.label.as_str(),
        "path" => verdict.path.as_str()
    )
    .increment(1);

    info!(
        "Prediction: {} (conf={:.4}, path={}, factors={})",
        verdict.label,
        verdict.confidence,
        verdict.path.as_str(),
        verdict.risk_factors.len()
    );
    debug!("Risk factors: {:?}", verdict.risk_factors);

    Ok(Json(verdict.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> PredictRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_url_trimmed() {
        assert_eq!(request(json!({ "url": "  example.com \n" })).url(), "example.com");
    }

    #[test]
    fn test_non_string_url_is_empty() {
        assert_eq!(request(json!({ "url": 42 })).url(), "");
        assert_eq!(request(json!({ "url": null })).url(), "");
        assert_eq!(request(json!({})).url(), "");
    }

    #[test]
    fn test_confidence_rounded() {
        assert_eq!(round4(0.700000000001), 0.7);
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.95), 0.95);
    }
}
