//! API Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inference_engine::InferenceError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client sent an unusable request
    #[error("{0}")]
    BadRequest(String),

    /// Scaler or classifier failed
    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),

    /// Scoring task did not complete
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for the error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Inference(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
