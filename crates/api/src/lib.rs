//! Phishing URL Detection API Server
//!
//! Single-request scoring over HTTP: `POST /predict` classifies a URL,
//! `GET /health` reports liveness, `GET /metrics` exposes Prometheus metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use inference_engine::{
    ArtifactConfig, ComponentLoader, FallbackError, HeuristicConfig, HeuristicScorer,
    InferenceError, ScoringPipeline, Verdict,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use url_features::FeatureExtractor;

pub mod config;
pub mod error;
mod routes;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::ApiError;
pub use routes::predict::{PredictRequest, PredictResponse};

/// Application state shared across handlers; read-only after startup
pub struct AppState {
    /// URL feature extractor
    pub extractor: FeatureExtractor,
    /// Trained component loader
    pub loader: ComponentLoader,
    /// Scorer used when trained components are missing
    pub heuristic: HeuristicScorer,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state; artifacts are not read yet
    pub fn new(artifacts: ArtifactConfig, heuristic: HeuristicConfig) -> Result<Self, FallbackError> {
        Ok(Self {
            extractor: FeatureExtractor::new(),
            loader: ComponentLoader::new(artifacts),
            heuristic: HeuristicScorer::new(heuristic)?,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }

    /// Attach a Prometheus handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Scoring pipeline over the loaded components
    pub fn pipeline(&self) -> ScoringPipeline {
        ScoringPipeline::with_heuristic(self.loader.load(), self.heuristic.clone())
    }

    /// Extract features and score a URL
    pub fn score(&self, url: &str) -> Result<Verdict, InferenceError> {
        let features = self.extractor.extract(url);
        self.pipeline().score(&features)
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Prometheus scrape handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Run the server
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let mut state = AppState::new(config.artifacts.clone(), config.heuristic.clone())?;

    if config.server.metrics {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => state = state.with_metrics(handle),
            Err(e) => warn!("Metrics disabled: {}", e),
        }
    }

    // Load once up front; handlers reuse the same bundle
    let pipeline = state.pipeline();
    info!("Scoring path: {}", pipeline.path().as_str());

    let app = create_router(Arc::new(state));
    let addr = config.bind_addr();

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_state(artifacts: ArtifactConfig) -> Arc<AppState> {
        Arc::new(AppState::new(artifacts, HeuristicConfig::default()).unwrap())
    }

    fn router() -> Router {
        create_router(test_state(ArtifactConfig::in_dir("/nonexistent/phishing-models")))
    }

    async fn post_json(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = router()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(health.status, "ok");
    }

    #[tokio::test]
    async fn test_predict_heuristic() {
        let (status, body) = post_json(router(), json!({ "url": "http://1.2.3.4/login" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "phishing");
        assert_eq!(body["confidence"], 0.7);
        assert_eq!(
            body["risk_factors"],
            json!([
                "IP Address used in domain",
                "No HTTPS/SSL certificate",
                "Suspicious keywords in URL"
            ])
        );
    }

    #[tokio::test]
    async fn test_predict_legitimate() {
        let (status, body) = post_json(router(), json!({ "url": "https://example.com" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "legitimate");
        assert_eq!(body["confidence"], 0.95);
        assert_eq!(body["risk_factors"], json!([]));
    }

    #[tokio::test]
    async fn test_empty_url_rejected() {
        for body in [json!({ "url": "   " }), json!({ "url": 7 }), json!({})] {
            let (status, body) = post_json(router(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["detail"], "URL is required");
        }
    }

    #[tokio::test]
    async fn test_unreadable_body_gets_detail() {
        let requests = [
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"url\": "))
                .unwrap(),
            Request::builder()
                .method("POST")
                .uri("/predict")
                .body(Body::from(r#"{"url":"example.com"}"#))
                .unwrap(),
        ];

        for request in requests {
            let response = router().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert!(!body["detail"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_misconfigured_scaler_is_server_error() {
        let dir = std::env::temp_dir().join(format!("phishing-detector-api-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("scaler.json"),
            r#"{"kind":"standard_scaler","mean":[0.0],"scale":[1.0]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("phishing_model.json"),
            r#"{"kind":"linear_svc","coef":[1.0],"intercept":0.0}"#,
        )
        .unwrap();

        let app = create_router(test_state(ArtifactConfig::in_dir(&dir)));
        let (status, body) = post_json(app, json!({ "url": "example.com" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("Invalid input shape"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_metrics_disabled_without_recorder() {
        let response = router()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
