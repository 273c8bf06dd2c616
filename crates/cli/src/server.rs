//! HTTP surface: ledger upload analysis, health and metrics.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use ringwatch_detection::analyzer::round_seconds;
use ringwatch_detection::{analyze, prepare_transactions, DetectionConfig, DetectionError, DetectionResult};
use ringwatch_ingest::{read_ledger_str, IngestError};
use ringwatch_telemetry::Metrics;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Shared state for request handlers.
pub struct AppState {
    pub config: DetectionConfig,
    pub metrics: Metrics,
}

/// Request failure rendered as `{"error": ...}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }
}

impl From<DetectionError> for ApiError {
    fn from(e: DetectionError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Analyze an uploaded ledger CSV. Ring ids start at 1 for every upload.
async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<DetectionResult>, ApiError> {
    let started = Instant::now();

    // Detection is CPU-bound; keep it off the async workers
    let mut result = tokio::task::spawn_blocking(move || run_upload(&state, &body))
        .await
        .map_err(|e| {
            error!("Analysis task failed: {}", e);
            ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "analysis task failed".to_string(),
            }
        })??;

    // Report end-to-end time, parsing included
    result.summary.processing_time_seconds = round_seconds(started.elapsed().as_secs_f64(), 2);
    Ok(Json(result))
}

/// Parse, prepare and analyze one upload, recording metrics.
fn run_upload(state: &AppState, body: &str) -> Result<DetectionResult, ApiError> {
    let records = read_ledger_str(body).map_err(|e| {
        warn!("Rejected upload: {}", e);
        ApiError::from(e)
    })?;
    let prepared = prepare_transactions(&records, &state.config).map_err(|e| {
        warn!("Rejected upload: {}", e);
        ApiError::from(e)
    })?;
    let result = analyze(&prepared.transactions, 1, &state.config)?;

    state.metrics.observe_rows(
        prepared.transactions.len(),
        prepared.dropped_rows,
        prepared.truncated_rows,
    );
    state.metrics.observe_result(&result);
    info!(
        "Analyzed upload of {} rows: {} rings",
        records.len(),
        result.summary.fraud_rings_detected
    );
    Ok(result)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StatusCode> {
    match state.metrics.gather() {
        Ok(body) => Ok((StatusCode::OK, body)),
        Err(e) => {
            error!("Failed to gather metrics: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Serve until the process is stopped.
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
