//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok", or "error" when artifacts failed to load
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
    /// Startup failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let last_error = state.artifacts().err().map(str::to_string);

    Json(HealthResponse {
        status: if last_error.is_some() { "error" } else { "ok" }.to_string(),
        module: "churn-ui".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        active_sessions: state.sessions.active_count().await,
        last_error,
    })
}

/// Build health check and build info routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/buildinfo", get(super::get_build_info))
}
