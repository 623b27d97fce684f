//! churn-ui library interface
//!
//! Web front end for the churn predictor: a Data Input form, a Prediction
//! Result view and a small JSON API, all backed by artifacts loaded once at
//! startup.

pub mod api;
pub mod cli;
pub mod error;
pub mod logging;
pub mod session;
pub mod view;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use churn_common::model::{ArtifactError, TrainedArtifacts};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::session::SessionStore;

/// Outcome of the startup artifact load
#[derive(Debug)]
pub enum ArtifactStatus {
    Ready(TrainedArtifacts),
    /// Load failed; the message is shown in place of every page
    Failed(String),
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded once, read-only afterwards
    pub artifacts: Arc<ArtifactStatus>,
    /// Per-browser prediction slots
    pub sessions: SessionStore,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(artifacts: Result<TrainedArtifacts, ArtifactError>, session_ttl: Duration) -> Self {
        let status = match artifacts {
            Ok(artifacts) => ArtifactStatus::Ready(artifacts),
            Err(e) => ArtifactStatus::Failed(e.to_string()),
        };
        Self {
            artifacts: Arc::new(status),
            sessions: SessionStore::new(session_ttl),
            startup_time: Utc::now(),
        }
    }

    /// Loaded artifacts, or the startup error message
    pub fn artifacts(&self) -> Result<&TrainedArtifacts, &str> {
        match self.artifacts.as_ref() {
            ArtifactStatus::Ready(artifacts) => Ok(artifacts),
            ArtifactStatus::Failed(message) => Err(message),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::prediction_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
