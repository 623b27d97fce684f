//! Error types for churn-ui JSON endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use churn_common::fields::FormError;
use churn_common::pipeline::PipelineError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Field outside its domain (400)
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] FormError),

    /// Malformed request body (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Pipeline raised; nothing was stored (500)
    #[error(transparent)]
    PredictionFailed(#[from] PipelineError),

    /// Artifacts failed to load at startup (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::PredictionFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PREDICTION_FAILED")
            }
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "ARTIFACTS_UNAVAILABLE"),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
