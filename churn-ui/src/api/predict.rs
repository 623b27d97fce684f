//! JSON prediction API
//!
//! POST /api/predict, GET /api/result, GET /api/fields

use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use churn_common::fields::{collect, FieldSpec, FIELDS};
use churn_common::{infer, PredictionResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::view::render;
use crate::AppState;

/// Prediction with its rendered message
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub verdict: &'static str,
    pub message: String,
}

impl PredictionResponse {
    fn new(result: PredictionResult) -> Self {
        let view = render(Some(&result));
        Self {
            result,
            verdict: view.verdict().unwrap_or_default(),
            message: view.message(),
        }
    }
}

/// GET /api/result response
#[derive(Debug, Serialize)]
pub struct StoredResultResponse {
    /// `null` until the session's first successful prediction
    pub prediction: Option<PredictionResult>,
    pub message: String,
}

/// Flatten JSON scalars to the strings a form would submit
fn form_values(body: HashMap<String, Value>) -> ApiResult<HashMap<String, String>> {
    body.into_iter()
        .map(|(name, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => if b { "1" } else { "0" }.to_string(),
                other => {
                    return Err(ApiError::BadRequest(format!(
                        "{}: expected a string or number, got {}",
                        name, other
                    )))
                }
            };
            Ok((name, text))
        })
        .collect()
}

/// POST /api/predict
///
/// Stateless: the session slot is not touched.
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, Value>>,
) -> ApiResult<Json<PredictionResponse>> {
    let artifacts = state
        .artifacts()
        .map_err(|message| ApiError::Unavailable(message.to_string()))?;

    let record = collect(&form_values(body)?)?;
    let result = infer(&record, artifacts).map_err(|e| {
        warn!(error = %e, "API prediction failed");
        ApiError::from(e)
    })?;

    Ok(Json(PredictionResponse::new(result)))
}

/// GET /api/result
///
/// Latest prediction stored for the caller's browser session. Read-only.
pub async fn stored_result(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<StoredResultResponse> {
    let prediction = state.sessions.latest(&headers).await;
    Json(StoredResultResponse {
        prediction,
        message: render(prediction.as_ref()).message(),
    })
}

/// GET /api/fields
pub async fn list_fields() -> Json<&'static [FieldSpec]> {
    Json(&FIELDS)
}

/// Build prediction API routes
pub fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/api/predict", post(predict))
        .route("/api/result", get(stored_result))
        .route("/api/fields", get(list_fields))
}
