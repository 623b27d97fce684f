//! Test Helper Utilities
//!
//! Shared app builders and request helpers for churn-ui integration tests

#![allow(dead_code)]

pub mod log_capture;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use churn_common::fixtures;
use churn_common::model::{
    ArtifactError, ArtifactKind, RecordTransformer, StageError, TrainedArtifacts,
};
use churn_common::record::CustomerRecord;
use churn_ui::session::SESSION_COOKIE;
use churn_ui::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const TTL: Duration = Duration::from_secs(3600);

/// State backed by the fixture artifacts
pub fn test_state() -> AppState {
    AppState::new(fixtures::trained_artifacts(), TTL)
}

/// App backed by the fixture artifacts
pub fn test_app() -> Router {
    build_router(test_state())
}

/// App whose startup artifact load failed
pub fn halted_app() -> Router {
    let error = ArtifactError::Missing {
        kind: ArtifactKind::Model,
        path: PathBuf::from("/nonexistent/telco_churn_voting_model.json"),
    };
    build_router(AppState::new(Err(error), TTL))
}

/// Processor that fails for tenure 0 and otherwise behaves like the fixture
pub struct FlakyProcessor;

impl RecordTransformer for FlakyProcessor {
    fn output_width(&self) -> usize {
        fixtures::FEATURE_WIDTH
    }

    fn transform_record(&self, record: &CustomerRecord) -> Result<Vec<f64>, StageError> {
        if record.tenure == 0 {
            return Err(StageError::Other("tenure bucket table is empty".to_string()));
        }
        fixtures::processor().transform_record(record)
    }
}

/// App whose processor raises on tenure 0
pub fn flaky_app() -> Router {
    let artifacts = TrainedArtifacts::new(
        Box::new(FlakyProcessor),
        Box::new(fixtures::scaler()),
        Box::new(fixtures::voting_model()),
    );
    build_router(AppState::new(artifacts, TTL))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// POST an urlencoded form
pub fn post_form(uri: &str, fields: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&");
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `name=value` pair from the response's session Set-Cookie, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
