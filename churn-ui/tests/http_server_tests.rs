//! HTTP Server & Page Integration Tests
//!
//! Drives the Data Input and Prediction Result pages through the router the
//! way a browser would: submit the form, carry the session cookie, read the
//! result tab.

mod helpers;

use axum::http::{header, StatusCode};
use churn_common::fields::FIELDS;
use churn_ui::api::ui::input::SUCCESS_MESSAGE;
use churn_ui::view::PENDING_MESSAGE;
use helpers::*;
use tower::ServiceExt;

const LOYAL_CUSTOMER: &[(&str, &str)] = &[
    ("Contract", "Two year"),
    ("tenure", "60"),
    ("OnlineSecurity", "Yes"),
    ("TechSupport", "Yes"),
    ("PaymentMethod", "Credit card (automatic)"),
    ("MonthlyCharges", "55"),
    ("TotalCharges", "3300"),
];

#[tokio::test]
async fn test_root_serves_input_form() {
    let app = test_app();

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert!(content_type.to_str().unwrap().contains("text/html"));
    assert!(session_cookie(&response).is_none(), "viewing the form starts no session");

    let html = body_text(response).await;
    for spec in FIELDS.iter() {
        assert!(html.contains(&format!(r#"name="{}""#, spec.name)), "missing {}", spec.name);
    }
    assert!(html.contains("Predict Churn"));
    assert!(html.contains("Telco Customer Churn Prediction"));
}

#[tokio::test]
async fn test_result_before_any_prediction_is_pending() {
    let app = test_app();

    let response = app.oneshot(get("/result", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(&PENDING_MESSAGE.replace('\'', "&#39;")));
    assert!(!html.contains("likely to"));
}

#[tokio::test]
async fn test_default_submission_shows_churn() {
    let app = test_app();

    // Submit the untouched form
    let defaults: Vec<(String, String)> = FIELDS
        .iter()
        .map(|f| (f.name.to_string(), f.default_value()))
        .collect();
    let pairs: Vec<(&str, &str)> = defaults.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();

    let response = app.clone().oneshot(post_form("/predict", &pairs, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).expect("session cookie");
    let html = body_text(response).await;
    assert!(html.contains(&SUCCESS_MESSAGE.replace('\'', "&#39;")));

    let response = app.oneshot(get("/result", Some(&cookie))).await.unwrap();
    let html = body_text(response).await;
    assert!(html.contains("⚠ Customer is likely to Churn (58.68%)"), "{}", html);
    assert!(html.contains("banner-warning"));
}

#[tokio::test]
async fn test_new_prediction_replaces_previous() {
    let app = test_app();

    let response = app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/predict", LOYAL_CUSTOMER, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).is_none(), "known session keeps its cookie");

    let html = body_text(app.oneshot(get("/result", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("✅ Customer is likely to Stay"));
    assert!(html.contains("banner-success"));
    assert!(!html.contains("likely to Churn"));
}

#[tokio::test]
async fn test_failed_prediction_keeps_previous_result() {
    let app = flaky_app();

    let response = app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/predict", &[("tenure", "0")], Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(html.contains("Prediction failed during feature processing"));
    assert!(html.contains("banner-error"));
    // the form is still offered after a failure
    assert!(html.contains("Predict Churn"));

    let html = body_text(app.oneshot(get("/result", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("likely to Churn (58.68%)"));
}

#[tokio::test]
async fn test_out_of_range_tenure_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(post_form("/predict", &[("tenure", "73")], None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(session_cookie(&response).is_none(), "rejected input stores nothing");
    let html = body_text(response).await;
    assert!(html.contains("Invalid input: tenure"));
    assert!(html.contains(r#"value="73""#), "submitted value should be kept");
}

#[tokio::test]
async fn test_rejected_input_keeps_previous_result() {
    let app = test_app();

    let response = app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/predict", &[("tenure", "73")], Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(app.oneshot(get("/result", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("likely to Churn (58.68%)"));
}

#[tokio::test]
async fn test_reads_start_no_sessions() {
    let state = test_state();
    let app = churn_ui::build_router(state.clone());
    let unknown = format!("{}={}", churn_ui::session::SESSION_COOKIE, uuid::Uuid::new_v4());

    for _ in 0..20 {
        for uri in ["/", "/result", "/api/result"] {
            let response = app.clone().oneshot(get(uri, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(session_cookie(&response).is_none(), "{} set a cookie", uri);

            let response = app.clone().oneshot(get(uri, Some(&unknown))).await.unwrap();
            assert!(session_cookie(&response).is_none(), "{} set a cookie", uri);
        }
    }
    assert_eq!(state.sessions.active_count().await, 0);

    app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    assert_eq!(state.sessions.active_count().await, 1);

    let health = body_json(app.oneshot(get("/health", None)).await.unwrap()).await;
    assert_eq!(health["active_sessions"], 1);
}

#[tokio::test]
async fn test_sessions_do_not_share_results() {
    let app = test_app();

    let response = app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    let first = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/predict", LOYAL_CUSTOMER, None))
        .await
        .unwrap();
    let second = session_cookie(&response).unwrap();
    assert_ne!(first, second);

    let html = body_text(app.clone().oneshot(get("/result", Some(&second))).await.unwrap()).await;
    assert!(html.contains("likely to Stay"));

    let html = body_text(app.oneshot(get("/result", Some(&first))).await.unwrap()).await;
    assert!(html.contains("likely to Churn"));
}

#[tokio::test]
async fn test_halted_mode_hides_form() {
    let app = halted_app();

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Model file not found"));
    assert!(!html.contains("<form"));

    let response = app.clone().oneshot(post_form("/predict", &[], None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(!body_text(response).await.contains("<form"));

    let html = body_text(app.oneshot(get("/result", None)).await.unwrap()).await;
    assert!(html.contains("Model file not found"));
    assert!(!html.contains(&PENDING_MESSAGE.replace('\'', "&#39;")));
}

#[tokio::test]
async fn test_health_reports_artifact_status() {
    let response = test_app().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "churn-ui");
    assert!(json.get("last_error").is_none());

    let json = body_json(halted_app().oneshot(get("/health", None)).await.unwrap()).await;
    assert_eq!(json["status"], "error");
    assert!(json["last_error"].as_str().unwrap().contains("Model file not found"));
}

#[tokio::test]
async fn test_buildinfo() {
    let response = test_app().oneshot(get("/api/buildinfo", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["git_hash"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_app().oneshot(get("/import-progress", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
