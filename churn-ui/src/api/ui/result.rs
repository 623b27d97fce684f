//! Prediction Result tab

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};

use super::layout::{fatal_page, page, Banner, Tab};
use crate::view::render;
use crate::AppState;

/// GET /result
pub async fn result_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let html = match state.artifacts() {
        Ok(_) => {
            let prediction = state.sessions.latest(&headers).await;
            let view = render(prediction.as_ref());
            page(
                Tab::PredictionResult,
                &[Banner::new(view.style(), view.message())],
                "<h2>Prediction Result</h2>",
            )
        }
        Err(message) => fatal_page(Tab::PredictionResult, message),
    };

    Html(html).into_response()
}
