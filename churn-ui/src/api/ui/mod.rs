//! HTML pages: Data Input and Prediction Result tabs

pub mod input;
pub mod layout;
pub mod result;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub use input::{input_page, submit_prediction};
pub use result::result_page;

/// Build page routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(input_page))
        .route("/predict", post(submit_prediction))
        .route("/result", get(result_page))
}
