//! HTTP handlers for churn-ui
//!
//! - `ui`: Data Input and Prediction Result pages
//! - `predict`: JSON prediction API
//! - `health`, `buildinfo`: operational endpoints

pub mod buildinfo;
pub mod health;
pub mod predict;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use predict::prediction_routes;
pub use ui::ui_routes;
