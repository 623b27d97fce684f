//! # Churn Common Library
//!
//! Shared code for the telco churn prediction service:
//! - Customer record and the fixed input field catalog
//! - Trained artifact formats and loading
//! - The processor → scaler → classifier inference pipeline
//! - Configuration loading

pub mod config;
pub mod error;
pub mod fields;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod model;
pub mod pipeline;
pub mod record;

pub use error::{Error, Result};
pub use model::{Label, PredictionResult, Probability, TrainedArtifacts};
pub use pipeline::infer;
pub use record::CustomerRecord;
