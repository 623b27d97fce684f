//! Trained artifacts and their capabilities
//!
//! The pipeline only sees three capabilities:
//! - [`RecordTransformer`]: raw record → feature row (the processor)
//! - [`Transformer`]: feature row → feature row (the scaler)
//! - [`Classifier`]: feature row → label and churn probability (the model)
//!
//! Concrete JSON-backed implementations live in the submodules.

mod artifacts;
pub mod classifier;
pub mod processor;
pub mod scaler;

pub use artifacts::{
    describe_directory, load_artifacts, ArtifactError, ArtifactKind, TrainedArtifacts,
    FORMAT_VERSION, MODEL_FILE, PROCESSOR_FILE, SCALER_FILE,
};
pub use classifier::VotingClassifier;
pub use processor::ColumnProcessor;
pub use scaler::StandardScaler;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::record::CustomerRecord;

/// Encoded numeric features for one row
pub type FeatureRow = Vec<f64>;

/// Failure inside a single transform or predict call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageError {
    #[error("X has {actual} features, but {component} is expecting {expected} features as input")]
    WidthMismatch {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Found unknown category '{value}' in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    #[error("Column '{column}' is not in the customer record")]
    UnknownColumn { column: String },

    #[error("Column '{column}' is categorical and cannot be passed through")]
    NotNumeric { column: String },

    #[error("{component} produced a non-finite value")]
    NonFinite { component: &'static str },

    #[error("Probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("{0}")]
    Other(String),
}

/// Processor capability: raw record to encoded features
pub trait RecordTransformer: Send + Sync {
    /// Number of features produced
    fn output_width(&self) -> usize;

    fn transform_record(&self, record: &CustomerRecord) -> Result<FeatureRow, StageError>;
}

/// Scaler capability: features to features of the same width
pub trait Transformer: Send + Sync {
    fn input_width(&self) -> usize;

    fn output_width(&self) -> usize {
        self.input_width()
    }

    fn transform(&self, features: &[f64]) -> Result<FeatureRow, StageError>;
}

/// Model capability: label and churn probability for one row
pub trait Classifier: Send + Sync {
    fn input_width(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<Label, StageError>;

    /// Probability of the churn class specifically
    fn predict_proba(&self, features: &[f64]) -> Result<Probability, StageError>;
}

/// Predicted class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Label {
    Stay,
    Churn,
}

impl Label {
    pub fn is_churn(&self) -> bool {
        matches!(self, Label::Churn)
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        match label {
            Label::Stay => 0,
            Label::Churn => 1,
        }
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Stay),
            1 => Ok(Label::Churn),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

impl TryFrom<i64> for Label {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| format!("label must be 0 or 1, got {}", value))
            .and_then(Label::try_from)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::Stay => "stay",
            Label::Churn => "churn",
        })
    }
}

/// Churn probability, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    pub fn new(value: f64) -> Result<Self, StageError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StageError::ProbabilityOutOfRange(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Probability of the customer staying
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = StageError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Probability::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

/// Outcome of one successful inference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: Label,
    pub probability: Probability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(-0.01).is_err());
        assert!(Probability::new(1.01).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_label_serializes_as_integer() {
        let result = PredictionResult {
            label: Label::Churn,
            probability: Probability::new(0.75).unwrap(),
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["label"], 1);
        assert_eq!(json["probability"], 0.75);

        let back: PredictionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
        assert!(serde_json::from_str::<Label>("2").is_err());
    }
}
