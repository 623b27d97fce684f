//! Inference pipeline: processor → scaler → classifier
//!
//! Strictly sequential with no branching on content. Either every stage
//! succeeds and a [`PredictionResult`] is returned, or the error names the
//! stage that failed and nothing is produced.

use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::model::{PredictionResult, StageError, TrainedArtifacts};
use crate::record::CustomerRecord;

/// Pipeline stage, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Processor,
    Scaler,
    Classifier,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Processor => "feature processing",
            Stage::Scaler => "feature scaling",
            Stage::Classifier => "classification",
        })
    }
}

/// Inference failure, surfaced to users as "prediction failed"
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Prediction failed during {stage}: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    fn at(stage: Stage) -> impl FnOnce(StageError) -> PipelineError {
        move |source| PipelineError { stage, source }
    }
}

/// Run one record through the three artifacts
pub fn infer(
    record: &CustomerRecord,
    artifacts: &TrainedArtifacts,
) -> Result<PredictionResult, PipelineError> {
    let features = artifacts
        .processor()
        .transform_record(record)
        .map_err(PipelineError::at(Stage::Processor))?;
    debug!(width = features.len(), "Record processed");

    let scaled = artifacts
        .scaler()
        .transform(&features)
        .map_err(PipelineError::at(Stage::Scaler))?;
    debug!(width = scaled.len(), "Features scaled");

    let model = artifacts.model();
    let label = model
        .predict(&scaled)
        .map_err(PipelineError::at(Stage::Classifier))?;
    let probability = model
        .predict_proba(&scaled)
        .map_err(PipelineError::at(Stage::Classifier))?;

    info!(%label, probability = probability.value(), "Prediction complete");
    Ok(PredictionResult { label, probability })
}
