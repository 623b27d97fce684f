//! Artifact store: loads the three trained artifacts once at startup

use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    Classifier, ColumnProcessor, RecordTransformer, StandardScaler, Transformer, VotingClassifier,
};

/// Artifact format version this build understands
pub const FORMAT_VERSION: u32 = 1;

pub const PROCESSOR_FILE: &str = "telco_churn_processing.json";
pub const SCALER_FILE: &str = "telco_churn_scaler.json";
pub const MODEL_FILE: &str = "telco_churn_voting_model.json";

/// Which of the three artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Processor,
    Scaler,
    Model,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Processor,
        ArtifactKind::Scaler,
        ArtifactKind::Model,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Processor => PROCESSOR_FILE,
            ArtifactKind::Scaler => SCALER_FILE,
            ArtifactKind::Model => MODEL_FILE,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArtifactKind::Processor => "feature processor",
            ArtifactKind::Scaler => "feature scaler",
            ArtifactKind::Model => "classifier",
        })
    }
}

/// Startup failure. Every variant is fatal for the process.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model file not found: {}", path.display())]
    Missing { kind: ArtifactKind, path: PathBuf },

    #[error(
        "Version compatibility issue in {kind}: {reason}. \
         Please retrain your models with the current library version"
    )]
    Incompatible { kind: ArtifactKind, reason: String },

    #[error("Error loading {kind} from {}: {source}", path.display())]
    Load {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The three loaded artifacts. Read-only for the process lifetime.
pub struct TrainedArtifacts {
    processor: Box<dyn RecordTransformer>,
    scaler: Box<dyn Transformer>,
    model: Box<dyn Classifier>,
}

impl fmt::Debug for TrainedArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedArtifacts")
            .field("features", &self.processor.output_width())
            .field("scaled", &self.scaler.output_width())
            .field("model_inputs", &self.model.input_width())
            .finish()
    }
}

impl TrainedArtifacts {
    /// Assemble artifacts, checking that their feature widths line up
    pub fn new(
        processor: Box<dyn RecordTransformer>,
        scaler: Box<dyn Transformer>,
        model: Box<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        if scaler.input_width() != processor.output_width() {
            return Err(ArtifactError::Incompatible {
                kind: ArtifactKind::Scaler,
                reason: format!(
                    "scaler expects {} features but the processor produces {}; \
                     re-export the artifacts together",
                    scaler.input_width(),
                    processor.output_width()
                ),
            });
        }
        if model.input_width() != scaler.output_width() {
            return Err(ArtifactError::Incompatible {
                kind: ArtifactKind::Model,
                reason: format!(
                    "classifier expects {} features but the scaler produces {}; \
                     re-export the artifacts together",
                    model.input_width(),
                    scaler.output_width()
                ),
            });
        }
        Ok(Self {
            processor,
            scaler,
            model,
        })
    }

    pub fn processor(&self) -> &dyn RecordTransformer {
        self.processor.as_ref()
    }

    pub fn scaler(&self) -> &dyn Transformer {
        self.scaler.as_ref()
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}

/// Log what the artifact directory holds. Diagnostics only.
pub fn describe_directory(dir: &Path) {
    let exists = dir.is_dir();
    info!(directory = %dir.display(), exists, "Artifact directory");
    if !exists {
        return;
    }

    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut files: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            files.sort();
            debug!(?files, "Artifact directory contents");
        }
        Err(e) => warn!(error = %e, "Could not list artifact directory"),
    }

    for kind in ArtifactKind::ALL {
        let path = dir.join(kind.file_name());
        debug!(artifact = %kind, path = %path.display(), exists = path.is_file(), "Artifact file");
    }
}

fn read_artifact<T: DeserializeOwned>(dir: &Path, kind: ArtifactKind) -> Result<T, ArtifactError> {
    let path = dir.join(kind.file_name());
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArtifactError::Missing { kind, path });
        }
        Err(e) => {
            return Err(ArtifactError::Load {
                kind,
                path,
                source: Box::new(e),
            })
        }
    };

    // Well-formed JSON of the wrong shape means the artifact was written by
    // a different exporter version; anything else is a plain load failure.
    serde_json::from_str(&text).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => ArtifactError::Incompatible {
            kind,
            reason: e.to_string(),
        },
        _ => ArtifactError::Load {
            kind,
            path: path.clone(),
            source: Box::new(e),
        },
    })
}

fn check_version(kind: ArtifactKind, version: u32) -> Result<(), ArtifactError> {
    if version == FORMAT_VERSION {
        Ok(())
    } else {
        Err(ArtifactError::Incompatible {
            kind,
            reason: format!(
                "format version {} is not supported (expected {})",
                version, FORMAT_VERSION
            ),
        })
    }
}

fn check<F>(kind: ArtifactKind, validate: F) -> Result<(), ArtifactError>
where
    F: FnOnce() -> Result<(), String>,
{
    validate().map_err(|reason| ArtifactError::Incompatible { kind, reason })
}

/// Load processor, scaler and classifier from `dir`.
///
/// Loads in that order and stops at the first failure. No retry.
pub fn load_artifacts(dir: &Path) -> Result<TrainedArtifacts, ArtifactError> {
    describe_directory(dir);

    let processor: ColumnProcessor = read_artifact(dir, ArtifactKind::Processor)?;
    check_version(ArtifactKind::Processor, processor.format_version)?;
    check(ArtifactKind::Processor, || processor.validate())?;

    let scaler: StandardScaler = read_artifact(dir, ArtifactKind::Scaler)?;
    check_version(ArtifactKind::Scaler, scaler.format_version)?;
    check(ArtifactKind::Scaler, || scaler.validate())?;

    let model: VotingClassifier = read_artifact(dir, ArtifactKind::Model)?;
    check_version(ArtifactKind::Model, model.format_version)?;
    check(ArtifactKind::Model, || model.validate())?;

    let artifacts = TrainedArtifacts::new(Box::new(processor), Box::new(scaler), Box::new(model))?;
    info!(?artifacts, "All artifacts loaded");
    Ok(artifacts)
}
