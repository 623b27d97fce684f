//! Artifact store tests: loading from a directory and the three startup
//! failure classes (missing, incompatible, load error)

use churn_common::fixtures;
use churn_common::model::{
    load_artifacts, ArtifactError, ArtifactKind, Classifier, RecordTransformer, Transformer,
    MODEL_FILE, PROCESSOR_FILE, SCALER_FILE,
};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Test helper: directory holding the full fixture set
fn artifact_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fixtures::write_artifact_dir(dir.path()).unwrap();
    dir
}

/// Test helper: read, edit and rewrite one artifact document
fn edit_artifact(dir: &Path, file: &str, edit: impl FnOnce(&mut Value)) {
    let path = dir.join(file);
    let mut doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    edit(&mut doc);
    fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();
}

#[test]
fn test_loads_complete_directory() {
    let dir = artifact_dir();
    let artifacts = load_artifacts(dir.path()).unwrap();

    assert_eq!(artifacts.processor().output_width(), fixtures::FEATURE_WIDTH);
    assert_eq!(artifacts.scaler().input_width(), fixtures::FEATURE_WIDTH);
    assert_eq!(artifacts.model().input_width(), fixtures::FEATURE_WIDTH);
}

#[test]
fn test_missing_file_reports_missing() {
    for file in [PROCESSOR_FILE, SCALER_FILE, MODEL_FILE] {
        let dir = artifact_dir();
        fs::remove_file(dir.path().join(file)).unwrap();

        match load_artifacts(dir.path()) {
            Err(ArtifactError::Missing { path, .. }) => assert!(path.ends_with(file)),
            other => panic!("expected Missing for {}, got {:?}", file, other),
        }
    }
}

#[test]
fn test_missing_directory_reports_missing_processor() {
    let dir = TempDir::new().unwrap();
    let result = load_artifacts(&dir.path().join("does-not-exist"));
    assert!(matches!(
        result,
        Err(ArtifactError::Missing {
            kind: ArtifactKind::Processor,
            ..
        })
    ));
}

#[test]
fn test_corrupt_json_is_load_error() {
    let dir = artifact_dir();
    fs::write(dir.path().join(SCALER_FILE), "{ \"mean\": [1.0, ").unwrap();

    let err = load_artifacts(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::Load {
            kind: ArtifactKind::Scaler,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Error loading feature scaler"));
}

#[test]
fn test_wrong_shape_is_incompatible() {
    let dir = artifact_dir();
    edit_artifact(dir.path(), MODEL_FILE, |doc| {
        doc["estimators"] = json!([{"kind": "gradient_boosting", "stages": 100}]);
    });

    let err = load_artifacts(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        ArtifactError::Incompatible {
            kind: ArtifactKind::Model,
            ..
        }
    ));
    assert!(err.to_string().contains("retrain your models"));
}

#[test]
fn test_future_format_version_is_incompatible() {
    let dir = artifact_dir();
    edit_artifact(dir.path(), PROCESSOR_FILE, |doc| {
        doc["format_version"] = json!(2);
    });

    let err = load_artifacts(dir.path()).unwrap_err();
    match err {
        ArtifactError::Incompatible { kind, reason } => {
            assert_eq!(kind, ArtifactKind::Processor);
            assert!(reason.contains("format version 2"));
        }
        other => panic!("expected Incompatible, got {:?}", other),
    }
}

#[test]
fn test_width_disagreement_is_incompatible() {
    let dir = artifact_dir();
    edit_artifact(dir.path(), SCALER_FILE, |doc| {
        doc["mean"].as_array_mut().unwrap().pop();
        doc["scale"].as_array_mut().unwrap().pop();
    });

    let err = load_artifacts(dir.path()).unwrap_err();
    match err {
        ArtifactError::Incompatible { kind, reason } => {
            assert_eq!(kind, ArtifactKind::Scaler);
            assert!(reason.contains("19"), "reason: {}", reason);
        }
        other => panic!("expected Incompatible, got {:?}", other),
    }
}

#[test]
fn test_hard_voting_is_incompatible() {
    let dir = artifact_dir();
    edit_artifact(dir.path(), MODEL_FILE, |doc| {
        doc["voting"] = json!("hard");
    });

    assert!(matches!(
        load_artifacts(dir.path()),
        Err(ArtifactError::Incompatible {
            kind: ArtifactKind::Model,
            ..
        })
    ));
}

#[test]
fn test_unknown_processor_column_is_incompatible() {
    let dir = artifact_dir();
    edit_artifact(dir.path(), PROCESSOR_FILE, |doc| {
        doc["steps"][0]["column"] = json!("customerID");
    });

    assert!(matches!(
        load_artifacts(dir.path()),
        Err(ArtifactError::Incompatible {
            kind: ArtifactKind::Processor,
            ..
        })
    ));
}

#[test]
fn test_shipped_demo_artifacts_load() {
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("../churn-ui/Model");
    let artifacts = load_artifacts(&demo).unwrap();
    assert_eq!(artifacts.model().input_width(), fixtures::FEATURE_WIDTH);
}
