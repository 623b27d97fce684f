//! Small deterministic artifact set
//!
//! Matches the demo artifacts shipped in `churn-ui/Model`. Hand-made for
//! tests and local runs, not trained on real data. Feature layout:
//!
//! | index | feature                                   |
//! |-------|-------------------------------------------|
//! | 0-2   | Contract one-hot                          |
//! | 3-5   | InternetService one-hot                   |
//! | 6-8   | PaymentMethod one-hot (first dropped)     |
//! | 9-11  | OnlineSecurity one-hot                    |
//! | 12-14 | TechSupport one-hot                       |
//! | 15    | PaperlessBilling ordinal                  |
//! | 16-19 | SeniorCitizen, tenure, Monthly, Total     |

use std::fs;
use std::path::Path;

use crate::model::classifier::{Estimator, TreeNode, Voting};
use crate::model::processor::{ColumnStep, HandleUnknown};
use crate::model::{
    ArtifactError, ArtifactKind, ColumnProcessor, StandardScaler, TrainedArtifacts,
    VotingClassifier, FORMAT_VERSION,
};
use crate::record::{Contract, InternetAddon, InternetService, PaymentMethod, YesNo};
use crate::Result;

/// Width of the fixture feature space
pub const FEATURE_WIDTH: usize = 20;

fn names<T: Copy>(all: &[T], as_str: fn(&T) -> &'static str) -> Vec<String> {
    all.iter().map(|v| as_str(v).to_string()).collect()
}

fn one_hot(column: &str, categories: Vec<String>, drop_first: bool) -> ColumnStep {
    ColumnStep::OneHot {
        column: column.to_string(),
        categories,
        drop_first,
        handle_unknown: HandleUnknown::Error,
    }
}

pub fn processor() -> ColumnProcessor {
    ColumnProcessor {
        format_version: FORMAT_VERSION,
        steps: vec![
            one_hot("Contract", names(Contract::ALL, Contract::as_str), false),
            one_hot("InternetService", names(InternetService::ALL, InternetService::as_str), false),
            one_hot("PaymentMethod", names(PaymentMethod::ALL, PaymentMethod::as_str), true),
            one_hot("OnlineSecurity", names(InternetAddon::ALL, InternetAddon::as_str), false),
            one_hot("TechSupport", names(InternetAddon::ALL, InternetAddon::as_str), false),
            ColumnStep::Ordinal {
                column: "PaperlessBilling".to_string(),
                categories: vec![YesNo::No.as_str().to_string(), YesNo::Yes.as_str().to_string()],
            },
            ColumnStep::Passthrough {
                columns: ["SeniorCitizen", "tenure", "MonthlyCharges", "TotalCharges"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
        ],
    }
}

pub fn scaler() -> StandardScaler {
    StandardScaler {
        format_version: FORMAT_VERSION,
        mean: vec![
            0.55, 0.21, 0.24, 0.34, 0.44, 0.22, 0.23, 0.22, 0.22, 0.5, 0.29, 0.22, 0.49, 0.29,
            0.22, 0.59, 0.16, 32.37, 64.76, 2283.3,
        ],
        scale: vec![
            0.497, 0.407, 0.427, 0.474, 0.496, 0.414, 0.421, 0.414, 0.414, 0.5, 0.454, 0.414,
            0.5, 0.454, 0.414, 0.492, 0.367, 24.56, 30.09, 2266.77,
        ],
        with_mean: true,
        with_std: true,
    }
}

pub fn voting_model() -> VotingClassifier {
    let logistic = Estimator::LogisticRegression {
        coef: vec![
            0.45, -0.15, -0.35, -0.15, 0.30, -0.20, -0.12, -0.08, -0.10, 0.20, -0.15, -0.08, 0.18,
            -0.14, -0.08, 0.17, 0.08, -0.95, 0.30, 0.25,
        ],
        intercept: -1.55,
    };
    // month-to-month first, then short tenure
    let tree = Estimator::DecisionTree {
        n_features: FEATURE_WIDTH,
        nodes: vec![
            TreeNode::Split { feature: 0, threshold: 0.0, left: 1, right: 2 },
            TreeNode::Leaf { value: vec![0.93, 0.07] },
            TreeNode::Split { feature: 17, threshold: -0.6, left: 3, right: 4 },
            TreeNode::Leaf { value: vec![0.45, 0.55] },
            TreeNode::Leaf { value: vec![0.72, 0.28] },
        ],
    };

    VotingClassifier {
        format_version: FORMAT_VERSION,
        classes: vec![0, 1],
        voting: Voting::Soft,
        weights: Some(vec![2.0, 1.0]),
        estimators: vec![logistic, tree],
    }
}

/// The fixture set, already assembled
pub fn trained_artifacts() -> std::result::Result<TrainedArtifacts, ArtifactError> {
    TrainedArtifacts::new(
        Box::new(processor()),
        Box::new(scaler()),
        Box::new(voting_model()),
    )
}

/// Write the three fixture artifact files into `dir`
pub fn write_artifact_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let documents = [
        (ArtifactKind::Processor, serde_json::to_string_pretty(&processor())),
        (ArtifactKind::Scaler, serde_json::to_string_pretty(&scaler())),
        (ArtifactKind::Model, serde_json::to_string_pretty(&voting_model())),
    ];
    for (kind, json) in documents {
        let json = json.map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(dir.join(kind.file_name()), json)?;
    }
    Ok(())
}
