//! Soft-voting ensemble classifier artifact
//!
//! Members produce per-class probabilities in `classes` order; the ensemble
//! averages them with optional weights. The churn probability is read at the
//! position of label `1` in `classes`, whatever that position is.

use serde::{Deserialize, Serialize};

use super::{Classifier, Label, Probability, StageError};

/// Voting rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voting {
    Soft,
    /// Majority of member labels; exposes no probabilities
    Hard,
}

/// Decision tree node. Children always have a higher index than their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go left when `features[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class probabilities in `classes` order
    Leaf { value: Vec<f64> },
}

/// Ensemble member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    /// Binary logistic regression; the sigmoid is P(`classes[1]`)
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
    DecisionTree { n_features: usize, nodes: Vec<TreeNode> },
}

impl Estimator {
    fn input_width(&self) -> usize {
        match self {
            Estimator::LogisticRegression { coef, .. } => coef.len(),
            Estimator::DecisionTree { n_features, .. } => *n_features,
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Estimator::LogisticRegression { coef, intercept } => {
                if coef.is_empty() {
                    return Err("logistic regression has no coefficients".to_string());
                }
                if coef.iter().chain(std::iter::once(intercept)).any(|c| !c.is_finite()) {
                    return Err("logistic regression coefficients must be finite".to_string());
                }
            }
            Estimator::DecisionTree { n_features, nodes } => {
                if nodes.is_empty() {
                    return Err("decision tree has no nodes".to_string());
                }
                for (index, node) in nodes.iter().enumerate() {
                    match node {
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            if feature >= n_features {
                                return Err(format!(
                                    "tree node {} splits on feature {} of {}",
                                    index, feature, n_features
                                ));
                            }
                            if !threshold.is_finite() {
                                return Err(format!(
                                    "tree node {} has a non-finite threshold",
                                    index
                                ));
                            }
                            for child in [left, right] {
                                if *child <= index || *child >= nodes.len() {
                                    return Err(format!(
                                        "tree node {} has invalid child {}",
                                        index, child
                                    ));
                                }
                            }
                        }
                        TreeNode::Leaf { value } => {
                            let sum: f64 = value.iter().sum();
                            if value.len() != 2
                                || value.iter().any(|v| !(0.0..=1.0).contains(v))
                                || (sum - 1.0).abs() > 1e-6
                            {
                                return Err(format!(
                                    "tree leaf {} must hold two probabilities summing to 1",
                                    index
                                ));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Probabilities in `classes` order
    fn proba(&self, features: &[f64]) -> [f64; 2] {
        match self {
            Estimator::LogisticRegression { coef, intercept } => {
                let z: f64 = coef.iter().zip(features).map(|(c, x)| c * x).sum::<f64>() + intercept;
                let p = 1.0 / (1.0 + (-z).exp());
                [1.0 - p, p]
            }
            Estimator::DecisionTree { nodes, .. } => {
                let mut index = 0;
                loop {
                    match &nodes[index] {
                        TreeNode::Split {
                            feature,
                            threshold,
                            left,
                            right,
                        } => {
                            index = if features[*feature] <= *threshold {
                                *left
                            } else {
                                *right
                            };
                        }
                        TreeNode::Leaf { value } => return [value[0], value[1]],
                    }
                }
            }
        }
    }
}

/// Fitted voting ensemble, deserialized from `telco_churn_voting_model.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingClassifier {
    pub format_version: u32,
    /// Class labels in probability-column order
    pub classes: Vec<i64>,
    pub voting: Voting,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    pub estimators: Vec<Estimator>,
}

impl VotingClassifier {
    pub fn validate(&self) -> Result<(), String> {
        let mut sorted = self.classes.clone();
        sorted.sort_unstable();
        if sorted != [0, 1] {
            return Err(format!(
                "classifier classes must be exactly [0, 1] in some order, got {:?}",
                self.classes
            ));
        }
        if self.voting == Voting::Hard {
            return Err("hard voting exposes no predict_proba".to_string());
        }
        if self.estimators.is_empty() {
            return Err("voting classifier has no estimators".to_string());
        }
        if let Some(weights) = &self.weights {
            if weights.len() != self.estimators.len() {
                return Err(format!(
                    "{} weights for {} estimators",
                    weights.len(),
                    self.estimators.len()
                ));
            }
            let negative = weights.iter().any(|w| !w.is_finite() || *w < 0.0);
            if negative || weights.iter().sum::<f64>() <= 0.0 {
                return Err("weights must be non-negative with a positive sum".to_string());
            }
        }
        let width = self.estimators[0].input_width();
        for (i, estimator) in self.estimators.iter().enumerate() {
            estimator.validate().map_err(|e| format!("estimator {}: {}", i, e))?;
            if estimator.input_width() != width {
                return Err(format!(
                    "estimator {} expects {} features, estimator 0 expects {}",
                    i,
                    estimator.input_width(),
                    width
                ));
            }
        }
        Ok(())
    }

    /// Position of the churn label in `classes`
    fn churn_index(&self) -> usize {
        self.classes.iter().position(|c| *c == 1).unwrap_or(1)
    }

    fn averaged_proba(&self, features: &[f64]) -> Result<[f64; 2], StageError> {
        let expected = self.input_width();
        if features.len() != expected {
            return Err(StageError::WidthMismatch {
                component: "VotingClassifier",
                expected,
                actual: features.len(),
            });
        }

        let mut total = [0.0; 2];
        let mut weight_sum = 0.0;
        for (i, estimator) in self.estimators.iter().enumerate() {
            let weight = self.weights.as_ref().map_or(1.0, |w| w[i]);
            let p = estimator.proba(features);
            total[0] += weight * p[0];
            total[1] += weight * p[1];
            weight_sum += weight;
        }
        let averaged = [total[0] / weight_sum, total[1] / weight_sum];
        if averaged.iter().any(|p| !p.is_finite()) {
            return Err(StageError::NonFinite {
                component: "VotingClassifier",
            });
        }
        Ok(averaged)
    }
}

impl Classifier for VotingClassifier {
    fn input_width(&self) -> usize {
        self.estimators.first().map_or(0, Estimator::input_width)
    }

    fn predict(&self, features: &[f64]) -> Result<Label, StageError> {
        let proba = self.averaged_proba(features)?;
        // argmax, first column wins ties
        let winner = if proba[1] > proba[0] { 1 } else { 0 };
        Label::try_from(self.classes[winner]).map_err(StageError::Other)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<Probability, StageError> {
        let proba = self.averaged_proba(features)?;
        Probability::new(proba[self.churn_index()])
    }
}
