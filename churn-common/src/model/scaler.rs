//! Standard scaler artifact

use serde::{Deserialize, Serialize};

use super::{FeatureRow, StageError, Transformer};

fn default_true() -> bool {
    true
}

/// Fitted standardization: `(x - mean) / scale` per feature.
///
/// Deserialized from `telco_churn_scaler.json`. A zero scale is treated as
/// one, so constant training columns pass through centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub format_version: u32,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default = "default_true")]
    pub with_mean: bool,
    #[serde(default = "default_true")]
    pub with_std: bool,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no features".to_string());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err("scaler parameters must be finite".to_string());
        }
        if self.scale.iter().any(|s| *s < 0.0) {
            return Err("scaler scale must be non-negative".to_string());
        }
        Ok(())
    }
}

impl Transformer for StandardScaler {
    fn input_width(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &[f64]) -> Result<FeatureRow, StageError> {
        if features.len() != self.mean.len() {
            return Err(StageError::WidthMismatch {
                component: "StandardScaler",
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        let scaled: FeatureRow = features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let centered = if self.with_mean { x - mean } else { *x };
                if self.with_std && *scale != 0.0 {
                    centered / scale
                } else {
                    centered
                }
            })
            .collect();

        if scaled.iter().any(|v| !v.is_finite()) {
            return Err(StageError::NonFinite {
                component: "StandardScaler",
            });
        }
        Ok(scaled)
    }
}
