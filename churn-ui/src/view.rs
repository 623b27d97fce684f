//! Prediction Result view
//!
//! A pure function of the session's stored prediction. No prediction means
//! the neutral prompt, never a default verdict.

use churn_common::PredictionResult;
use serde::Serialize;

/// Banner styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerStyle {
    Info,
    Success,
    Warning,
    Error,
}

impl BannerStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            BannerStyle::Info => "banner banner-info",
            BannerStyle::Success => "banner banner-success",
            BannerStyle::Warning => "banner banner-warning",
            BannerStyle::Error => "banner banner-error",
        }
    }
}

/// What the result tab shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultView {
    /// No prediction yet in this session
    Pending,
    /// Churn likelihood in percent
    Churn { percent: f64 },
    /// Retention likelihood in percent
    Stay { percent: f64 },
}

pub const PENDING_MESSAGE: &str = "Please enter data in the 'Data Input' tab and click Predict.";

impl ResultView {
    pub fn message(&self) -> String {
        match self {
            ResultView::Pending => PENDING_MESSAGE.to_string(),
            ResultView::Churn { percent } => {
                format!("⚠ Customer is likely to Churn ({:.2}%)", percent)
            }
            ResultView::Stay { percent } => {
                format!("✅ Customer is likely to Stay ({:.2}%)", percent)
            }
        }
    }

    pub fn style(&self) -> BannerStyle {
        match self {
            ResultView::Pending => BannerStyle::Info,
            ResultView::Churn { .. } => BannerStyle::Warning,
            ResultView::Stay { .. } => BannerStyle::Success,
        }
    }

    /// Short verdict for API consumers
    pub fn verdict(&self) -> Option<&'static str> {
        match self {
            ResultView::Pending => None,
            ResultView::Churn { .. } => Some("churn"),
            ResultView::Stay { .. } => Some("stay"),
        }
    }
}

/// Decide what to show for the stored prediction
pub fn render(prediction: Option<&PredictionResult>) -> ResultView {
    match prediction {
        None => ResultView::Pending,
        Some(result) if result.label.is_churn() => ResultView::Churn {
            percent: result.probability.value() * 100.0,
        },
        Some(result) => ResultView::Stay {
            percent: result.probability.complement() * 100.0,
        },
    }
}
