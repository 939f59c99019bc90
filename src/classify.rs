//! Severity banding and display figures for a prediction

use serde::{Deserialize, Serialize};

use crate::models::PredictionResult;
use crate::numeric;

/// Risk band derived from a continuous severity score
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityBand {
    Low,
    Medium,
    High,
}

impl SeverityBand {
    /// Band for a severity score in [0, 1].
    ///
    /// Each band includes its lower bound: 0.75 is High, 0.50 is Medium.
    #[must_use]
    pub fn from_severity(severity: f64) -> Self {
        let percent = severity * 100.0;
        if percent >= 75.0 {
            SeverityBand::High
        } else if percent >= 50.0 {
            SeverityBand::Medium
        } else {
            SeverityBand::Low
        }
    }

    /// Human-facing label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Low => "Low Risk",
            SeverityBand::Medium => "Medium Risk",
            SeverityBand::High => "High Risk",
        }
    }

    /// Style classes for the severity card
    #[must_use]
    pub fn style(self) -> &'static str {
        match self {
            SeverityBand::Low => "bg-green-100 text-green-800 border-green-200",
            SeverityBand::Medium => "bg-yellow-100 text-yellow-800 border-yellow-200",
            SeverityBand::High => "bg-red-100 text-red-800 border-red-200",
        }
    }
}

/// Band for a normalized prediction
#[must_use]
pub fn classify(result: &PredictionResult) -> SeverityBand {
    SeverityBand::from_severity(result.severity)
}

/// A prediction together with everything needed to display it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RiskAssessment {
    pub result: PredictionResult,
    pub band: SeverityBand,
    /// Severity as a percentage with one decimal, e.g. `62.0%`
    pub severity_percent: String,
    /// Whole-dollar infrastructure loss, e.g. `$2,500,000`
    pub infrastructure_loss: String,
    /// Death count with thousands separators
    pub predicted_deaths: String,
}

impl From<PredictionResult> for RiskAssessment {
    fn from(result: PredictionResult) -> Self {
        let band = classify(&result);
        Self {
            band,
            severity_percent: format!("{:.1}%", result.severity * 100.0),
            infrastructure_loss: numeric::format_currency(result.predicted_infrastructure_loss),
            predicted_deaths: numeric::format_count(result.predicted_deaths),
            result,
        }
    }
}
