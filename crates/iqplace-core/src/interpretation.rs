//! Human-readable interpretation of scores and predictions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Placement;
use crate::traits::PredictionResult;

/// Descriptive band for an IQ estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IqBand {
    Exceptional,
    Superior,
    HighAverage,
    Average,
    LowAverage,
    BelowAverage,
}

impl IqBand {
    pub fn from_score(iq: f64) -> Self {
        if iq >= 130.0 {
            IqBand::Exceptional
        } else if iq >= 120.0 {
            IqBand::Superior
        } else if iq >= 110.0 {
            IqBand::HighAverage
        } else if iq >= 90.0 {
            IqBand::Average
        } else if iq >= 80.0 {
            IqBand::LowAverage
        } else {
            IqBand::BelowAverage
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IqBand::Exceptional => "Exceptional",
            IqBand::Superior => "Superior",
            IqBand::HighAverage => "High Average",
            IqBand::Average => "Average",
            IqBand::LowAverage => "Low Average",
            IqBand::BelowAverage => "Below Average",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IqBand::Exceptional => "Very superior intelligence",
            IqBand::Superior => "Above average intelligence",
            IqBand::HighAverage => "Above average",
            IqBand::Average => "Normal intelligence",
            IqBand::LowAverage => "Below average",
            IqBand::BelowAverage => "Needs improvement",
        }
    }
}

impl fmt::Display for IqBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.description())
    }
}

/// Advice to show alongside a prediction.
pub fn recommendations(result: &PredictionResult) -> Vec<&'static str> {
    match result.placement {
        Placement::NotPlaced => {
            let first = if result.dominant_factor.eq_ignore_ascii_case("cgpa") {
                "Focus on improving your CGPA"
            } else {
                "Work on aptitude skills"
            };
            vec![first, "Build more projects", "Practice coding regularly"]
        }
        Placement::Placed => vec![
            "Keep up the good work!",
            "Prepare for interviews",
            "Build your portfolio",
        ],
    }
}
