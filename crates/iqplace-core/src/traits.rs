//! The placement predictor contract.
//!
//! Implemented by the `iqplace-predictors` crate. The session layer only
//! ever talks to a predictor through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::model::Placement;

/// Maximum CGPA on the 0-10 scale.
pub const CGPA_MAX: f64 = 10.0;

/// Trait for placement prediction backends.
///
/// Implementations must not mutate caller state and must either return a
/// complete [`PredictionResult`] or fail with a [`PredictorError`].
#[async_trait]
pub trait PlacementPredictor: Send + Sync {
    /// Human-readable predictor name (e.g. "logistic").
    fn name(&self) -> &str;

    /// Predict placement for a single student.
    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictorError>;
}

/// Features sent to a predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    /// Cumulative GPA in [0, 10].
    pub cgpa: f64,
    /// IQ estimate from the scorer.
    #[serde(rename = "iq")]
    pub iq_score: f64,
}

impl PredictionInput {
    pub fn new(cgpa: f64, iq_score: f64) -> Result<Self, PredictorError> {
        if !cgpa.is_finite() || !(0.0..=CGPA_MAX).contains(&cgpa) {
            return Err(PredictorError::InvalidInput(format!(
                "cgpa must be between 0 and {CGPA_MAX}, got {cgpa}"
            )));
        }
        if !iq_score.is_finite() || iq_score <= 0.0 {
            return Err(PredictorError::InvalidInput(format!(
                "iq score must be a positive number, got {iq_score}"
            )));
        }
        Ok(Self { cgpa, iq_score })
    }
}

/// A predictor's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub placement: Placement,
    /// Probability of `placement`, in [0, 1].
    pub confidence: f64,
    /// Which input feature drove the decision (e.g. "CGPA").
    pub dominant_factor: String,
}

impl PredictionResult {
    pub fn new(
        placement: Placement,
        confidence: f64,
        dominant_factor: impl Into<String>,
    ) -> Result<Self, PredictorError> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(PredictorError::InvalidResponse(format!(
                "confidence must be within [0, 1], got {confidence}"
            )));
        }
        Ok(Self {
            placement,
            confidence,
            dominant_factor: dominant_factor.into(),
        })
    }
}
