//! Local logistic-regression placement model.
//!
//! Both features are standardized with the training mean and standard
//! deviation before the linear term is computed:
//!
//! `p(placed) = sigmoid(intercept + w_cgpa * z_cgpa + w_iq * z_iq)`
//!
//! The dominant factor is whichever standardized contribution has the larger
//! magnitude.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use iqplace_core::error::PredictorError;
use iqplace_core::model::Placement;
use iqplace_core::traits::{PlacementPredictor, PredictionInput, PredictionResult};

/// Label reported when CGPA drives the decision.
pub const FACTOR_CGPA: &str = "CGPA";
/// Label reported when the IQ estimate drives the decision.
pub const FACTOR_IQ: &str = "IQ";

/// Parameters of the logistic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticModel {
    pub intercept: f64,
    pub cgpa_weight: f64,
    pub iq_weight: f64,
    pub cgpa_mean: f64,
    pub cgpa_std: f64,
    pub iq_mean: f64,
    pub iq_std: f64,
    /// Probability at or above which a student is predicted as placed.
    pub threshold: f64,
}

impl Default for LogisticModel {
    fn default() -> Self {
        Self {
            intercept: 0.2,
            cgpa_weight: 1.6,
            iq_weight: 0.9,
            cgpa_mean: 7.0,
            cgpa_std: 1.2,
            iq_mean: 105.0,
            iq_std: 15.0,
            threshold: 0.5,
        }
    }
}

impl LogisticModel {
    fn validate(&self) -> Result<(), String> {
        let params = [
            self.intercept,
            self.cgpa_weight,
            self.iq_weight,
            self.cgpa_mean,
            self.cgpa_std,
            self.iq_mean,
            self.iq_std,
            self.threshold,
        ];
        if params.iter().any(|p| !p.is_finite()) {
            return Err("model parameters must be finite".into());
        }
        if self.cgpa_std <= 0.0 || self.iq_std <= 0.0 {
            return Err("standard deviations must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold must be within [0, 1], got {}", self.threshold));
        }
        Ok(())
    }
}

/// Placement predictor backed by an in-process [`LogisticModel`].
#[derive(Debug, Clone)]
pub struct LogisticPredictor {
    model: LogisticModel,
}

impl LogisticPredictor {
    pub fn new(model: LogisticModel) -> Result<Self, PredictorError> {
        model
            .validate()
            .map_err(|e| PredictorError::Unavailable(format!("invalid logistic model: {e}")))?;
        Ok(Self { model })
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    /// Probability of placement for the given input.
    pub fn probability(&self, input: &PredictionInput) -> f64 {
        let (cgpa, iq) = self.contributions(input);
        sigmoid(self.model.intercept + cgpa + iq)
    }

    fn contributions(&self, input: &PredictionInput) -> (f64, f64) {
        let m = &self.model;
        let cgpa = m.cgpa_weight * (input.cgpa - m.cgpa_mean) / m.cgpa_std;
        let iq = m.iq_weight * (input.iq_score - m.iq_mean) / m.iq_std;
        (cgpa, iq)
    }
}

impl Default for LogisticPredictor {
    fn default() -> Self {
        Self {
            model: LogisticModel::default(),
        }
    }
}

#[async_trait]
impl PlacementPredictor for LogisticPredictor {
    fn name(&self) -> &str {
        "logistic"
    }

    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictorError> {
        let (cgpa, iq) = self.contributions(input);
        let probability = sigmoid(self.model.intercept + cgpa + iq);

        let (placement, confidence) = if probability >= self.model.threshold {
            (Placement::Placed, probability)
        } else {
            (Placement::NotPlaced, 1.0 - probability)
        };
        let factor = if cgpa.abs() >= iq.abs() {
            FACTOR_CGPA
        } else {
            FACTOR_IQ
        };

        tracing::debug!(
            cgpa = input.cgpa,
            iq = input.iq_score,
            probability,
            "logistic prediction"
        );

        PredictionResult::new(placement, confidence, factor)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(cgpa: f64, iq: f64) -> PredictionInput {
        PredictionInput::new(cgpa, iq).unwrap()
    }

    #[tokio::test]
    async fn strong_profile_is_placed() {
        let predictor = LogisticPredictor::default();
        let result = predictor.predict(&input(9.0, 130.0)).await.unwrap();
        assert_eq!(result.placement, Placement::Placed);
        assert!(result.confidence > 0.95, "got {}", result.confidence);
        assert_eq!(result.dominant_factor, FACTOR_CGPA);
    }

    #[tokio::test]
    async fn weak_cgpa_is_not_placed() {
        let predictor = LogisticPredictor::default();
        let result = predictor.predict(&input(5.0, 100.0)).await.unwrap();
        assert_eq!(result.placement, Placement::NotPlaced);
        assert!(result.confidence > 0.9, "got {}", result.confidence);
        assert_eq!(result.dominant_factor, FACTOR_CGPA);
    }

    #[tokio::test]
    async fn low_iq_with_average_cgpa_blames_iq() {
        let predictor = LogisticPredictor::default();
        let result = predictor.predict(&input(7.0, 70.0)).await.unwrap();
        assert_eq!(result.placement, Placement::NotPlaced);
        assert_eq!(result.dominant_factor, FACTOR_IQ);
    }

    #[tokio::test]
    async fn confidence_is_probability_of_predicted_class() {
        let predictor = LogisticPredictor::default();
        for (cgpa, iq) in [(3.0, 80.0), (6.8, 104.0), (7.2, 106.0), (10.0, 160.0)] {
            let i = input(cgpa, iq);
            let p = predictor.probability(&i);
            let result = predictor.predict(&i).await.unwrap();
            assert!((0.5..=1.0).contains(&result.confidence));
            let expected = if result.placement.is_placed() { p } else { 1.0 - p };
            assert!((result.confidence - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn probability_is_monotonic_in_cgpa() {
        let predictor = LogisticPredictor::default();
        let low = predictor.probability(&input(5.0, 100.0));
        let high = predictor.probability(&input(8.0, 100.0));
        assert!(high > low);
    }

    #[test]
    fn invalid_models_are_rejected() {
        let model = LogisticModel {
            iq_std: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            LogisticPredictor::new(model),
            Err(PredictorError::Unavailable(_))
        ));

        let model = LogisticModel {
            threshold: 1.5,
            ..Default::default()
        };
        assert!(LogisticPredictor::new(model).is_err());
    }
}
