//! Mock predictor for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use iqplace_core::error::PredictorError;
use iqplace_core::model::Placement;
use iqplace_core::traits::{PlacementPredictor, PredictionInput, PredictionResult};

/// A predictor that returns a canned answer without any model behind it.
///
/// Either always succeeds with the same [`PredictionResult`] or always fails
/// with the same [`PredictorError`].
pub struct MockPredictor {
    outcome: Result<PredictionResult, PredictorError>,
    call_count: AtomicU32,
    last_input: Mutex<Option<PredictionInput>>,
}

impl MockPredictor {
    /// Create a mock that always returns `result`.
    pub fn with_fixed_result(result: PredictionResult) -> Self {
        Self::new(Ok(result))
    }

    /// Create a mock that always fails with `error`.
    pub fn failing(error: PredictorError) -> Self {
        Self::new(Err(error))
    }

    /// Shorthand for a successful mock built from its parts.
    pub fn placed(confidence: f64, dominant_factor: &str) -> Result<Self, PredictorError> {
        let result = PredictionResult::new(Placement::Placed, confidence, dominant_factor)?;
        Ok(Self::with_fixed_result(result))
    }

    fn new(outcome: Result<PredictionResult, PredictorError>) -> Self {
        Self {
            outcome,
            call_count: AtomicU32::new(0),
            last_input: Mutex::new(None),
        }
    }

    /// Number of `predict` calls made so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The input of the most recent `predict` call.
    pub fn last_input(&self) -> Option<PredictionInput> {
        self.last_input.lock().ok().and_then(|guard| *guard)
    }
}

#[async_trait]
impl PlacementPredictor for MockPredictor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictorError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_input.lock() {
            *last = Some(*input);
        }
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_result() {
        let predictor = MockPredictor::placed(0.9, "IQ").unwrap();
        let input = PredictionInput::new(6.5, 121.0).unwrap();

        let result = predictor.predict(&input).await.unwrap();
        assert_eq!(result.placement, Placement::Placed);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.dominant_factor, "IQ");
        assert_eq!(predictor.call_count(), 1);
        assert_eq!(predictor.last_input(), Some(input));
    }

    #[tokio::test]
    async fn failing_mock_counts_calls() {
        let predictor = MockPredictor::failing(PredictorError::Timeout(3));
        assert_eq!(predictor.last_input(), None);

        let input = PredictionInput::new(7.0, 100.0).unwrap();
        for _ in 0..2 {
            let err = predictor.predict(&input).await.unwrap_err();
            assert_eq!(err, PredictorError::Timeout(3));
        }
        assert_eq!(predictor.call_count(), 2);
    }
}
