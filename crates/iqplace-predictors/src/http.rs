//! Remote placement predictor over HTTP.
//!
//! Wire contract: `POST {base_url}/predict` with `{"cgpa": f64, "iq": f64}`,
//! answered by `{"prediction": 0|1, "confidence": f64, "dominant_factor": str}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use iqplace_core::error::PredictorError;
use iqplace_core::model::Placement;
use iqplace_core::traits::{PlacementPredictor, PredictionInput, PredictionResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Placement predictor served by a remote model service.
pub struct HttpPredictor {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpPredictor {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PredictorError> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PredictorError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
struct PredictResponse {
    prediction: u8,
    confidence: f64,
    #[serde(default)]
    dominant_factor: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "detail", alias = "message")]
    error: String,
}

/// Pull a readable message out of an error body, falling back to the raw text.
fn error_message(body: String) -> String {
    serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body)
}

#[async_trait]
impl PlacementPredictor for HttpPredictor {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, input), fields(base_url = %self.base_url))]
    async fn predict(&self, input: &PredictionInput) -> Result<PredictionResult, PredictorError> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(input)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PredictorError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    PredictorError::Unavailable(format!(
                        "prediction service not reachable at {}",
                        self.base_url
                    ))
                } else {
                    PredictorError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = error_message(response.text().await.unwrap_or_default());
            return Err(match status {
                400 | 422 => PredictorError::InvalidInput(message),
                404 | 503 => PredictorError::Unavailable(format!(
                    "model not available (HTTP {status}): {message}"
                )),
                _ => PredictorError::Api { status, message },
            });
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictorError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let placement = Placement::from_flag(body.prediction).ok_or_else(|| {
            PredictorError::InvalidResponse(format!(
                "prediction must be 0 or 1, got {}",
                body.prediction
            ))
        })?;

        tracing::debug!(
            prediction = body.prediction,
            confidence = body.confidence,
            "received prediction"
        );

        PredictionResult::new(placement, body.confidence, body.dominant_factor)
    }
}
