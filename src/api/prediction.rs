//! Disaster prediction calls
//!
//! Unlike weather, every failure here reaches the caller: a prediction the
//! user might act on is never silently replaced.

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use super::{ApiClient, error_message};
use crate::models::{PredictionRequest, PredictionResult};
use crate::{Result, RiskMapError};

const PREDICTION_PATH: &str = "details/";
const GENERIC_FAILURE: &str = "Prediction request failed";

/// Issues `/details/` requests and normalizes their responses
#[derive(Debug, Clone)]
pub struct PredictionClient {
    api: ApiClient,
}

impl PredictionClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Request a prediction. Not retried on failure.
    #[instrument(skip(self, request), fields(lat = %request.latitude, lng = %request.longitude))]
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult> {
        let start_time = Instant::now();
        debug!("Prediction request: {:?}", request.query_pairs());

        let response = self
            .api
            .get(PREDICTION_PATH)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| {
                error!("Prediction request to {} failed: {e}", self.api.base_url());
                RiskMapError::service_unavailable(e.to_string())
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read prediction response: {e}");
            RiskMapError::service_unavailable(e.to_string())
        })?;
        let body = serde_json::from_str::<Value>(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|body| error_message(body, &["details", "error"]))
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!("Prediction service returned {status}: {message}");
            return Err(RiskMapError::service_rejected(status.as_u16(), message));
        }

        let Some(body) = body else {
            warn!("Prediction response is not JSON");
            return Err(RiskMapError::invalid_service_response(
                "response body is not valid JSON",
            ));
        };

        match body.get("status").and_then(Value::as_str) {
            Some("success") => {
                let result = PredictionResult::from_details_payload(&body);
                info!(
                    "Prediction {} (severity {:.2}) in {:.3}s",
                    result.disaster_type,
                    result.severity,
                    start_time.elapsed().as_secs_f64()
                );
                Ok(result)
            }
            other => {
                let status = other.unwrap_or("<missing>");
                warn!("Prediction service reported status {status}");
                Err(RiskMapError::invalid_service_response(format!(
                    "service reported status '{status}'"
                )))
            }
        }
    }
}
