//! CRUD passthrough for the `/disasters/` resource

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::{ApiClient, error_message};
use crate::models::DisasterRecord;
use crate::{Result, RiskMapError};

const GENERIC_FAILURE: &str = "API request failed";

/// Client for historical disaster records
#[derive(Debug, Clone)]
pub struct DisasterClient {
    api: ApiClient,
}

impl DisasterClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<DisasterRecord>> {
        let response = self.send(self.api.request(Method::GET, "disasters/")).await?;
        parse_json(response).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<DisasterRecord> {
        let response = self
            .send(self.api.request(Method::GET, &format!("disasters/{id}")))
            .await?;
        parse_json(response).await
    }

    #[instrument(skip(self, record))]
    pub async fn create(&self, record: &DisasterRecord) -> Result<DisasterRecord> {
        let response = self
            .send(self.api.request(Method::POST, "disasters/").json(record))
            .await?;
        parse_json(response).await
    }

    #[instrument(skip(self, record))]
    pub async fn update(&self, id: i64, record: &DisasterRecord) -> Result<DisasterRecord> {
        let response = self
            .send(
                self.api
                    .request(Method::PUT, &format!("disasters/{id}"))
                    .json(record),
            )
            .await?;
        parse_json(response).await
    }

    /// Delete a record; whatever body the server answers with is ignored
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.send(self.api.request(Method::DELETE, &format!("disasters/{id}")))
            .await?;
        Ok(())
    }

    /// Send a request and turn a non-success status into an [`RiskMapError::Api`]
    /// carrying the server's `error` message, its raw text, or a generic message.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RiskMapError::api(format!("Request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<Value>(&text) {
            Ok(body) => error_message(&body, &["error"]),
            Err(_) => Some(text.trim().to_string()).filter(|text| !text.is_empty()),
        }
        .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        warn!("Disaster API returned {status}: {message}");
        Err(RiskMapError::api(message))
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let text = response
        .text()
        .await
        .map_err(|e| RiskMapError::api(format!("Failed to read response: {e}")))?;
    debug!("Disaster API response: {} bytes", text.len());
    serde_json::from_str(&text)
        .map_err(|e| RiskMapError::api(format!("Unexpected response body: {e}")))
}
