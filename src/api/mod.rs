//! HTTP clients for the risk backend
//!
//! All calls go through one [`ApiClient`], which owns the `reqwest` client
//! (timeout, user agent) and the service base URL. Each endpoint family has
//! its own adapter with its own failure policy:
//! - [`WeatherFetchAdapter`] never fails and degrades to fallback values
//! - [`PredictionClient`] surfaces every failure as a typed error
//! - [`DisasterClient`] is a plain CRUD passthrough

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::config::ServiceConfig;
use crate::{Result, RiskMapError};

pub mod disasters;
pub mod prediction;
pub mod weather;

pub use disasters::DisasterClient;
pub use prediction::PredictionClient;
pub use weather::WeatherFetchAdapter;

/// Shared HTTP client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from service settings
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RiskMapError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

/// First non-blank string found under `keys` in a JSON error body
pub(crate) fn error_message(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}
