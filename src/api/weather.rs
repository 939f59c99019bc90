//! Current weather lookup for a map coordinate
//!
//! The weather card must always render, so this adapter never returns an
//! error: any failure is logged and replaced by
//! [`WeatherObservation::fallback`].

use std::time::Instant;

use anyhow::{Context, anyhow, bail};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{ApiClient, error_message};
use crate::models::{Coordinate, WeatherObservation};

const WEATHER_PATH: &str = "map/";

/// Fetches `/map/` observations, degrading to fallback values on failure
#[derive(Debug, Clone)]
pub struct WeatherFetchAdapter {
    api: ApiClient,
}

impl WeatherFetchAdapter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Current weather at `coordinate`, or the fallback observation
    #[instrument(skip(self), fields(lat = coordinate.latitude(), lon = coordinate.longitude()))]
    pub async fn fetch(&self, coordinate: &Coordinate) -> WeatherObservation {
        let start_time = Instant::now();

        match self.fetch_live(coordinate).await {
            Ok(weather) => {
                info!(
                    "Retrieved weather for {} in {:.3}s",
                    coordinate.format_coordinates(),
                    start_time.elapsed().as_secs_f64()
                );
                weather
            }
            Err(cause) => {
                warn!("Weather unavailable, using fallback observation: {cause:#}");
                WeatherObservation::fallback()
            }
        }
    }

    async fn fetch_live(&self, coordinate: &Coordinate) -> anyhow::Result<WeatherObservation> {
        let (lat, lon) = coordinate.to_wire()?;
        debug!("Weather request: {}?lat={lat}&lon={lon}", self.api.url(WEATHER_PATH));

        let response = self
            .api
            .get(WEATHER_PATH)
            .query(&[("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .context("Weather request failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read weather response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| error_message(&body, &["error"]))
                .unwrap_or_else(|| "Failed to fetch weather data.".to_string());
            bail!("Weather service returned {status}: {message}");
        }

        let body: Value =
            serde_json::from_str(&text).context("Failed to parse weather response")?;

        WeatherObservation::from_map_payload(&body)
            .ok_or_else(|| anyhow!("Weather response is not a JSON object"))
    }
}
