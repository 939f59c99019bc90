//! Prediction request and result models
//!
//! A [`PredictionRequest`] is the wire form of one `/details/` query: six
//! mandatory fixed-precision decimal strings. A [`PredictionResult`] is the
//! normalized form of a successful response body.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Coordinate, WeatherObservation};
use crate::numeric::{self, MEASUREMENT_PRECISION, lenient_number};
use crate::{Result, RiskMapError};

/// Query parameter names in wire order
pub const REQUEST_PARAMS: [&str; 6] = ["lat", "lng", "temp", "pressure", "humidity", "wind_speed"];

/// Label used when the service does not name a disaster type
pub const UNKNOWN_DISASTER_TYPE: &str = "Unknown";

/// A fully formatted prediction request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub latitude: String,
    pub longitude: String,
    pub temperature_celsius: String,
    pub pressure_hpa: String,
    pub humidity_percent: String,
    pub wind_speed_ms: String,
}

impl PredictionRequest {
    /// Build a request from a validated coordinate and a weather observation.
    ///
    /// A missing temperature fails the build: a fallback observation must not
    /// turn into a prediction for a made-up temperature.
    pub fn build(coordinate: &Coordinate, weather: &WeatherObservation) -> Result<Self> {
        let Some(temperature) = weather.temperature_celsius else {
            return Err(RiskMapError::incomplete_request(
                "Temperature reading is unavailable; cannot request a prediction",
            ));
        };

        let (latitude, longitude) = coordinate.to_wire().map_err(incomplete)?;

        Ok(Self {
            latitude,
            longitude,
            temperature_celsius: measurement("temperature", temperature)?,
            pressure_hpa: measurement("pressure", weather.pressure_hpa)?,
            humidity_percent: measurement("humidity", weather.humidity_percent)?,
            wind_speed_ms: measurement("wind speed", weather.wind_speed_ms)?,
        })
    }

    /// Build a request from raw query parameters (`lat`, `lng`, `temp`,
    /// `pressure`, `humidity`, `wind_speed`).
    ///
    /// Every missing or blank parameter is reported in one error. Values are
    /// re-validated and re-formatted, so a hand-edited link cannot send an
    /// out-of-range coordinate.
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self> {
        let missing: Vec<&str> = REQUEST_PARAMS
            .iter()
            .copied()
            .filter(|name| params.get(*name).is_none_or(|value| value.trim().is_empty()))
            .collect();

        if !missing.is_empty() {
            return Err(RiskMapError::incomplete_request(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )));
        }

        let value = |name: &str| -> Result<f64> {
            let raw = params.get(name).map(String::as_str).unwrap_or_default();
            numeric::parse_fixed_string(raw).map_err(|_| {
                RiskMapError::incomplete_request(format!(
                    "Parameter '{name}' is not a number: '{raw}'"
                ))
            })
        };

        let coordinate = Coordinate::validate(value("lat")?, value("lng")?)?;
        let (latitude, longitude) = coordinate.to_wire().map_err(incomplete)?;

        Ok(Self {
            latitude,
            longitude,
            temperature_celsius: measurement("temp", value("temp")?)?,
            pressure_hpa: measurement("pressure", value("pressure")?)?,
            humidity_percent: measurement("humidity", value("humidity")?)?,
            wind_speed_ms: measurement("wind_speed", value("wind_speed")?)?,
        })
    }

    /// Query parameters in wire order
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 6] {
        [
            (REQUEST_PARAMS[0], self.latitude.as_str()),
            (REQUEST_PARAMS[1], self.longitude.as_str()),
            (REQUEST_PARAMS[2], self.temperature_celsius.as_str()),
            (REQUEST_PARAMS[3], self.pressure_hpa.as_str()),
            (REQUEST_PARAMS[4], self.humidity_percent.as_str()),
            (REQUEST_PARAMS[5], self.wind_speed_ms.as_str()),
        ]
    }
}

fn measurement(name: &str, value: f64) -> Result<String> {
    numeric::to_fixed_string(value, MEASUREMENT_PRECISION).map_err(|_| {
        RiskMapError::incomplete_request(format!("Field '{name}' is not a finite number"))
    })
}

fn incomplete(err: RiskMapError) -> RiskMapError {
    RiskMapError::incomplete_request(err.to_string())
}

/// Outcome reported by the prediction service
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    Success,
    Failure,
}

/// A normalized, display-safe prediction
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResult {
    pub disaster_type: String,
    pub predicted_deaths: u64,
    /// Infrastructure loss in US dollars, never negative
    pub predicted_infrastructure_loss: f64,
    /// Severity score in [0, 1]
    pub severity: f64,
    pub confidence: Option<f64>,
    pub status: PredictionStatus,
}

impl PredictionResult {
    /// Normalize a `/details/` body whose `status` is `"success"`.
    ///
    /// Never fails: missing or unusable fields take neutral defaults so the
    /// result card always has something to show.
    #[must_use]
    pub fn from_details_payload(body: &Value) -> Self {
        let disaster_type = body
            .get("disaster_type")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_DISASTER_TYPE)
            .to_string();

        // Non-numeric counts quietly become 0, matching the service's own
        // integer coercion.
        let predicted_deaths = lenient_number(body.get("predicted_deaths"))
            .map_or(0, |deaths| deaths.max(0.0).trunc() as u64);

        let predicted_infrastructure_loss =
            lenient_number(body.get("predicted_infra_loss")).map_or(0.0, |loss| loss.max(0.0));

        let severity =
            lenient_number(body.get("severity")).map_or(0.0, |severity| severity.clamp(0.0, 1.0));

        let confidence = body.get("confidence").and_then(Value::as_f64);

        Self {
            disaster_type,
            predicted_deaths,
            predicted_infrastructure_loss,
            severity,
            confidence,
            status: PredictionStatus::Success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ObservationSource;
    use chrono::Utc;
    use serde_json::json;

    fn observation(temperature: Option<f64>) -> WeatherObservation {
        WeatherObservation {
            temperature_celsius: temperature,
            pressure_hpa: 1012.3,
            humidity_percent: 65.2,
            sea_level_pressure_hpa: 1012.3,
            wind_speed_ms: 4.1,
            source: ObservationSource::Live,
            observed_at: Utc::now(),
        }
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_build_formats_every_field() {
        let coordinate = Coordinate::validate(37.7749, -122.4194).unwrap();
        let request = PredictionRequest::build(&coordinate, &observation(Some(18.5))).unwrap();

        assert_eq!(request.latitude, "37.774900");
        assert_eq!(request.longitude, "-122.419400");
        assert_eq!(request.temperature_celsius, "18.50");
        assert_eq!(request.pressure_hpa, "1012.30");
        assert_eq!(request.humidity_percent, "65.20");
        assert_eq!(request.wind_speed_ms, "4.10");
    }

    #[test]
    fn test_build_accepts_zero_temperature() {
        let coordinate = Coordinate::validate(0.0, 0.0).unwrap();
        let request = PredictionRequest::build(&coordinate, &observation(Some(0.0))).unwrap();
        assert_eq!(request.temperature_celsius, "0.00");
    }

    #[test]
    fn test_build_without_temperature_fails() {
        let coordinate = Coordinate::validate(37.7749, -122.4194).unwrap();
        let err =
            PredictionRequest::build(&coordinate, &WeatherObservation::fallback()).unwrap_err();
        assert!(matches!(err, RiskMapError::IncompleteRequest { .. }));
    }

    #[test]
    fn test_build_with_non_finite_field_fails() {
        let coordinate = Coordinate::validate(10.0, 10.0).unwrap();
        let mut weather = observation(Some(20.0));
        weather.humidity_percent = f64::NAN;
        let err = PredictionRequest::build(&coordinate, &weather).unwrap_err();
        assert!(matches!(err, RiskMapError::IncompleteRequest { .. }));
        assert!(err.to_string().contains("humidity"));
    }

    #[test]
    fn test_query_pairs_order() {
        let coordinate = Coordinate::validate(1.0, 2.0).unwrap();
        let request = PredictionRequest::build(&coordinate, &observation(Some(3.0))).unwrap();
        let names: Vec<&str> = request.query_pairs().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, REQUEST_PARAMS);
        assert_eq!(request.query_pairs()[2], ("temp", "3.00"));
    }

    #[test]
    fn test_from_query_reformats_values() {
        let params = query(&[
            ("lat", "37.7749"),
            ("lng", "-122.4194"),
            ("temp", "18.5"),
            ("pressure", "1012.3"),
            ("humidity", "65.2"),
            ("wind_speed", "4.1"),
        ]);
        let request = PredictionRequest::from_query(&params).unwrap();
        assert_eq!(request.latitude, "37.774900");
        assert_eq!(request.wind_speed_ms, "4.10");
    }

    #[test]
    fn test_from_query_lists_all_missing_params() {
        let params = query(&[
            ("lng", "1"),
            ("pressure", "1013"),
            ("humidity", " "),
            ("wind_speed", "0"),
        ]);
        let err = PredictionRequest::from_query(&params).unwrap_err();
        assert_eq!(
            err,
            RiskMapError::incomplete_request("Missing required parameters: lat, temp, humidity")
        );
    }

    #[test]
    fn test_from_query_rejects_unparseable_values() {
        let params = query(&[
            ("lat", "10"),
            ("lng", "10"),
            ("temp", "warm"),
            ("pressure", "1013"),
            ("humidity", "50"),
            ("wind_speed", "0"),
        ]);
        let err = PredictionRequest::from_query(&params).unwrap_err();
        assert!(matches!(err, RiskMapError::IncompleteRequest { .. }));
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn test_from_query_rejects_out_of_range_coordinates() {
        let params = query(&[
            ("lat", "95"),
            ("lng", "10"),
            ("temp", "20"),
            ("pressure", "1013"),
            ("humidity", "50"),
            ("wind_speed", "0"),
        ]);
        let err = PredictionRequest::from_query(&params).unwrap_err();
        assert!(matches!(err, RiskMapError::InvalidCoordinate { .. }));
    }

    #[test]
    fn test_normalize_full_payload() {
        let body = json!({
            "status": "success",
            "disaster_type": "Flood",
            "predicted_deaths": 12,
            "predicted_infra_loss": 2_500_000.0,
            "severity": 0.62,
            "confidence": 0.8
        });
        let result = PredictionResult::from_details_payload(&body);
        assert_eq!(result.disaster_type, "Flood");
        assert_eq!(result.predicted_deaths, 12);
        assert_eq!(result.predicted_infrastructure_loss, 2_500_000.0);
        assert_eq!(result.severity, 0.62);
        assert_eq!(result.confidence, Some(0.8));
        assert_eq!(result.status, PredictionStatus::Success);
    }

    #[test]
    fn test_normalize_empty_payload() {
        let result = PredictionResult::from_details_payload(&json!({ "status": "success" }));
        assert_eq!(result.disaster_type, UNKNOWN_DISASTER_TYPE);
        assert_eq!(result.predicted_deaths, 0);
        assert_eq!(result.predicted_infrastructure_loss, 0.0);
        assert_eq!(result.severity, 0.0);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_normalize_coerces_messy_values() {
        let body = json!({
            "disaster_type": "",
            "predicted_deaths": "many",
            "predicted_infra_loss": -300.0,
            "severity": "1.7",
            "confidence": "high"
        });
        let result = PredictionResult::from_details_payload(&body);
        assert_eq!(result.disaster_type, UNKNOWN_DISASTER_TYPE);
        assert_eq!(result.predicted_deaths, 0);
        assert_eq!(result.predicted_infrastructure_loss, 0.0);
        assert_eq!(result.severity, 1.0);
        assert_eq!(result.confidence, None);
    }

    #[test]
    fn test_normalize_keeps_zero_confidence_and_rejects_partial_counts() {
        let body = json!({ "predicted_deaths": "12abc", "confidence": 0 });
        let result = PredictionResult::from_details_payload(&body);
        assert_eq!(result.predicted_deaths, 0);
        assert_eq!(result.confidence, Some(0.0));
    }

    #[test]
    fn test_normalize_truncates_fractional_deaths() {
        let body = json!({ "predicted_deaths": "41.9" });
        assert_eq!(PredictionResult::from_details_payload(&body).predicted_deaths, 41);

        let body = json!({ "predicted_deaths": -5 });
        assert_eq!(PredictionResult::from_details_payload(&body).predicted_deaths, 0);
    }
}
