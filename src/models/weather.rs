//! Weather observation model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::numeric::lenient_number;

/// Station pressure used when the weather service gives none (hPa)
pub const FALLBACK_PRESSURE_HPA: f64 = 1013.0;
/// Relative humidity used when the weather service gives none (%)
pub const FALLBACK_HUMIDITY_PERCENT: f64 = 50.0;
/// Sea-level pressure used when the weather service gives none (hPa)
pub const FALLBACK_SEA_LEVEL_PRESSURE_HPA: f64 = 1013.0;
/// Wind speed used when the weather service gives none (m/s)
pub const FALLBACK_WIND_SPEED_MS: f64 = 0.0;

/// Where an observation's values came from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Parsed from a successful weather service response
    Live,
    /// The weather service was unavailable; all values are fallback constants
    Fallback,
}

/// Current weather at a coordinate, possibly fallback-filled
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Temperature in Celsius; `None` means unknown, not zero
    pub temperature_celsius: Option<f64>,
    /// Station pressure in hPa
    pub pressure_hpa: f64,
    /// Relative humidity in percent
    pub humidity_percent: f64,
    /// Sea-level pressure in hPa
    pub sea_level_pressure_hpa: f64,
    /// Wind speed in m/s
    pub wind_speed_ms: f64,
    /// Whether the values are live or fallback
    pub source: ObservationSource,
    /// When the observation was obtained
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// The observation used when the weather service cannot be reached
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            temperature_celsius: None,
            pressure_hpa: FALLBACK_PRESSURE_HPA,
            humidity_percent: FALLBACK_HUMIDITY_PERCENT,
            sea_level_pressure_hpa: FALLBACK_SEA_LEVEL_PRESSURE_HPA,
            wind_speed_ms: FALLBACK_WIND_SPEED_MS,
            source: ObservationSource::Fallback,
            observed_at: Utc::now(),
        }
    }

    /// Build an observation from a `/map/` response body.
    ///
    /// Returns `None` when the body is not a JSON object. Individual fields
    /// that are missing or not numeric take their fallback constant; a missing
    /// sea-level pressure takes the station pressure when one was reported.
    #[must_use]
    pub fn from_map_payload(body: &Value) -> Option<Self> {
        let fields = body.as_object()?;

        let temperature_celsius = lenient_number(fields.get("temperatureCelsius"));
        let pressure = lenient_number(fields.get("pressure_hpa"));
        let humidity = lenient_number(fields.get("humidity_percent"));
        let sea_level = lenient_number(fields.get("sea_level_pressure"))
            .or(pressure)
            .unwrap_or(FALLBACK_SEA_LEVEL_PRESSURE_HPA);
        let wind_speed = lenient_number(fields.get("wind_speed_ms"));

        Some(Self {
            temperature_celsius,
            pressure_hpa: pressure.unwrap_or(FALLBACK_PRESSURE_HPA),
            humidity_percent: humidity.unwrap_or(FALLBACK_HUMIDITY_PERCENT),
            sea_level_pressure_hpa: sea_level,
            wind_speed_ms: wind_speed.unwrap_or(FALLBACK_WIND_SPEED_MS),
            source: ObservationSource::Live,
            observed_at: Utc::now(),
        })
    }

    /// Whether this observation carries only fallback values
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == ObservationSource::Fallback
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature_celsius {
            Some(temperature) => format!("{temperature:.1}°C"),
            None => "Unknown".to_string(),
        }
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{:.1} hPa", self.pressure_hpa)
    }

    /// Format sea-level pressure with unit
    #[must_use]
    pub fn format_sea_level_pressure(&self) -> String {
        format!("{:.1} hPa", self.sea_level_pressure_hpa)
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{:.1}%", self.humidity_percent)
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{:.1} m/s", self.wind_speed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_values() {
        let weather = WeatherObservation::fallback();
        assert_eq!(weather.temperature_celsius, None);
        assert_eq!(weather.pressure_hpa, 1013.0);
        assert_eq!(weather.humidity_percent, 50.0);
        assert_eq!(weather.sea_level_pressure_hpa, 1013.0);
        assert_eq!(weather.wind_speed_ms, 0.0);
        assert!(weather.is_fallback());
    }

    #[test]
    fn test_full_payload() {
        let body = json!({
            "temperatureCelsius": 18.5,
            "pressure_hpa": 1012.3,
            "humidity_percent": 65.2,
            "sea_level_pressure": 1015.0,
            "wind_speed_ms": 4.1
        });
        let weather = WeatherObservation::from_map_payload(&body).unwrap();
        assert_eq!(weather.temperature_celsius, Some(18.5));
        assert_eq!(weather.pressure_hpa, 1012.3);
        assert_eq!(weather.humidity_percent, 65.2);
        assert_eq!(weather.sea_level_pressure_hpa, 1015.0);
        assert_eq!(weather.wind_speed_ms, 4.1);
        assert_eq!(weather.source, ObservationSource::Live);
    }

    #[test]
    fn test_zero_temperature_is_not_unknown() {
        let body = json!({ "temperatureCelsius": 0.0 });
        let weather = WeatherObservation::from_map_payload(&body).unwrap();
        assert_eq!(weather.temperature_celsius, Some(0.0));
    }

    #[test]
    fn test_partial_payload_uses_field_fallbacks() {
        let body = json!({
            "temperatureCelsius": null,
            "pressure_hpa": "1008",
            "humidity_percent": "damp",
        });
        let weather = WeatherObservation::from_map_payload(&body).unwrap();
        assert_eq!(weather.temperature_celsius, None);
        assert_eq!(weather.pressure_hpa, 1008.0);
        assert_eq!(weather.humidity_percent, FALLBACK_HUMIDITY_PERCENT);
        assert_eq!(weather.sea_level_pressure_hpa, 1008.0);
        assert_eq!(weather.wind_speed_ms, FALLBACK_WIND_SPEED_MS);
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        assert!(WeatherObservation::from_map_payload(&json!([1, 2, 3])).is_none());
        assert!(WeatherObservation::from_map_payload(&json!("sunny")).is_none());
    }

    #[test]
    fn test_display_formatting() {
        let mut weather = WeatherObservation::fallback();
        assert_eq!(weather.format_temperature(), "Unknown");
        assert_eq!(weather.format_pressure(), "1013.0 hPa");
        assert_eq!(weather.format_humidity(), "50.0%");
        assert_eq!(weather.format_wind(), "0.0 m/s");

        weather.temperature_celsius = Some(18.54);
        assert_eq!(weather.format_temperature(), "18.5°C");
    }
}
