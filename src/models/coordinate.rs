//! Validated map coordinate

use serde::Serialize;

use crate::numeric::{self, COORDINATE_PRECISION, NumericInput};
use crate::{Result, RiskMapError};

/// A latitude/longitude pair that passed validation.
///
/// Fields are private so a `Coordinate` can only come from [`Coordinate::validate`].
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate a raw latitude/longitude pair.
    ///
    /// Inputs may be numbers or numeric strings. Both must be finite, with
    /// latitude in [-90, 90] and longitude in [-180, 180].
    pub fn validate(latitude: impl NumericInput, longitude: impl NumericInput) -> Result<Self> {
        let (Some(lat), Some(lng)) = (latitude.to_number(), longitude.to_number()) else {
            return Err(RiskMapError::invalid_coordinate(
                "Latitude and longitude must be valid numbers",
            ));
        };

        if !lat.is_finite() || !lng.is_finite() {
            return Err(RiskMapError::invalid_coordinate(
                "Latitude and longitude must be finite numbers",
            ));
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(RiskMapError::invalid_coordinate(
                "Latitude must be between -90 and 90 degrees",
            ));
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(RiskMapError::invalid_coordinate(
                "Longitude must be between -180 and 180 degrees",
            ));
        }

        Ok(Self {
            latitude: lat,
            longitude: lng,
        })
    }

    /// Latitude in decimal degrees
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude and longitude as wire strings with six fractional digits
    pub fn to_wire(&self) -> Result<(String, String)> {
        Ok((
            numeric::to_fixed_string(self.latitude, COORDINATE_PRECISION)?,
            numeric::to_fixed_string(self.longitude, COORDINATE_PRECISION)?,
        ))
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
