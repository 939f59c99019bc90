//! Data models for the `RiskMap` client
//!
//! This module contains the core domain models organized by concern:
//! - Coordinate: validated map coordinates
//! - Weather: current weather observations and their fallback values
//! - Prediction: the prediction request wire form and the normalized result
//! - Disaster: historical disaster records

pub mod coordinate;
pub mod disaster;
pub mod prediction;
pub mod weather;

// Re-export all public types for convenient access
pub use coordinate::Coordinate;
pub use disaster::DisasterRecord;
pub use prediction::{PredictionRequest, PredictionResult, PredictionStatus};
pub use weather::{ObservationSource, WeatherObservation};
