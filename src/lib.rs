//! `RiskMap` - disaster risk prediction for a clicked map location
//!
//! This library turns a raw map coordinate into a validated prediction
//! request, fetches weather and prediction data from the risk backend, and
//! turns the response into a display-safe, severity-classified result.

pub mod api;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod numeric;
pub mod pipeline;

// Re-export core types for public API
pub use api::{ApiClient, DisasterClient, PredictionClient, WeatherFetchAdapter};
pub use classify::{RiskAssessment, SeverityBand, classify};
pub use config::RiskMapConfig;
pub use error::RiskMapError;
pub use models::{
    Coordinate, DisasterRecord, PredictionRequest, PredictionResult, PredictionStatus,
    WeatherObservation,
};
pub use pipeline::{PipelineOutcome, ResultBoard, RiskPipeline, RiskReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RiskMapError>;
