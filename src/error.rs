//! Error types and handling for the `RiskMap` client

use thiserror::Error;

/// Main error type for the `RiskMap` client
///
/// Every variant carries plain strings so outcomes holding an error can be
/// cloned out to subscribers of the result board.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskMapError {
    /// Coordinate input that is not a finite, in-range latitude/longitude
    #[error("Invalid coordinate: {message}")]
    InvalidCoordinate { message: String },

    /// Formatting or parsing of a numeric wire value failed
    #[error("Invalid numeric value: {message}")]
    InvalidNumeric { message: String },

    /// A prediction request cannot be built safely from the inputs
    #[error("Incomplete prediction request: {message}")]
    IncompleteRequest { message: String },

    /// Transport-level failure while talking to the prediction service
    #[error("Prediction service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// The prediction service answered, but not with a usable result
    #[error("Invalid response from prediction service: {message}")]
    InvalidServiceResponse { message: String },

    /// The prediction service answered with a non-success HTTP status
    #[error("Prediction service error ({status}): {message}")]
    ServiceRejected { status: u16, message: String },

    /// Disaster record API errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for RiskMapError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
        }
    }
}

impl RiskMapError {
    /// Create a new invalid coordinate error
    pub fn invalid_coordinate<S: Into<String>>(message: S) -> Self {
        Self::InvalidCoordinate {
            message: message.into(),
        }
    }

    /// Create a new invalid numeric error
    pub fn invalid_numeric<S: Into<String>>(message: S) -> Self {
        Self::InvalidNumeric {
            message: message.into(),
        }
    }

    /// Create a new incomplete request error
    pub fn incomplete_request<S: Into<String>>(message: S) -> Self {
        Self::IncompleteRequest {
            message: message.into(),
        }
    }

    /// Create a new service unavailable error
    pub fn service_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create a new invalid service response error
    pub fn invalid_service_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidServiceResponse {
            message: message.into(),
        }
    }

    /// Create a new service rejection error
    pub fn service_rejected<S: Into<String>>(status: u16, message: S) -> Self {
        Self::ServiceRejected {
            status,
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error was raised before any network call was made
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinate { .. }
                | Self::InvalidNumeric { .. }
                | Self::IncompleteRequest { .. }
        )
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            RiskMapError::InvalidCoordinate { message } => message.clone(),
            RiskMapError::InvalidNumeric { message } => format!("Invalid number: {message}"),
            RiskMapError::IncompleteRequest { message } => message.clone(),
            RiskMapError::ServiceUnavailable { .. } => {
                "Unable to reach the prediction service. Please check your connection and try again."
                    .to_string()
            }
            RiskMapError::InvalidServiceResponse { .. } => {
                "Invalid response from prediction service".to_string()
            }
            RiskMapError::ServiceRejected { message, .. } => message.clone(),
            RiskMapError::Api { message } => message.clone(),
            RiskMapError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            RiskMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
