//! Configuration management for the `RiskMap` client
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RiskMapError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `RiskMap` client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMapConfig {
    /// Backend service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL serving `/map/`, `/details/` and `/disasters/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("RiskMap/{}", crate::VERSION)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for RiskMapConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl RiskMapConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // RISKMAP_SERVICE__BASE_URL overrides service.base_url
        builder = builder.add_source(
            Environment::with_prefix("RISKMAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RiskMapConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("riskmap").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.service.base_url.is_empty() {
            self.service.base_url = default_base_url();
        }
        if self.service.timeout_seconds == 0 {
            self.service.timeout_seconds = default_timeout();
        }
        if self.service.user_agent.is_empty() {
            self.service.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.service.timeout_seconds > 300 {
            return Err(RiskMapError::config("Service timeout cannot exceed 300 seconds").into());
        }
        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RiskMapError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RiskMapError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.service.base_url.starts_with("http://")
            && !self.service.base_url.starts_with("https://")
        {
            return Err(RiskMapError::config(
                "Service base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
