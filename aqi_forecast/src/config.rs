//! Configuration for forecasting and the advisory service

use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Built-in defaults
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Environment variable that overrides `advisory.api_key`
pub const API_KEY_ENV: &str = "AQI_ADVISOR_API_KEY";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub forecast: ForecastConfig,
    pub advisory: AdvisoryConfig,
}

/// Forecast settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Steps forecast from an undated history
    pub horizon: usize,
    /// Days forecast from a dated dataset query
    pub dated_horizon: usize,
    /// Prediction interval coverage, in (0, 1)
    pub confidence_level: f64,
}

/// Text-generation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }
}

/// Advisory service settings, passed to the requester at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    pub enabled: bool,
    pub provider: Provider,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 3,
            dated_horizon: 14,
            confidence_level: 0.95,
        }
    }
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: Provider::Gemini,
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl MonitorConfig {
    /// Parse and validate a TOML document; missing keys take their defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: MonitorConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user file at `path`, or the built-in defaults, then apply the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration");
                Self::from_toml(&fs::read_to_string(path)?)?
            }
            None => Self::from_toml(DEFAULT_CONFIG)?,
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Replace the configured API key when `key` is present and non-blank
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.advisory.api_key = Some(key.trim().to_string());
        }
        self
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.forecast.horizon == 0 || self.forecast.dated_horizon == 0 {
            return Err(AdvisorError::Config(
                "forecast horizons must be at least 1".to_string(),
            ));
        }
        if !(self.forecast.confidence_level > 0.0 && self.forecast.confidence_level < 1.0) {
            return Err(AdvisorError::Config(format!(
                "forecast.confidence_level must be between 0 and 1, got {}",
                self.forecast.confidence_level
            )));
        }
        if self.advisory.timeout_secs == 0 {
            return Err(AdvisorError::Config(
                "advisory.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.advisory.enabled && self.advisory.endpoint.trim().is_empty() {
            return Err(AdvisorError::Config(
                "advisory.endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
