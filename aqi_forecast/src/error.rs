//! Error types for the aqi_forecast crate

use aqi_math::MathError;
use thiserror::Error;

/// Custom error types for the aqi_forecast crate
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Too few history points for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Query date could not be parsed as `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Query date is well formed but absent from the dataset
    #[error("Date {0} not found in dataset")]
    DateNotFound(chrono::NaiveDate),

    /// Numeric fitting failure
    #[error("Forecasting error: {0}")]
    Forecast(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error related to input data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error loading or validating configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from CSV parsing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failures of the external text-generation service
///
/// These never end a run: the requester turns them into a sentinel advisory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdvisoryError {
    #[error("advisory generation is disabled in configuration")]
    Disabled,

    #[error("no API key configured for provider {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("service returned an empty response")]
    EmptyResponse,
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, AdvisorError>;

impl From<MathError> for AdvisorError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => AdvisorError::InsufficientData(msg),
            other => AdvisorError::Forecast(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for AdvisorError {
    fn from(err: toml::de::Error) -> Self {
        AdvisorError::Config(err.to_string())
    }
}
