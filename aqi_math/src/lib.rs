//! # AQI Math
//!
//! Numeric building blocks for air quality forecasting.
//! This crate provides the additive Holt / Holt-Winters smoothing
//! recursions, a bounded Nelder-Mead search used to fit their
//! coefficients, and small summary statistics over series segments.

use thiserror::Error;

pub mod forecasting;
pub mod optimize;
pub mod statistics;

/// Errors that can occur in smoothing and fitting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for smoothing math operations
pub type Result<T> = std::result::Result<T, MathError>;
