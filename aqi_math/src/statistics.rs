//! Summary statistics over series segments
//!
//! Contains the small helpers the forecasting pipeline needs:
//! - Arithmetic mean of a whole series
//! - Mean of the leading / trailing window of a series
//! - Screening of series before they reach a smoothing model

use crate::{MathError, Result};

/// Arithmetic mean of all values
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }

    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the first `window` values
pub fn head_mean(values: &[f64], window: usize) -> Result<f64> {
    check_window(values, window)?;
    mean(&values[..window])
}

/// Mean of the last `window` values
pub fn tail_mean(values: &[f64], window: usize) -> Result<f64> {
    check_window(values, window)?;
    mean(&values[values.len() - window..])
}

fn check_window(values: &[f64], window: usize) -> Result<()> {
    if window == 0 {
        return Err(MathError::InvalidInput(
            "Window must be greater than zero".to_string(),
        ));
    }
    if values.len() < window {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} values, have {}",
            window,
            values.len()
        )));
    }
    Ok(())
}

/// Reject series the smoothing recursions cannot handle
///
/// Values must be finite and their sum of squares must be representable.
pub fn check_series(values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::CalculationError(
            "Series contains non-finite values".to_string(),
        ));
    }
    if !values.iter().map(|v| v * v).sum::<f64>().is_finite() {
        return Err(MathError::CalculationError(
            "Series magnitude overflows the squared-error objective".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]).unwrap() - 2.5).abs() < 1e-12);
        assert!(mean(&[]).is_err());
    }

    #[test]
    fn test_head_and_tail_mean() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert!((head_mean(&values, 3).unwrap() - 20.0).abs() < 1e-12);
        assert!((tail_mean(&values, 3).unwrap() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_validation() {
        let values = [1.0, 2.0];
        assert!(matches!(
            head_mean(&values, 3),
            Err(MathError::InsufficientData(_))
        ));
        assert!(matches!(
            tail_mean(&values, 0),
            Err(MathError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_series() {
        assert!(check_series(&[45.0, 60.0, 80.0]).is_ok());
        assert!(check_series(&[]).is_ok());
        assert!(matches!(
            check_series(&[1.0, f64::NAN, 3.0]),
            Err(MathError::CalculationError(_))
        ));
        assert!(matches!(
            check_series(&[1e200, 0.0, 1e200]),
            Err(MathError::CalculationError(_))
        ));
    }
}
