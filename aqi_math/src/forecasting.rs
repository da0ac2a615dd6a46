//! Additive exponential smoothing recursions
//!
//! Contains the two members of the Holt-Winters family used for AQI
//! forecasting:
//! - Holt's linear method (additive trend, no seasonality)
//! - Additive Holt-Winters (additive trend plus additive seasonality)
//!
//! Both are expressed by [`HoltWinters`]; the seasonal component is present
//! when a period is supplied.

use crate::statistics::{check_series, mean};
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Smoothing coefficients for the level, trend and seasonal equations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingParams {
    /// Level smoothing factor
    pub alpha: f64,
    /// Trend smoothing factor
    pub beta: f64,
    /// Seasonal smoothing factor (ignored without a seasonal period)
    pub gamma: f64,
}

impl SmoothingParams {
    /// Create a new set of coefficients, each within [0, 1]
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("Alpha", alpha), ("Beta", beta), ("Gamma", gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(MathError::InvalidInput(format!(
                    "{} must be between 0 and 1 (inclusive), got {}",
                    name, value
                )));
            }
        }

        Ok(Self { alpha, beta, gamma })
    }
}

/// Additive Holt-Winters model definition (coefficients and optional period)
#[derive(Debug, Clone)]
pub struct HoltWinters {
    params: SmoothingParams,
    period: Option<usize>,
}

/// State of a [`HoltWinters`] model after filtering a series
#[derive(Debug, Clone)]
pub struct SmoothingFit {
    params: SmoothingParams,
    period: Option<usize>,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    observations: usize,
    fitted: Vec<f64>,
    sse: f64,
}

impl HoltWinters {
    /// Holt's linear method
    pub fn linear(alpha: f64, beta: f64) -> Result<Self> {
        Ok(Self {
            params: SmoothingParams::new(alpha, beta, 0.0)?,
            period: None,
        })
    }

    /// Additive Holt-Winters with the given seasonal period
    pub fn seasonal(params: SmoothingParams, period: usize) -> Result<Self> {
        if period < 2 {
            return Err(MathError::InvalidInput(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            params,
            period: Some(period),
        })
    }

    /// Build from coefficients and an optional seasonal period
    pub fn with_period(params: SmoothingParams, period: Option<usize>) -> Result<Self> {
        match period {
            Some(m) => Self::seasonal(params, m),
            None => Ok(Self {
                params,
                period: None,
            }),
        }
    }

    /// Minimum number of observations required to filter a series
    pub fn min_observations(&self) -> usize {
        match self.period {
            Some(m) => 2 * m,
            None => 2,
        }
    }

    /// Get the smoothing coefficients
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Get the seasonal period, if any
    pub fn period(&self) -> Option<usize> {
        self.period
    }

    /// Run the smoothing recursions over `values`, accumulating one-step-ahead errors
    pub fn fit(&self, values: &[f64]) -> Result<SmoothingFit> {
        if values.len() < self.min_observations() {
            return Err(MathError::InsufficientData(format!(
                "Need at least {} observations, have {}",
                self.min_observations(),
                values.len()
            )));
        }
        check_series(values)?;

        let SmoothingParams { alpha, beta, gamma } = self.params;

        let (mut level, mut trend, mut seasonals, start) = match self.period {
            None => (values[0], values[1] - values[0], Vec::new(), 1),
            Some(m) => {
                let (level, trend, seasonals) = seasonal_start(values, m)?;
                (level, trend, seasonals, m)
            }
        };

        let mut fitted = Vec::with_capacity(values.len() - start);
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate().skip(start) {
            let season = match self.period {
                Some(m) => seasonals[t % m],
                None => 0.0,
            };

            let prediction = level + trend + season;
            let error = y - prediction;
            sse += error * error;
            fitted.push(prediction);

            let prev_level = level;
            level = alpha * (y - season) + (1.0 - alpha) * (level + trend);
            trend = beta * (level - prev_level) + (1.0 - beta) * trend;

            if let Some(m) = self.period {
                seasonals[t % m] = gamma * (y - level) + (1.0 - gamma) * season;
            }
        }

        if !sse.is_finite() || !level.is_finite() || !trend.is_finite() {
            return Err(MathError::CalculationError(
                "Smoothing recursion diverged".to_string(),
            ));
        }

        Ok(SmoothingFit {
            params: self.params,
            period: self.period,
            level,
            trend,
            seasonals,
            observations: values.len(),
            fitted,
            sse,
        })
    }
}

/// Heuristic initial level, trend and seasonal indices from the first cycles
fn seasonal_start(values: &[f64], m: usize) -> Result<(f64, f64, Vec<f64>)> {
    let first_cycle = &values[..m];
    let level = mean(first_cycle)?;

    // Average change between the first two cycles, per step
    let trend = (0..m).map(|i| values[m + i] - values[i]).sum::<f64>() / (m * m) as f64;

    // The cycle mean sits at its midpoint; indices are measured against the
    // trend line and the level is carried forward to the last point of the cycle.
    let midpoint = (m as f64 - 1.0) / 2.0;
    let seasonals = first_cycle
        .iter()
        .enumerate()
        .map(|(i, v)| v - (level + trend * (i as f64 - midpoint)))
        .collect();

    Ok((level + trend * midpoint, trend, seasonals))
}

impl SmoothingFit {
    /// Forecast `horizon` steps past the last observation
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        (1..=horizon)
            .map(|h| {
                let season = match self.period {
                    Some(m) => self.seasonals[(self.observations + h - 1) % m],
                    None => 0.0,
                };
                self.level + h as f64 * self.trend + season
            })
            .collect()
    }

    /// Variance multiplier for the h-step-ahead forecast error
    ///
    /// Uses the closed forms for ETS(A,A,N) and ETS(A,A,A); multiply by the
    /// one-step residual variance to get the forecast variance.
    pub fn variance_factor(&self, h: usize) -> f64 {
        let SmoothingParams { alpha, beta, gamma } = self.params;
        let hf = h as f64;
        let mut factor = 1.0
            + (hf - 1.0)
                * (alpha * alpha
                    + alpha * beta * hf
                    + beta * beta * hf * (2.0 * hf - 1.0) / 6.0);

        if let Some(m) = self.period {
            let k = (h.saturating_sub(1) / m) as f64;
            factor += gamma * k * (2.0 * alpha + gamma + beta * m as f64 * (k + 1.0));
        }

        factor
    }

    /// Residual variance of the one-step-ahead errors
    pub fn residual_variance(&self) -> f64 {
        if self.fitted.is_empty() {
            return 0.0;
        }
        self.sse / self.fitted.len() as f64
    }

    /// Sum of squared one-step-ahead errors
    pub fn sse(&self) -> f64 {
        self.sse
    }

    /// One-step-ahead predictions for the filtered observations
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Get the final level
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Get the final trend
    pub fn trend(&self) -> f64 {
        self.trend
    }

    /// Get the final seasonal indices (empty without a period)
    pub fn seasonals(&self) -> &[f64] {
        &self.seasonals
    }

    /// Get the coefficients used for filtering
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Get the seasonal period, if any
    pub fn period(&self) -> Option<usize> {
        self.period
    }
}
