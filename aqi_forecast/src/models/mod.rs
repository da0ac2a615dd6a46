//! Forecasting models for AQI time series

use crate::error::{AdvisorError, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt::Debug;

/// Summary of a fitted smoothing model
///
/// Coefficients are reported when the in-crate search estimated them;
/// models fitted by `augurs` only report their in-sample error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    /// Name of the model
    pub name: String,
    /// Level smoothing factor
    pub alpha: Option<f64>,
    /// Trend smoothing factor
    pub beta: Option<f64>,
    /// Seasonal smoothing factor, when a seasonal component was fitted
    pub gamma: Option<f64>,
    /// Seasonal period, when a seasonal component was fitted
    pub seasonal_period: Option<usize>,
    /// In-sample sum of squared one-step-ahead errors
    pub sse: f64,
    /// In-sample root mean squared one-step-ahead error
    pub rmse: f64,
}

/// Forecast result containing predicted values
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
    /// Prediction intervals (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    intervals: Option<Vec<(f64, f64)>>,
    /// Calendar dates of the forecasted periods (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    dates: Option<Vec<NaiveDate>>,
    /// Model that produced the forecast (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<FittedModel>,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(AdvisorError::Forecast(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self {
            values,
            horizons,
            intervals: None,
            dates: None,
            model: None,
        })
    }

    /// Attach prediction intervals, one `(lower, upper)` pair per value
    pub fn with_intervals(mut self, intervals: Vec<(f64, f64)>) -> Result<Self> {
        if self.values.len() != intervals.len() {
            return Err(AdvisorError::Forecast(format!(
                "Values length ({}) doesn't match intervals length ({})",
                self.values.len(),
                intervals.len()
            )));
        }

        self.intervals = Some(intervals);
        Ok(self)
    }

    /// Label the forecast with consecutive days following `last_observed`
    pub fn with_dates_after(mut self, last_observed: NaiveDate) -> Result<Self> {
        let dates = (1..=self.horizons as u64)
            .map(|step| {
                last_observed.checked_add_days(Days::new(step)).ok_or_else(|| {
                    AdvisorError::Forecast(format!(
                        "Forecast date {} days after {} is out of range",
                        step, last_observed
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.dates = Some(dates);
        Ok(self)
    }

    /// Attach the summary of the model that produced the forecast
    pub fn with_model(mut self, model: FittedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the first forecasted value
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }

    /// Get the prediction intervals, if available
    pub fn intervals(&self) -> Option<&[(f64, f64)]> {
        self.intervals.as_deref()
    }

    /// Get the forecast dates, if available
    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    /// Get the fitted model summary, if available
    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| AdvisorError::DataError(e.to_string()))
    }
}

/// Check that a prediction interval coverage lies in (0, 1)
pub fn check_confidence_level(confidence_level: f64) -> Result<()> {
    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(AdvisorError::InvalidParameter(
            "Confidence level must be between 0 and 1".to_string(),
        ));
    }
    Ok(())
}

/// Reject forecasts containing non-finite values
fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AdvisorError::Forecast(
            "Model produced non-finite forecast values".to_string(),
        ));
    }
    Ok(())
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizons: usize) -> Result<ForecastResult>;

    /// Forecast with prediction intervals at `confidence_level`
    fn forecast_with_intervals(
        &self,
        horizons: usize,
        confidence_level: f64,
    ) -> Result<ForecastResult>;

    /// One-step-ahead predictions over the training data
    fn fitted_values(&self) -> &[f64];

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a series of observations
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the observations
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod ets;
pub mod holt_winters;
