//! Short-horizon AQI forecasting
//!
//! Wraps [`HoltWintersModel`] with the input checks and the seasonal-period
//! policy used for AQI series.

use crate::data::AqiHistory;
use crate::error::{AdvisorError, Result};
use crate::models::ets::EtsModel;
use crate::models::holt_winters::HoltWintersModel;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use aqi_math::statistics::check_series;
use tracing::{debug, info, warn};

/// Minimum number of history points before forecasting is attempted
pub const MIN_HISTORY_POINTS: usize = 5;

/// History length that enables a yearly (365-step) seasonal component
pub const YEARLY_SEASON_MIN_POINTS: usize = 730;

/// History length that enables a monthly (30-step) seasonal component
pub const MONTHLY_SEASON_MIN_POINTS: usize = 30;

/// Seasonal period for a daily series of `len` points
///
/// Two years of data or more uses a yearly cycle, a month or more uses a
/// 30-day cycle, anything shorter is fitted without seasonality.
pub fn select_seasonal_period(len: usize) -> Option<usize> {
    if len >= YEARLY_SEASON_MIN_POINTS {
        Some(365)
    } else if len >= MONTHLY_SEASON_MIN_POINTS {
        Some(30)
    } else {
        None
    }
}

/// Fits a smoothing model to a history and extends it by a number of steps
#[derive(Debug, Clone)]
pub struct TimeSeriesForecaster {
    confidence_level: f64,
}

impl Default for TimeSeriesForecaster {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
        }
    }
}

impl TimeSeriesForecaster {
    /// Create a forecaster reporting prediction intervals at `confidence_level`
    pub fn new(confidence_level: f64) -> Result<Self> {
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(AdvisorError::InvalidParameter(
                "Confidence level must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self { confidence_level })
    }

    /// Get the prediction interval confidence level
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Forecast `horizon` values following `history`
    ///
    /// A seasonal component is fitted only when `seasonal_periods` is given
    /// and the history covers at least two full cycles; otherwise the model
    /// is trend-only.
    pub fn forecast(
        &self,
        history: &[f64],
        horizon: usize,
        seasonal_periods: Option<usize>,
    ) -> Result<ForecastResult> {
        if history.len() < MIN_HISTORY_POINTS {
            return Err(AdvisorError::InsufficientData(format!(
                "Need at least {} AQI data points for forecasting, got {}",
                MIN_HISTORY_POINTS,
                history.len()
            )));
        }
        if horizon == 0 {
            return Err(AdvisorError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }

        check_series(history)?;

        let trained: Box<dyn TrainedForecastModel> = match seasonal_periods {
            Some(period) if period < 2 => {
                return Err(AdvisorError::InvalidParameter(format!(
                    "Seasonal period must be at least 2, got {}",
                    period
                )));
            }
            Some(period) if history.len() >= 2 * period => {
                let model = HoltWintersModel::seasonal(period)?;
                debug!(model = model.name(), horizon, points = history.len(), "forecasting");
                Box::new(model.train(history)?)
            }
            Some(period) => {
                warn!(
                    period,
                    points = history.len(),
                    "history shorter than two seasonal cycles, fitting trend only"
                );
                self.train_trend_only(history)?
            }
            None => self.train_trend_only(history)?,
        };

        trained.forecast_with_intervals(horizon, self.confidence_level)
    }

    /// ETS(A,A,N) via `augurs`, or the grid-searched Holt model when it cannot fit
    fn train_trend_only(&self, history: &[f64]) -> Result<Box<dyn TrainedForecastModel>> {
        let ets = EtsModel::additive_trend();
        debug!(model = ets.name(), points = history.len(), "forecasting");

        match ets.train(history) {
            Ok(trained) => Ok(Box::new(trained)),
            Err(err) => {
                info!(error = %err, "ETS fit failed, using grid-searched Holt coefficients");
                Ok(Box::new(HoltWintersModel::trend_only().train(history)?))
            }
        }
    }

    /// Forecast a possibly dated history, labelling the result with dates when available
    pub fn forecast_history(
        &self,
        history: &AqiHistory,
        horizon: usize,
        seasonal_periods: Option<usize>,
    ) -> Result<ForecastResult> {
        let forecast = self.forecast(history.values(), horizon, seasonal_periods)?;

        match history.last_date() {
            Some(last) => forecast.with_dates_after(last),
            None => Ok(forecast),
        }
    }
}
