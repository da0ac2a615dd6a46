//! Holt's linear method as an ETS(A,A,N) model fitted by `augurs`

use crate::error::{AdvisorError, Result};
use crate::models::{
    check_confidence_level, check_finite, FittedModel, ForecastModel, ForecastResult,
    TrainedForecastModel,
};
use augurs::ets::{AutoETS, FittedAutoETS};
use augurs::prelude::*;
use std::fmt;
use tracing::debug;

/// Additive errors, additive trend, no seasonal component
pub const ADDITIVE_TREND_SPEC: &str = "AAN";

/// Trend-only exponential smoothing estimated by maximum likelihood
#[derive(Debug, Clone)]
pub struct EtsModel {
    name: String,
    spec: &'static str,
}

/// ETS model after fitting
pub struct TrainedEts {
    name: String,
    model: FittedAutoETS,
    fitted: Vec<f64>,
    sse: f64,
}

impl EtsModel {
    /// ETS(A,A,N), the state-space form of Holt's linear method
    pub fn additive_trend() -> Self {
        Self {
            name: "ETS(A,A,N)".to_string(),
            spec: ADDITIVE_TREND_SPEC,
        }
    }
}

impl Default for EtsModel {
    fn default() -> Self {
        Self::additive_trend()
    }
}

impl ForecastModel for EtsModel {
    type Trained = TrainedEts;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let auto = AutoETS::new(1, self.spec)
            .map_err(|e| AdvisorError::Forecast(format!("ETS init: {}", e)))?;

        let model = auto
            .fit(values)
            .map_err(|e| AdvisorError::Forecast(format!("ETS fit: {}", e)))?;

        let fitted = model
            .predict_in_sample(None::<f64>)
            .map_err(|e| AdvisorError::Forecast(format!("ETS in-sample predict: {}", e)))?
            .point;
        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(AdvisorError::Forecast(
                "ETS fit produced non-finite in-sample values".to_string(),
            ));
        }

        let sse = values
            .iter()
            .zip(&fitted)
            .map(|(y, f)| (y - f) * (y - f))
            .sum::<f64>();

        debug!(model = %self.name, points = values.len(), sse, "fitted ETS model");

        Ok(TrainedEts {
            name: self.name.clone(),
            model,
            fitted,
            sse,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedEts {
    /// In-sample error of the fitted model
    pub fn summary(&self) -> FittedModel {
        let rmse = if self.fitted.is_empty() {
            0.0
        } else {
            (self.sse / self.fitted.len() as f64).sqrt()
        };

        FittedModel {
            name: self.name.clone(),
            alpha: None,
            beta: None,
            gamma: None,
            seasonal_period: None,
            sse: self.sse,
            rmse,
        }
    }
}

impl fmt::Debug for TrainedEts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainedEts")
            .field("name", &self.name)
            .field("observations", &self.fitted.len())
            .field("sse", &self.sse)
            .finish()
    }
}

impl TrainedForecastModel for TrainedEts {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        let values = self
            .model
            .predict(horizons, None::<f64>)
            .map_err(|e| AdvisorError::Forecast(format!("ETS predict: {}", e)))?
            .point;
        check_finite(&values)?;

        Ok(ForecastResult::new(values, horizons)?.with_model(self.summary()))
    }

    fn forecast_with_intervals(
        &self,
        horizons: usize,
        confidence_level: f64,
    ) -> Result<ForecastResult> {
        check_confidence_level(confidence_level)?;

        let forecast = self
            .model
            .predict(horizons, confidence_level)
            .map_err(|e| AdvisorError::Forecast(format!("ETS predict: {}", e)))?;
        check_finite(&forecast.point)?;

        let bounds = forecast.intervals.ok_or_else(|| {
            AdvisorError::Forecast("ETS forecast carried no prediction intervals".to_string())
        })?;
        let intervals: Vec<(f64, f64)> = bounds.lower.into_iter().zip(bounds.upper).collect();

        ForecastResult::new(forecast.point, horizons)?
            .with_intervals(intervals)
            .map(|result| result.with_model(self.summary()))
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn name(&self) -> &str {
        &self.name
    }
}
