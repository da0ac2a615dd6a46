//! Additive Holt / Holt-Winters smoothing with coefficients found by grid and simplex search
//!
//! Used for seasonal models, and for trend-only series that `augurs` cannot fit.

use crate::error::{AdvisorError, Result};
use crate::models::{
    check_confidence_level, check_finite, FittedModel, ForecastModel, ForecastResult,
    TrainedForecastModel,
};
use aqi_math::forecasting::{HoltWinters, SmoothingFit, SmoothingParams};
use aqi_math::optimize::{grid_search, NelderMead};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

const ALPHA_GRID: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];
const BETA_GRID: [f64; 4] = [0.01, 0.1, 0.3, 0.5];
const GAMMA_GRID: [f64; 4] = [0.01, 0.1, 0.3, 0.5];

/// Additive-trend exponential smoothing, optionally with an additive seasonal component
///
/// The smoothing coefficients are not supplied by the caller: training
/// searches the unit box for the coefficients that minimise the in-sample
/// one-step-ahead squared error.
#[derive(Debug, Clone)]
pub struct HoltWintersModel {
    /// Name of the model
    name: String,
    /// Seasonal period, `None` for Holt's linear method
    seasonal_period: Option<usize>,
    /// Coefficient search
    search: NelderMead,
}

/// Trained Holt-Winters model
#[derive(Debug, Clone)]
pub struct TrainedHoltWinters {
    /// Name of the model
    name: String,
    /// Smoothing state after the last observation
    fit: SmoothingFit,
}

impl HoltWintersModel {
    /// Holt's linear method (trend only)
    pub fn trend_only() -> Self {
        Self {
            name: "Holt linear (additive trend)".to_string(),
            seasonal_period: None,
            search: NelderMead::default(),
        }
    }

    /// Additive Holt-Winters with the given seasonal period
    pub fn seasonal(period: usize) -> Result<Self> {
        if period < 2 {
            return Err(AdvisorError::InvalidParameter(
                "Seasonal period must be at least 2".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Holt-Winters (additive, period={})", period),
            seasonal_period: Some(period),
            search: NelderMead::default(),
        })
    }

    /// Get the seasonal period, if any
    pub fn seasonal_period(&self) -> Option<usize> {
        self.seasonal_period
    }

    fn params_from(point: &[f64]) -> aqi_math::Result<SmoothingParams> {
        SmoothingParams::new(point[0], point[1], point.get(2).copied().unwrap_or(0.0))
    }
}

impl ForecastModel for HoltWintersModel {
    type Trained = TrainedHoltWinters;

    fn train(&self, values: &[f64]) -> Result<Self::Trained> {
        let period = self.seasonal_period;

        // Data problems surface here rather than as an infinite objective
        let initial = SmoothingParams::new(0.5, 0.1, 0.1)?;
        HoltWinters::with_period(initial, period)?.fit(values)?;

        let objective = |point: &[f64]| -> f64 {
            Self::params_from(point)
                .and_then(|params| HoltWinters::with_period(params, period))
                .and_then(|model| model.fit(values))
                .map(|fit| fit.sse())
                .unwrap_or(f64::INFINITY)
        };

        let mut axes = vec![ALPHA_GRID.to_vec(), BETA_GRID.to_vec()];
        if period.is_some() {
            axes.push(GAMMA_GRID.to_vec());
        }
        let bounds = vec![(0.0, 1.0); axes.len()];

        let start = grid_search(objective, &axes)?;
        let best = self.search.minimize(objective, &start.point, &bounds)?;

        let params = Self::params_from(&best.point)?;
        let fit = HoltWinters::with_period(params, period)?.fit(values)?;

        debug!(
            model = %self.name,
            alpha = params.alpha,
            beta = params.beta,
            gamma = params.gamma,
            sse = fit.sse(),
            iterations = best.iterations,
            "fitted smoothing coefficients"
        );

        Ok(TrainedHoltWinters {
            name: self.name.clone(),
            fit,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedHoltWinters {
    /// Summary of the fitted coefficients and in-sample error
    pub fn summary(&self) -> FittedModel {
        let params = self.fit.params();
        let seasonal = self.fit.period().is_some();

        FittedModel {
            name: self.name.clone(),
            alpha: Some(params.alpha),
            beta: Some(params.beta),
            gamma: seasonal.then_some(params.gamma),
            seasonal_period: self.fit.period(),
            sse: self.fit.sse(),
            rmse: self.fit.residual_variance().sqrt(),
        }
    }
}

impl TrainedForecastModel for TrainedHoltWinters {
    fn forecast(&self, horizons: usize) -> Result<ForecastResult> {
        let values = self.fit.forecast(horizons);
        check_finite(&values)?;

        Ok(ForecastResult::new(values, horizons)?.with_model(self.summary()))
    }

    /// Forecast with symmetric normal prediction intervals at `confidence_level`
    fn forecast_with_intervals(
        &self,
        horizons: usize,
        confidence_level: f64,
    ) -> Result<ForecastResult> {
        check_confidence_level(confidence_level)?;

        let normal = Normal::new(0.0, 1.0).map_err(|e| AdvisorError::Forecast(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + confidence_level / 2.0);
        let sigma2 = self.fit.residual_variance();

        let forecast = self.forecast(horizons)?;
        let intervals = forecast
            .values()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let margin = z * (sigma2 * self.fit.variance_factor(i + 1)).sqrt();
                (v - margin, v + margin)
            })
            .collect();

        forecast.with_intervals(intervals)
    }

    fn fitted_values(&self) -> &[f64] {
        self.fit.fitted()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
