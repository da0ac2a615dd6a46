//! End-to-end run: validate, forecast, classify, advise, report
//!
//! Stages run strictly in order and the first error ends the run. Advisory
//! failures are not errors here; they are carried inside the report.

use crate::advisory::{AdvisoryRequester, PromptFacts};
use crate::config::MonitorConfig;
use crate::data::{parse_query_date, AqiDataset, AqiHistory, DailyRecord};
use crate::error::{AdvisorError, Result};
use crate::forecaster::{select_seasonal_period, TimeSeriesForecaster, MIN_HISTORY_POINTS};
use crate::report::AdvisoryReport;
use crate::risk::ThresholdTable;
use crate::trend::classify_trend;
use std::fmt;
use tracing::{debug, info, warn};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lookup,
    Validate,
    Forecast,
    Classify,
    Advise,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lookup => "lookup",
            Stage::Validate => "validate",
            Stage::Forecast => "forecast",
            Stage::Classify => "classify",
            Stage::Advise => "advise",
            Stage::Report => "report",
        };
        f.write_str(name)
    }
}

fn stage<T>(stage: Stage, run: impl FnOnce() -> Result<T>) -> Result<T> {
    debug!(%stage, "entering stage");
    run().map_err(|err| {
        warn!(%stage, error = %err, "pipeline failed");
        err
    })
}

/// Forecasting and advisory pipeline
#[derive(Debug)]
pub struct Pipeline {
    forecaster: TimeSeriesForecaster,
    requester: AdvisoryRequester,
    risk_table: ThresholdTable,
    horizon: usize,
    dated_horizon: usize,
}

impl Pipeline {
    /// Pipeline with default horizons (3 steps, 14 days for dated queries)
    pub fn new(forecaster: TimeSeriesForecaster, requester: AdvisoryRequester) -> Self {
        Self {
            forecaster,
            requester,
            risk_table: ThresholdTable::US_EPA,
            horizon: 3,
            dated_horizon: 14,
        }
    }

    /// Pipeline wired from configuration
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        let forecaster = TimeSeriesForecaster::new(config.forecast.confidence_level)?;
        let requester = AdvisoryRequester::from_config(&config.advisory)?;

        Ok(Self {
            forecaster,
            requester,
            risk_table: ThresholdTable::US_EPA,
            horizon: config.forecast.horizon,
            dated_horizon: config.forecast.dated_horizon,
        })
    }

    /// Use `horizon` for both undated and dated runs
    pub fn with_horizon(mut self, horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(AdvisorError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }
        self.horizon = horizon;
        self.dated_horizon = horizon;
        Ok(self)
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn dated_horizon(&self) -> usize {
        self.dated_horizon
    }

    /// Run on a plain history; the model is trend-only
    pub fn run(&self, history: &AqiHistory) -> Result<AdvisoryReport> {
        info!(points = history.len(), horizon = self.horizon, "running forecast pipeline");
        self.execute(history, self.horizon, None, None)
    }

    /// Run on the dataset history up to and including `date` (`YYYY-MM-DD`)
    pub fn run_for_date(&self, dataset: &AqiDataset, date: &str) -> Result<AdvisoryReport> {
        let (record, history) = stage(Stage::Lookup, || {
            let date = parse_query_date(date)?;
            let record = dataset.lookup(date)?;
            Ok((record, dataset.history_through(date)?))
        })?;

        let period = select_seasonal_period(history.len());
        info!(
            date = %record.date,
            points = history.len(),
            seasonal_period = ?period,
            horizon = self.dated_horizon,
            "running dated forecast pipeline"
        );

        let report = self.execute(&history, self.dated_horizon, period, Some(record))?;
        Ok(report.with_query_date(record.date))
    }

    fn execute(
        &self,
        history: &AqiHistory,
        horizon: usize,
        seasonal_periods: Option<usize>,
        record: Option<&DailyRecord>,
    ) -> Result<AdvisoryReport> {
        stage(Stage::Validate, || {
            if history.len() < MIN_HISTORY_POINTS {
                return Err(AdvisorError::InsufficientData(format!(
                    "Need at least {} AQI data points for forecasting, got {}",
                    MIN_HISTORY_POINTS,
                    history.len()
                )));
            }
            Ok(())
        })?;

        let forecast = stage(Stage::Forecast, || {
            self.forecaster
                .forecast_history(history, horizon, seasonal_periods)
        })?;

        let (trend, risk) = stage(Stage::Classify, || {
            let trend = classify_trend(history.values())?;
            let first = forecast.first().ok_or_else(|| {
                AdvisorError::Forecast("Forecast produced no values".to_string())
            })?;
            Ok((trend, self.risk_table.classify(first)))
        })?;

        let advisory = stage(Stage::Advise, || {
            let mut facts = PromptFacts::new(history.values(), forecast.values(), trend, risk);
            if let Some(record) = record {
                facts = facts.on_date(record.date, &record.pollutants);
            }
            Ok(self.requester.advise(&facts))
        })?;

        stage(Stage::Report, move || {
            Ok(AdvisoryReport::new(
                history.clone(),
                forecast,
                trend,
                risk,
                self.risk_table.version(),
                advisory,
            ))
        })
    }
}
