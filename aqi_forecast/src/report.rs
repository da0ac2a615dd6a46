//! Final output of a pipeline run

use crate::advisory::Advisory;
use crate::data::AqiHistory;
use crate::error::{AdvisorError, Result};
use crate::models::ForecastResult;
use crate::risk::RiskCategory;
use crate::trend::TrendLabel;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Everything a run produced, from input history to advisory text
#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    query_date: Option<NaiveDate>,
    history: AqiHistory,
    forecast: ForecastResult,
    trend: TrendLabel,
    risk: RiskCategory,
    risk_message: String,
    risk_table_version: &'static str,
    advisory: Advisory,
}

impl AdvisoryReport {
    pub fn new(
        history: AqiHistory,
        forecast: ForecastResult,
        trend: TrendLabel,
        risk: RiskCategory,
        risk_table_version: &'static str,
        advisory: Advisory,
    ) -> Self {
        Self {
            query_date: None,
            history,
            forecast,
            trend,
            risk,
            risk_message: risk.message(),
            risk_table_version,
            advisory,
        }
    }

    /// Record the dataset date the run was anchored on
    pub fn with_query_date(mut self, date: NaiveDate) -> Self {
        self.query_date = Some(date);
        self
    }

    pub fn query_date(&self) -> Option<NaiveDate> {
        self.query_date
    }

    pub fn history(&self) -> &AqiHistory {
        &self.history
    }

    pub fn forecast(&self) -> &ForecastResult {
        &self.forecast
    }

    pub fn trend(&self) -> TrendLabel {
        self.trend
    }

    /// Risk category of the first forecasted value
    pub fn risk(&self) -> RiskCategory {
        self.risk
    }

    pub fn risk_table_version(&self) -> &'static str {
        self.risk_table_version
    }

    pub fn advisory(&self) -> &Advisory {
        &self.advisory
    }

    pub fn recommendation(&self) -> &str {
        &self.advisory.recommendation
    }

    pub fn explanation(&self) -> &str {
        &self.advisory.explanation
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AdvisorError::DataError(e.to_string()))
    }

    fn write_forecast_table(&self, f: &mut fmt::Formatter<'_>, dates: &[NaiveDate]) -> fmt::Result {
        writeln!(f)?;
        writeln!(
            f,
            "{:<12} {:>13} {:>10} {:>10}",
            "Date", "Forecast AQI", "Lower", "Upper"
        )?;

        let intervals = self.forecast.intervals();
        for (i, (date, value)) in dates.iter().zip(self.forecast.values()).enumerate() {
            match intervals.and_then(|iv| iv.get(i)) {
                Some((lower, upper)) => writeln!(
                    f,
                    "{:<12} {:>13.2} {:>10.2} {:>10.2}",
                    date.to_string(),
                    value,
                    lower,
                    upper
                )?,
                None => writeln!(f, "{:<12} {:>13.2}", date.to_string(), value)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for AdvisoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let predictions: Vec<String> = self
            .forecast
            .values()
            .iter()
            .map(|v| format!("{:.2}", v))
            .collect();

        writeln!(f, "🌍 Air Quality Forecast & Health Insights")?;
        writeln!(f, "{}", "-".repeat(50))?;
        if let Some(date) = self.query_date {
            writeln!(f, "Query Date           : {}", date)?;
        }
        writeln!(
            f,
            "Next {} AQI Predictions: {}",
            self.forecast.horizons(),
            predictions.join(", ")
        )?;
        writeln!(f, "Trend                : {}", self.trend)?;
        writeln!(f, "Health Risk          : {}", self.risk_message)?;

        if let Some(dates) = self.forecast.dates() {
            self.write_forecast_table(f, dates)?;
        }

        writeln!(f)?;
        writeln!(f, "🤖 AI Recommendation:")?;
        writeln!(f, "{}", self.advisory.recommendation)?;
        writeln!(f)?;
        writeln!(f, "AI Explanation:")?;
        write!(f, "{}", self.advisory.explanation)
    }
}
