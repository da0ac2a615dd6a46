//! Trend direction of an AQI history

use crate::error::{AdvisorError, Result};
use aqi_math::statistics::{head_mean, tail_mean};
use serde::Serialize;
use std::fmt;

/// Number of points averaged at each end of the history
pub const TREND_WINDOW: usize = 3;

/// Direction of the AQI series; a rising AQI means worsening air
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Worsening,
    Improving,
}

impl TrendLabel {
    /// Short label
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Worsening => "worsening",
            TrendLabel::Improving => "improving",
        }
    }

    /// Human-readable description with direction marker
    pub fn description(&self) -> &'static str {
        match self {
            TrendLabel::Worsening => "increasing 📈 (worsening)",
            TrendLabel::Improving => "decreasing 📉 (improving)",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Compare the mean of the last three points with the mean of the first three
///
/// A strictly higher recent mean is `Worsening`; equal means are `Improving`.
pub fn classify_trend(history: &[f64]) -> Result<TrendLabel> {
    if history.len() < TREND_WINDOW {
        return Err(AdvisorError::InsufficientData(format!(
            "Need at least {} points to classify a trend, got {}",
            TREND_WINDOW,
            history.len()
        )));
    }

    let earlier = head_mean(history, TREND_WINDOW)?;
    let recent = tail_mean(history, TREND_WINDOW)?;

    Ok(if recent > earlier {
        TrendLabel::Worsening
    } else {
        TrendLabel::Improving
    })
}
