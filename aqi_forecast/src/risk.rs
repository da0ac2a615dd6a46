//! Health risk categories for AQI values
//!
//! The breakpoints follow the US EPA AQI bands. The table is versioned so
//! that reports can state which breakpoints produced a category.

use serde::Serialize;
use std::fmt;

/// Health risk category, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl RiskCategory {
    /// All categories in ascending severity
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Good,
        RiskCategory::Moderate,
        RiskCategory::UnhealthyForSensitiveGroups,
        RiskCategory::Unhealthy,
        RiskCategory::VeryUnhealthy,
        RiskCategory::Hazardous,
    ];

    /// Severity rank, 0 (Good) to 5 (Hazardous)
    pub fn severity(&self) -> u8 {
        *self as u8
    }

    /// Category name
    pub fn label(&self) -> &'static str {
        match self {
            RiskCategory::Good => "Good",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            RiskCategory::Unhealthy => "Unhealthy",
            RiskCategory::VeryUnhealthy => "Very Unhealthy",
            RiskCategory::Hazardous => "Hazardous",
        }
    }

    /// Severity marker
    pub fn marker(&self) -> &'static str {
        match self {
            RiskCategory::Good => "🟢",
            RiskCategory::Moderate => "🟡",
            RiskCategory::UnhealthyForSensitiveGroups => "🟠",
            RiskCategory::Unhealthy => "🔴",
            RiskCategory::VeryUnhealthy => "⚠️",
            RiskCategory::Hazardous => "☠️",
        }
    }

    /// Guidance for the category
    pub fn guidance(&self) -> &'static str {
        match self {
            RiskCategory::Good => "Air quality is safe.",
            RiskCategory::Moderate => {
                "Acceptable, but unusually sensitive people should limit prolonged exertion."
            }
            RiskCategory::UnhealthyForSensitiveGroups => {
                "Sensitive groups at risk, reduce prolonged outdoor exertion."
            }
            RiskCategory::Unhealthy => "Everyone may experience health effects, limit time outdoors.",
            RiskCategory::VeryUnhealthy => "Avoid outdoor activities.",
            RiskCategory::Hazardous => "Stay indoors, use air purifiers & masks!",
        }
    }

    /// Full human-readable message: marker, label and guidance
    pub fn message(&self) -> String {
        format!("{} {} - {}", self.marker(), self.label(), self.guidance())
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Upper AQI bounds (inclusive) for every category but the last
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    version: &'static str,
    upper_bounds: [f64; 5],
}

impl ThresholdTable {
    /// US EPA bands: 0-50, 51-100, 101-150, 151-200, 201-300, above 300
    pub const US_EPA: ThresholdTable = ThresholdTable {
        version: "us-epa-2024",
        upper_bounds: [50.0, 100.0, 150.0, 200.0, 300.0],
    };

    /// Version tag of the breakpoints
    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Inclusive upper bound of `category`, `None` for the open-ended top band
    pub fn upper_bound(&self, category: RiskCategory) -> Option<f64> {
        self.upper_bounds.get(category.severity() as usize).copied()
    }

    /// Category for `aqi`; negative and NaN values fall into the lowest band
    pub fn classify(&self, aqi: f64) -> RiskCategory {
        if aqi.is_nan() {
            return RiskCategory::Good;
        }

        self.upper_bounds
            .iter()
            .position(|bound| aqi <= *bound)
            .map(|idx| RiskCategory::ALL[idx])
            .unwrap_or(RiskCategory::Hazardous)
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::US_EPA
    }
}

/// Classify `aqi` with the canonical table
pub fn classify(aqi: f64) -> RiskCategory {
    ThresholdTable::US_EPA.classify(aqi)
}
