//! # AQI Forecast
//!
//! Short-horizon Air Quality Index forecasting with health risk
//! classification and natural-language advisories.
//!
//! ## Features
//!
//! - AQI histories from comma-separated input or dated pollutant CSV datasets
//! - Holt's linear / additive Holt-Winters forecasting with fitted coefficients
//! - Trend direction from the first and last three observations
//! - Health risk categories on the US EPA AQI bands
//! - Advisories from a text-generation service (Gemini or Ollama), degrading
//!   to sentinel text when the service is unavailable
//!
//! ## Quick Start
//!
//! ```rust
//! use aqi_forecast::advisory::DisabledGenerator;
//! use aqi_forecast::{AdvisoryRequester, AqiHistory, Pipeline, RiskCategory, TimeSeriesForecaster};
//!
//! let history = AqiHistory::parse("45, 60, 80, 120, 200")?;
//!
//! let pipeline = Pipeline::new(
//!     TimeSeriesForecaster::default(),
//!     AdvisoryRequester::new(Box::new(DisabledGenerator)),
//! );
//!
//! let report = pipeline.run(&history)?;
//! assert_eq!(report.forecast().values().len(), 3);
//! assert!(report.risk() >= RiskCategory::Good);
//! println!("{}", report);
//! # Ok::<(), aqi_forecast::AdvisorError>(())
//! ```

pub mod advisory;
pub mod config;
pub mod data;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod trend;

// Re-export commonly used types
pub use crate::advisory::{parse_advisory, Advisory, AdvisoryRequester, TextGenerator};
pub use crate::config::MonitorConfig;
pub use crate::data::{AqiDataset, AqiHistory, DatasetLoader};
pub use crate::error::{AdvisorError, AdvisoryError};
pub use crate::forecaster::TimeSeriesForecaster;
pub use crate::models::ForecastResult;
pub use crate::pipeline::Pipeline;
pub use crate::report::AdvisoryReport;
pub use crate::risk::{classify, RiskCategory};
pub use crate::trend::{classify_trend, TrendLabel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
