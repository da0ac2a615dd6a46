//! # Air Quality Workspace
//!
//! Umbrella crate for the AQI forecasting workspace.
//!
//! - [`math`]: exponential smoothing recursions and bounded parameter search
//! - [`forecast`]: AQI histories, forecasting, risk and trend classification,
//!   advisories and the end-to-end pipeline
//!
//! ## Example
//!
//! ```
//! use air_quality_workspace::forecast::{classify, RiskCategory};
//!
//! assert_eq!(classify(42.0), RiskCategory::Good);
//! assert_eq!(classify(175.0), RiskCategory::Unhealthy);
//! ```

pub use aqi_forecast as forecast;
pub use aqi_math as math;
