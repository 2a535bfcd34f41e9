//! `shelterflow-forecasting`
//!
//! **Responsibility:** short-horizon usage forecasts with confidence bounds.
//!
//! This crate is storage-agnostic:
//! - history is handed in by callers (infra adapters);
//! - models implement [`ForecastModel`] and never perform IO;
//! - the output is an immutable [`Forecast`] value the procurement engine consumes.

pub mod forecast;
pub mod history;
pub mod model;
pub mod moving_average;
pub mod request;

pub use forecast::{ConfidenceInterval, Forecast, ForecastError};
pub use history::{DailyUsage, UsageSample, preprocess_daily};
pub use model::{ForecastModel, ModelOutput};
pub use moving_average::MovingAverageModel;
pub use request::{ForecastRequest, MAX_HORIZON_DAYS, ValidatedRequest};
