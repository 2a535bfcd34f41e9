use crate::forecast::{ConfidenceInterval, ForecastError};
use crate::history::DailyUsage;

/// Raw model output: one point prediction and one interval per future day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelOutput {
    pub predictions: Vec<f64>,
    pub confidence_intervals: Vec<ConfidenceInterval>,
}

/// A usage forecasting model.
///
/// Models consume an already preprocessed daily series (see
/// [`crate::preprocess_daily`]) and must not perform IO; inputs are provided
/// by callers (infra/services).
pub trait ForecastModel: Send + Sync + 'static {
    /// Stable model name (logged alongside each forecast).
    fn name(&self) -> &'static str;

    /// Predict usage for the `horizon_days` days following the history.
    fn predict(&self, history: &[DailyUsage], horizon_days: usize) -> Result<ModelOutput, ForecastError>;
}
