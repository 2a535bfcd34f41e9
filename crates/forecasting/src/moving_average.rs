use crate::forecast::{ConfidenceInterval, ForecastError};
use crate::history::DailyUsage;
use crate::model::{ForecastModel, ModelOutput};

/// Deterministic baseline model.
///
/// Model:
/// - Take the most recent `window` daily values.
/// - Predict their mean for every day of the horizon.
/// - Bound each prediction by `mean ± z * stddev` (sample stddev of the window),
///   with the lower bound floored at zero since usage cannot be negative.
#[derive(Debug, Clone)]
pub struct MovingAverageModel {
    /// Number of trailing days used as the baseline (must be >= 1).
    window: usize,
    /// Interval width in standard deviations (e.g. 1.96 for ~95%).
    z: f64,
}

impl Default for MovingAverageModel {
    fn default() -> Self {
        Self {
            window: 30,
            z: 1.96,
        }
    }
}

impl MovingAverageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
}

impl ForecastModel for MovingAverageModel {
    fn name(&self) -> &'static str {
        "moving_average"
    }

    fn predict(&self, history: &[DailyUsage], horizon_days: usize) -> Result<ModelOutput, ForecastError> {
        if self.window == 0 {
            return Err(ForecastError::ModelFailed("window must be >= 1".to_string()));
        }

        if !(self.z.is_finite() && self.z >= 0.0) {
            return Err(ForecastError::ModelFailed(
                "z must be a finite non-negative number".to_string(),
            ));
        }

        if history.is_empty() {
            return Err(ForecastError::InsufficientHistory(
                "no daily usage to average".to_string(),
            ));
        }

        let start = history.len().saturating_sub(self.window);
        let baseline: Vec<f64> = history[start..].iter().map(|d| d.usage).collect();

        let mean = mean(&baseline);
        let band = self.z * stddev_sample(&baseline, mean);
        let interval = ConfidenceInterval::new((mean - band).max(0.0), mean + band);

        Ok(ModelOutput {
            predictions: vec![mean; horizon_days],
            confidence_intervals: vec![interval; horizon_days],
        })
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Sample standard deviation (n-1); zero for fewer than two values.
fn stddev_sample(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / ((xs.len() - 1) as f64);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(values: &[f64]) -> Vec<DailyUsage> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyUsage {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                usage: *v,
            })
            .collect()
    }

    #[test]
    fn constant_history_has_zero_width_bounds() {
        let out = MovingAverageModel::new()
            .predict(&series(&[100.0; 10]), 7)
            .unwrap();

        assert_eq!(out.predictions, vec![100.0; 7]);
        assert!(out
            .confidence_intervals
            .iter()
            .all(|ci| ci.lower == 100.0 && ci.upper == 100.0));
    }

    #[test]
    fn only_the_trailing_window_is_used() {
        let mut values = vec![1000.0; 5];
        values.extend([10.0, 20.0, 30.0]);

        let out = MovingAverageModel::new()
            .with_window(3)
            .with_z(1.0)
            .predict(&series(&values), 2)
            .unwrap();

        assert_eq!(out.predictions, vec![20.0, 20.0]);
        let ci = out.confidence_intervals[0];
        assert!((ci.lower - 10.0).abs() < 1e-9);
        assert!((ci.upper - 30.0).abs() < 1e-9);
    }

    #[test]
    fn lower_bound_is_floored_at_zero() {
        let out = MovingAverageModel::new()
            .with_z(10.0)
            .predict(&series(&[0.0, 10.0, 0.0, 10.0]), 1)
            .unwrap();
        assert_eq!(out.confidence_intervals[0].lower, 0.0);
    }

    #[test]
    fn empty_history_is_insufficient() {
        let err = MovingAverageModel::new().predict(&[], 7).unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientHistory(_)));
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = MovingAverageModel::new()
            .with_window(0)
            .predict(&series(&[1.0]), 7)
            .unwrap_err();
        assert!(matches!(err, ForecastError::ModelFailed(_)));
    }
}
