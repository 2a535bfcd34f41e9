use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelterflow_core::{ItemId, LocationId, PairKey, ValueObject};

/// Lower/upper bound around a single point prediction.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }
}

/// Predicted daily usage for one location+item pair.
///
/// Produced once per request and immutable afterwards. An empty prediction
/// sequence is a valid forecast; consumers treat it as "no information".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForecastRecord", into = "ForecastRecord")]
pub struct Forecast {
    pair: PairKey,
    predictions: Vec<f64>,
    confidence_intervals: Vec<ConfidenceInterval>,
    generated_at: DateTime<Utc>,
}

impl ValueObject for Forecast {}

impl Forecast {
    /// Build a forecast; every prediction must carry exactly one interval.
    pub fn new(
        pair: PairKey,
        predictions: Vec<f64>,
        confidence_intervals: Vec<ConfidenceInterval>,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ForecastError> {
        if predictions.len() != confidence_intervals.len() {
            return Err(ForecastError::InvalidForecast(format!(
                "{} predictions but {} confidence intervals",
                predictions.len(),
                confidence_intervals.len()
            )));
        }
        Ok(Self {
            pair,
            predictions,
            confidence_intervals,
            generated_at,
        })
    }

    /// A forecast that carries no predictions.
    pub fn empty(pair: PairKey, generated_at: DateTime<Utc>) -> Self {
        Self {
            pair,
            predictions: Vec::new(),
            confidence_intervals: Vec::new(),
            generated_at,
        }
    }

    pub fn pair(&self) -> &PairKey {
        &self.pair
    }

    pub fn location_id(&self) -> &LocationId {
        &self.pair.location_id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.pair.item_id
    }

    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    pub fn confidence_intervals(&self) -> &[ConfidenceInterval] {
        &self.confidence_intervals
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// JSON shape of a stored/returned forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ForecastRecord {
    shelter_id: LocationId,
    item_id: ItemId,
    predictions: Vec<f64>,
    confidence_intervals: Vec<ConfidenceInterval>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<ForecastRecord> for Forecast {
    type Error = ForecastError;

    fn try_from(r: ForecastRecord) -> Result<Self, Self::Error> {
        Forecast::new(
            PairKey::new(r.shelter_id, r.item_id),
            r.predictions,
            r.confidence_intervals,
            r.timestamp,
        )
    }
}

impl From<Forecast> for ForecastRecord {
    fn from(f: Forecast) -> Self {
        Self {
            shelter_id: f.pair.location_id,
            item_id: f.pair.item_id,
            predictions: f.predictions,
            confidence_intervals: f.confidence_intervals,
            timestamp: f.generated_at,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("invalid forecast request: {0}")]
    InvalidRequest(String),

    #[error("invalid forecast: {0}")]
    InvalidForecast(String),

    #[error("insufficient history for {0}")]
    InsufficientHistory(String),

    #[error("model failed: {0}")]
    ModelFailed(String),
}
