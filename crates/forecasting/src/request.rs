use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shelterflow_core::PairKey;

use crate::forecast::ForecastError;

/// Longest horizon a single request may ask for.
pub const MAX_HORIZON_DAYS: usize = 90;

/// Forecast request as received at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub shelter_id: String,
    pub item_id: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`, inclusive
    pub end_date: String,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub pair: PairKey,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ValidatedRequest {
    /// Number of days to forecast: the inclusive range length, capped.
    pub fn horizon_days(&self) -> usize {
        let days = (self.end_date - self.start_date).num_days() + 1;
        usize::try_from(days).unwrap_or(0).min(MAX_HORIZON_DAYS)
    }
}

impl ForecastRequest {
    pub fn validate(&self) -> Result<ValidatedRequest, ForecastError> {
        let pair = PairKey::parse(&self.shelter_id, &self.item_id)
            .map_err(|e| ForecastError::InvalidRequest(e.to_string()))?;

        let start_date = parse_date("start_date", &self.start_date)?;
        let end_date = parse_date("end_date", &self.end_date)?;

        if end_date < start_date {
            return Err(ForecastError::InvalidRequest(format!(
                "end_date {end_date} is before start_date {start_date}"
            )));
        }

        Ok(ValidatedRequest {
            pair,
            start_date,
            end_date,
        })
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ForecastError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ForecastError::InvalidRequest(format!("{field}: {e}")))
}
