use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelterflow_core::PairKey;
use shelterflow_forecasting::UsageSample;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

/// `?shelter_id=...&item_id=...`
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    pub shelter_id: String,
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UsageSampleDto {
    pub timestamp: DateTime<Utc>,
    pub usage: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecordUsageRequest {
    pub shelter_id: String,
    pub item_id: String,
    pub samples: Vec<UsageSampleDto>,
}

impl RecordUsageRequest {
    pub fn samples(&self) -> impl Iterator<Item = UsageSample> + '_ {
        self.samples.iter().map(|s| UsageSample::new(s.timestamp, s.usage))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordInventoryRequest {
    pub shelter_id: String,
    pub item_id: String,
    pub inventory_level: f64,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UsageAccepted {
    pub shelter_id: String,
    pub item_id: String,
    pub accepted: usize,
}

// -------------------------
// Mapping helpers
// -------------------------

pub fn parse_pair(shelter_id: &str, item_id: &str) -> Result<PairKey, axum::response::Response> {
    PairKey::parse(shelter_id, item_id).map_err(|e| {
        errors::json_error(
            axum::http::StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_pair",
            e.to_string(),
        )
    })
}
