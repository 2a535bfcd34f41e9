use serde::{Deserialize, Serialize};

use shelterflow_core::{DomainError, DomainResult};

pub const DEFAULT_RESTOCK_HORIZON_DAYS: f64 = 14.0;
pub const DEFAULT_BUFFER_FRACTION: f64 = 0.2;

/// Tunable reorder policy.
///
/// - `restock_horizon_days`: how many days of supply an order should cover.
/// - `buffer_fraction`: extra lead, as a fraction of the horizon, before
///   an order is triggered.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ReorderPolicyRecord")]
pub struct ReorderPolicy {
    restock_horizon_days: f64,
    buffer_fraction: f64,
}

/// Unvalidated wire shape; decoding goes through [`ReorderPolicy::new`].
#[derive(Debug, Deserialize)]
struct ReorderPolicyRecord {
    restock_horizon_days: f64,
    buffer_fraction: f64,
}

impl TryFrom<ReorderPolicyRecord> for ReorderPolicy {
    type Error = DomainError;

    fn try_from(r: ReorderPolicyRecord) -> Result<Self, Self::Error> {
        ReorderPolicy::new(r.restock_horizon_days, r.buffer_fraction)
    }
}

impl Default for ReorderPolicy {
    fn default() -> Self {
        Self {
            restock_horizon_days: DEFAULT_RESTOCK_HORIZON_DAYS,
            buffer_fraction: DEFAULT_BUFFER_FRACTION,
        }
    }
}

impl ReorderPolicy {
    pub fn new(restock_horizon_days: f64, buffer_fraction: f64) -> DomainResult<Self> {
        if !(restock_horizon_days.is_finite() && restock_horizon_days > 0.0) {
            return Err(DomainError::validation(
                "restock horizon must be a finite positive number of days",
            ));
        }
        if !(buffer_fraction.is_finite() && buffer_fraction >= 0.0) {
            return Err(DomainError::validation(
                "buffer fraction must be a finite non-negative number",
            ));
        }
        Ok(Self {
            restock_horizon_days,
            buffer_fraction,
        })
    }

    pub fn restock_horizon_days(&self) -> f64 {
        self.restock_horizon_days
    }

    pub fn buffer_fraction(&self) -> f64 {
        self.buffer_fraction
    }

    /// Days of supply below which replenishment is recommended.
    pub fn reorder_trigger_days(&self) -> f64 {
        self.restock_horizon_days * (1.0 + self.buffer_fraction)
    }
}
