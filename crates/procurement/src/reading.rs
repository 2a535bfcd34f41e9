use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelterflow_core::{PairKey, ValueObject};

/// Most recent known on-hand quantity for one location+item pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReading {
    pair: PairKey,
    quantity: f64,
    observed_at: DateTime<Utc>,
}

impl ValueObject for InventoryReading {}

impl InventoryReading {
    /// Build a reading; negative or non-finite quantities are coerced to zero.
    pub fn new(pair: PairKey, quantity: f64, observed_at: DateTime<Utc>) -> Self {
        let quantity = if quantity.is_finite() && quantity > 0.0 {
            quantity
        } else {
            0.0
        };
        Self {
            pair,
            quantity,
            observed_at,
        }
    }

    /// Reading used when the device state is absent or unreadable.
    pub fn missing(pair: PairKey, observed_at: DateTime<Utc>) -> Self {
        Self::new(pair, 0.0, observed_at)
    }

    pub fn pair(&self) -> &PairKey {
        &self.pair
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> PairKey {
        PairKey::parse("shelter-1", "hygiene").unwrap()
    }

    #[test]
    fn quantity_is_coerced_to_non_negative() {
        let now = Utc::now();
        assert_eq!(InventoryReading::new(pair(), -3.0, now).quantity(), 0.0);
        assert_eq!(InventoryReading::new(pair(), f64::NAN, now).quantity(), 0.0);
        assert_eq!(InventoryReading::new(pair(), f64::INFINITY, now).quantity(), 0.0);
        assert_eq!(InventoryReading::new(pair(), 12.5, now).quantity(), 12.5);
    }

    #[test]
    fn missing_reading_is_zero() {
        assert_eq!(InventoryReading::missing(pair(), Utc::now()).quantity(), 0.0);
    }
}
