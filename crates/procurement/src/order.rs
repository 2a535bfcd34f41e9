use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelterflow_core::{ItemId, LocationId, PairKey, ValueObject};

/// A replenishment request for one location+item pair.
///
/// Created only by [`crate::decide`] and never mutated afterwards. Each order
/// is handed to the outbound channel as one self-contained message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PurchaseOrderRecord", into = "PurchaseOrderRecord")]
pub struct PurchaseOrder {
    pub(crate) pair: PairKey,
    pub(crate) order_quantity: f64,
    pub(crate) current_inventory: f64,
    pub(crate) forecasted_usage: f64,
    pub(crate) days_until_stockout: f64,
    pub(crate) created_at: DateTime<Utc>,
}

impl ValueObject for PurchaseOrder {}

impl PurchaseOrder {
    pub fn pair(&self) -> &PairKey {
        &self.pair
    }

    pub fn location_id(&self) -> &LocationId {
        &self.pair.location_id
    }

    pub fn item_id(&self) -> &ItemId {
        &self.pair.item_id
    }

    /// Quantity to order, never negative, rounded to 2 decimals.
    pub fn order_quantity(&self) -> f64 {
        self.order_quantity
    }

    /// On-hand quantity at decision time.
    pub fn current_inventory(&self) -> f64 {
        self.current_inventory
    }

    /// Forecasted average daily usage.
    pub fn forecasted_usage(&self) -> f64 {
        self.forecasted_usage
    }

    /// Estimated days until stock runs out, rounded to 1 decimal.
    pub fn days_until_stockout(&self) -> f64 {
        self.days_until_stockout
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Queue message shape. An infinite stockout estimate travels as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PurchaseOrderRecord {
    shelter_id: LocationId,
    item_id: ItemId,
    order_quantity: f64,
    current_inventory: f64,
    forecasted_usage: f64,
    days_until_stockout: Option<f64>,
    timestamp: DateTime<Utc>,
}

impl From<PurchaseOrderRecord> for PurchaseOrder {
    fn from(r: PurchaseOrderRecord) -> Self {
        Self {
            pair: PairKey::new(r.shelter_id, r.item_id),
            order_quantity: r.order_quantity,
            current_inventory: r.current_inventory,
            forecasted_usage: r.forecasted_usage,
            days_until_stockout: r.days_until_stockout.unwrap_or(f64::INFINITY),
            created_at: r.timestamp,
        }
    }
}

impl From<PurchaseOrder> for PurchaseOrderRecord {
    fn from(o: PurchaseOrder) -> Self {
        Self {
            shelter_id: o.pair.location_id,
            item_id: o.pair.item_id,
            order_quantity: o.order_quantity,
            current_inventory: o.current_inventory,
            forecasted_usage: o.forecasted_usage,
            days_until_stockout: o
                .days_until_stockout
                .is_finite()
                .then_some(o.days_until_stockout),
            timestamp: o.created_at,
        }
    }
}
