//! Procurement agent: evaluates every tracked pair and enqueues orders.
//!
//! - [`run_batch`]: one pass over the catalog (the scheduled job's body)
//! - [`ProcurementRunner`]: background schedule + on-demand trigger around it
//!
//! Failures are isolated per pair and never abort the pass.

pub mod batch;
pub mod runner;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use shelterflow_procurement::ReorderPolicy;

use crate::catalog::PairCatalog;
use crate::error::PortResult;
use crate::inventory::InventorySource;
use crate::order_channel::OrderChannel;
use crate::store::ForecastStore;

pub use batch::{BatchSummary, run_batch};
pub use runner::{ProcurementRunner, ProcurementRunnerHandle};

/// Handles the procurement pass depends on, constructed once at startup.
#[derive(Clone)]
pub struct ProcurementAgent {
    catalog: Arc<dyn PairCatalog>,
    forecasts: Arc<dyn ForecastStore>,
    inventory: Arc<dyn InventorySource>,
    orders: Arc<dyn OrderChannel>,
    policy: ReorderPolicy,
}

impl ProcurementAgent {
    pub fn new(
        catalog: Arc<dyn PairCatalog>,
        forecasts: Arc<dyn ForecastStore>,
        inventory: Arc<dyn InventorySource>,
        orders: Arc<dyn OrderChannel>,
        policy: ReorderPolicy,
    ) -> Self {
        Self {
            catalog,
            forecasts,
            inventory,
            orders,
            policy,
        }
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> PortResult<BatchSummary> {
        run_batch(
            self.catalog.as_ref(),
            self.forecasts.as_ref(),
            self.inventory.as_ref(),
            self.orders.as_ref(),
            &self.policy,
            now,
        )
        .await
    }
}
