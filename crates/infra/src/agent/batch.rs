use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use shelterflow_core::PairKey;
use shelterflow_procurement::{InventoryReading, ReorderPolicy, decide};

use crate::catalog::PairCatalog;
use crate::error::{PortError, PortResult};
use crate::inventory::InventorySource;
use crate::order_channel::OrderChannel;
use crate::store::ForecastStore;

/// Outcome of one procurement pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Every pair the catalog returned, including failed ones.
    pub pairs_processed: usize,
    /// Orders successfully handed to the outbound channel.
    pub orders_generated: usize,
    /// Pairs skipped because a forecast read or enqueue failed.
    pub pairs_failed: usize,
}

/// Result of evaluating one pair.
#[derive(Debug, Clone, PartialEq)]
enum PairOutcome {
    Ordered,
    NoOrder,
}

/// Evaluate every catalog pair once and enqueue any resulting orders.
///
/// Failures are isolated per pair: a pair whose forecast cannot be read or
/// whose order cannot be enqueued is logged, counted in `pairs_failed` and
/// skipped. An unreadable inventory value degrades to zero on hand; an
/// unreachable inventory source skips the pair. Only a catalog failure
/// aborts the pass.
pub async fn run_batch(
    catalog: &dyn PairCatalog,
    forecasts: &dyn ForecastStore,
    inventory: &dyn InventorySource,
    orders: &dyn OrderChannel,
    policy: &ReorderPolicy,
    now: DateTime<Utc>,
) -> PortResult<BatchSummary> {
    let pairs = catalog.pairs().await?;
    let mut summary = BatchSummary::default();

    for pair in &pairs {
        summary.pairs_processed += 1;

        match evaluate_pair(pair, forecasts, inventory, orders, policy, now).await {
            Ok(PairOutcome::Ordered) => summary.orders_generated += 1,
            Ok(PairOutcome::NoOrder) => {}
            Err(e) => {
                warn!(pair = %pair, error = %e, "procurement pair skipped");
                summary.pairs_failed += 1;
            }
        }
    }

    info!(
        pairs_processed = summary.pairs_processed,
        orders_generated = summary.orders_generated,
        pairs_failed = summary.pairs_failed,
        "procurement pass complete"
    );

    Ok(summary)
}

async fn evaluate_pair(
    pair: &PairKey,
    forecasts: &dyn ForecastStore,
    inventory: &dyn InventorySource,
    orders: &dyn OrderChannel,
    policy: &ReorderPolicy,
    now: DateTime<Utc>,
) -> PortResult<PairOutcome> {
    let forecast = forecasts.latest(pair).await?;

    let reading = match inventory.reading(pair).await {
        Ok(Some(r)) => r,
        Ok(None) => {
            debug!(pair = %pair, "no inventory state; assuming zero on hand");
            InventoryReading::missing(pair.clone(), now)
        }
        Err(PortError::Malformed(msg)) => {
            warn!(pair = %pair, error = %msg, "unreadable inventory state; assuming zero on hand");
            InventoryReading::missing(pair.clone(), now)
        }
        Err(e) => return Err(e),
    };

    let Some(order) = decide(forecast.as_ref(), &reading, policy, now) else {
        return Ok(PairOutcome::NoOrder);
    };

    orders.enqueue(&order).await?;
    info!(
        pair = %pair,
        order_quantity = order.order_quantity(),
        current_inventory = order.current_inventory(),
        days_until_stockout = order.days_until_stockout(),
        "purchase order enqueued"
    );

    Ok(PairOutcome::Ordered)
}
