//! Reorder decision engine.
//!
//! Compares forecasted depletion against on-hand inventory and synthesises
//! at most one purchase order. The function is total: every input, including
//! absent forecasts and zero/negative usage, maps to a defined outcome.

use chrono::{DateTime, Utc};

use shelterflow_forecasting::Forecast;

use crate::order::PurchaseOrder;
use crate::policy::ReorderPolicy;
use crate::reading::InventoryReading;

/// Decide whether the pair needs replenishment.
///
/// Returns `None` ("no order") when:
/// - the forecast is absent, empty, or belongs to a different pair;
/// - the average forecasted usage is not a finite number;
/// - inventory lasts at least `policy.reorder_trigger_days()`;
/// - the quantity needed to cover the horizon overflows `f64`.
///
/// Otherwise the order covers `restock_horizon_days` of average usage minus
/// what is already on hand (floored at zero, rounded to 2 decimals).
pub fn decide(
    forecast: Option<&Forecast>,
    inventory: &InventoryReading,
    policy: &ReorderPolicy,
    now: DateTime<Utc>,
) -> Option<PurchaseOrder> {
    let forecast = forecast.filter(|f| f.pair() == inventory.pair())?;
    let avg_daily_usage = average_daily_usage(forecast.predictions())?;

    let on_hand = inventory.quantity();
    let days = days_until_stockout(on_hand, avg_daily_usage);

    // `inf < trigger` is false, so zero/negative usage never orders.
    if days >= policy.reorder_trigger_days() {
        return None;
    }

    let shortfall = avg_daily_usage * policy.restock_horizon_days() - on_hand;
    if !shortfall.is_finite() {
        return None;
    }
    let order_quantity = if shortfall > 0.0 {
        round_to(shortfall, 2)
    } else {
        0.0
    };

    Some(PurchaseOrder {
        pair: inventory.pair().clone(),
        order_quantity,
        current_inventory: on_hand,
        forecasted_usage: avg_daily_usage,
        days_until_stockout: round_to(days, 1),
        created_at: now,
    })
}

/// Arithmetic mean of the predictions; `None` when empty or not finite.
pub fn average_daily_usage(predictions: &[f64]) -> Option<f64> {
    if predictions.is_empty() {
        return None;
    }
    let avg = predictions.iter().sum::<f64>() / (predictions.len() as f64);
    avg.is_finite().then_some(avg)
}

/// `on_hand / avg_daily_usage`, or `+inf` when usage is zero or negative.
pub fn days_until_stockout(on_hand: f64, avg_daily_usage: f64) -> f64 {
    if avg_daily_usage > 0.0 {
        on_hand / avg_daily_usage
    } else {
        f64::INFINITY
    }
}

/// Values too large to scale are already coarser than `decimals` and are
/// returned unchanged.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}
