use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::put, Json, Router};
use chrono::Utc;

use shelterflow_procurement::InventoryReading;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/inventory", put(record_inventory))
}

/// PUT /api/inventory
///
/// Sets the on-hand quantity for a pair. Only available when inventory is
/// held locally; with device state configured the devices own this value.
pub async fn record_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RecordInventoryRequest>,
) -> axum::response::Response {
    let Some(inventory) = services.local_inventory() else {
        return errors::json_error(
            StatusCode::CONFLICT,
            "inventory_external",
            "inventory is read from device state",
        );
    };

    let pair = match dto::parse_pair(&body.shelter_id, &body.item_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let reading = InventoryReading::new(pair, body.inventory_level, Utc::now());
    inventory.record(reading.clone());

    Json(serde_json::json!({
        "shelter_id": reading.pair().location_id.as_str(),
        "item_id": reading.pair().item_id.as_str(),
        "inventory_level": reading.quantity(),
        "observed_at": reading.observed_at(),
    }))
    .into_response()
}
