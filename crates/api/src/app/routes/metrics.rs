use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/metrics", get(get_metrics))
}

/// GET /api/metrics?shelter_id=...&item_id=...
///
/// Unknown pairs yield an empty object.
pub async fn get_metrics(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PairQuery>,
) -> axum::response::Response {
    let pair = match dto::parse_pair(&query.shelter_id, &query.item_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.metrics().get(&pair).await {
        Ok(metrics) => Json(metrics.unwrap_or_else(|| serde_json::json!({}))).into_response(),
        Err(e) => errors::port_error_to_response(e),
    }
}
