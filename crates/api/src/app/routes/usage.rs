use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/usage", post(record_usage))
}

/// POST /api/usage
///
/// Appends raw usage samples to the pair's history. Non-finite values are
/// rejected here rather than silently dropped during preprocessing.
pub async fn record_usage(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RecordUsageRequest>,
) -> axum::response::Response {
    let pair = match dto::parse_pair(&body.shelter_id, &body.item_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    if body.samples.iter().any(|s| !s.usage.is_finite()) {
        return errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_sample",
            "usage values must be finite numbers",
        );
    }

    services.usage().record(pair.clone(), body.samples());

    (
        StatusCode::ACCEPTED,
        Json(dto::UsageAccepted {
            shelter_id: pair.location_id.to_string(),
            item_id: pair.item_id.to_string(),
            accepted: body.samples.len(),
        }),
    )
        .into_response()
}
