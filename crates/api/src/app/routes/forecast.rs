use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use shelterflow_forecasting::ForecastRequest;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/forecast", post(generate_forecast))
        .route("/forecast/:shelter_id/:item_id", get(latest_forecast))
}

/// POST /api/forecast
///
/// Generates a forecast for the requested range and stores it as the latest
/// one for the pair.
pub async fn generate_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ForecastRequest>,
) -> axum::response::Response {
    match services.forecasts().generate(&body, Utc::now()).await {
        Ok(forecast) => (StatusCode::OK, Json(forecast)).into_response(),
        Err(e) => errors::forecast_error_to_response(e),
    }
}

/// GET /api/forecast/:shelter_id/:item_id
pub async fn latest_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Path((shelter_id, item_id)): Path<(String, String)>,
) -> axum::response::Response {
    let pair = match dto::parse_pair(&shelter_id, &item_id) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    match services.forecasts().latest(&pair).await {
        Ok(Some(forecast)) => (StatusCode::OK, Json(forecast)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("no forecast for {pair}")),
        Err(e) => errors::port_error_to_response(e),
    }
}
