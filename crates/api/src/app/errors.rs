use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shelterflow_forecasting::ForecastError;
use shelterflow_infra::PortError;
use shelterflow_infra::forecast_service::ForecastServiceError;

pub fn forecast_error_to_response(err: ForecastServiceError) -> axum::response::Response {
    match err {
        ForecastServiceError::Forecast(e) => match e {
            ForecastError::InvalidRequest(msg) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", msg)
            }
            ForecastError::InsufficientHistory(msg) => {
                json_error(StatusCode::NOT_FOUND, "insufficient_history", msg)
            }
            ForecastError::InvalidForecast(msg) => {
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_forecast", msg)
            }
            ForecastError::ModelFailed(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "model_failed", msg),
        },
        ForecastServiceError::Port(e) => port_error_to_response(e),
    }
}

pub fn port_error_to_response(err: PortError) -> axum::response::Response {
    match err {
        PortError::Unavailable(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_unavailable", msg),
        PortError::Malformed(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "malformed_record", msg),
        PortError::Misconfigured(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "misconfigured", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
