use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::warn;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/procurement/run", post(run_procurement))
        .route("/orders", get(list_orders))
        .route("/orders/stream", get(stream_orders))
}

/// POST /api/procurement/run
///
/// Runs one procurement pass over every tracked pair and returns its summary.
pub async fn run_procurement(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.agent().run_once(Utc::now()).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => errors::port_error_to_response(e),
    }
}

/// GET /api/orders
pub async fn list_orders(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    Json(services.orders().all()).into_response()
}

/// GET /api/orders/stream
///
/// One `purchase_order` event per enqueued order. Lagging clients skip the
/// orders they missed.
pub async fn stream_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.orders().subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(order) => match SseEvent::default().event("purchase_order").json_data(&order) {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                warn!(error = %e, "failed to encode order event");
                None
            }
        },
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
