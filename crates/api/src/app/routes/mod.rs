use axum::Router;

pub mod forecast;
pub mod inventory;
pub mod metrics;
pub mod procurement;
pub mod system;
pub mod usage;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .merge(forecast::router())
        .merge(usage::router())
        .merge(inventory::router())
        .merge(metrics::router())
        .merge(procurement::router())
}
