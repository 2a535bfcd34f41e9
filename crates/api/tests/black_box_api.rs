use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::StatusCode;
use serde_json::json;

use shelterflow_api::app::{AppServices, build_app};
use shelterflow_core::PairKey;
use shelterflow_infra::PortResult;
use shelterflow_infra::config::ServiceConfig;
use shelterflow_infra::inventory::InventorySource;
use shelterflow_infra::metrics::InMemoryMetricsStore;
use shelterflow_procurement::InventoryReading;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(Arc::new(AppServices::in_memory(&test_config()))).await
    }

    async fn spawn_with(services: Arc<AppServices>) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(services);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> ServiceConfig {
    ServiceConfig::from_lookup(|var| match var {
        "SHELTERFLOW_PAIRS" => Some("shelter-1:blankets,shelter-1:food".to_string()),
        _ => None,
    })
    .expect("test config")
}

/// Thirty days of constant daily usage ending 2024-01-30.
async fn seed_usage(client: &reqwest::Client, base_url: &str, item: &str, daily: f64) {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let samples: Vec<_> = (0..30)
        .map(|d| json!({ "timestamp": start + ChronoDuration::days(d), "usage": daily }))
        .collect();

    let res = client
        .post(format!("{}/api/usage", base_url))
        .json(&json!({ "shelter_id": "shelter-1", "item_id": item, "samples": samples }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["accepted"], 30);
}

/// Inventory owned by devices; always reports an empty store room.
struct DeviceOwnedInventory;

#[async_trait]
impl InventorySource for DeviceOwnedInventory {
    async fn reading(&self, pair: &PairKey) -> PortResult<Option<InventoryReading>> {
        Ok(Some(InventoryReading::new(pair.clone(), 0.0, Utc::now())))
    }
}

async fn forecast_week(client: &reqwest::Client, base_url: &str, item: &str) {
    let res = client
        .post(format!("{}/api/forecast", base_url))
        .json(&json!({
            "shelter_id": "shelter-1",
            "item_id": item,
            "start_date": "2024-02-01",
            "end_date": "2024-02-07",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_healthy() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn forecast_for_one_week_returns_seven_predictions() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_usage(&client, &srv.base_url, "blankets", 40.0).await;

    let res = client
        .post(format!("{}/api/forecast", srv.base_url))
        .json(&json!({
            "shelter_id": "shelter-1",
            "item_id": "blankets",
            "start_date": "2024-02-01",
            "end_date": "2024-02-07",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["shelter_id"], "shelter-1");
    assert_eq!(body["item_id"], "blankets");
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 7);
    assert!(predictions.iter().all(|p| p.as_f64() == Some(40.0)));
    assert_eq!(body["confidence_intervals"].as_array().unwrap().len(), 7);

    // Stored as the latest forecast for the pair.
    let res = client
        .get(format!("{}/api/forecast/shelter-1/blankets", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let latest: serde_json::Value = res.json().await.unwrap();
    assert_eq!(latest["predictions"], body["predictions"]);
}

#[tokio::test]
async fn invalid_dates_are_rejected_with_422() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/forecast", srv.base_url))
        .json(&json!({
            "shelter_id": "shelter-1",
            "item_id": "food",
            "start_date": "invalid-date",
            "end_date": "2024-01-14",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_request");

    let res = client
        .post(format!("{}/api/forecast", srv.base_url))
        .json(&json!({
            "shelter_id": "shelter-1",
            "item_id": "food",
            "start_date": "2024-01-14",
            "end_date": "2024-01-01",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn forecast_without_history_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/forecast", srv.base_url))
        .json(&json!({
            "shelter_id": "shelter-2",
            "item_id": "hygiene",
            "start_date": "2024-01-01",
            "end_date": "2024-01-07",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_history");

    let res = client
        .get(format!("{}/api/forecast/shelter-2/hygiene", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_lookup_defaults_to_empty_object() {
    let metrics = Arc::new(InMemoryMetricsStore::new());
    metrics.put(
        PairKey::parse("shelter-1", "food").unwrap(),
        json!({ "mape": 0.08, "samples": 30 }),
    );
    let services = AppServices::in_memory_with_metrics(&test_config(), metrics);
    let srv = TestServer::spawn_with(Arc::new(services)).await;

    let known: serde_json::Value = reqwest::get(format!(
        "{}/api/metrics?shelter_id=shelter-1&item_id=food",
        srv.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(known, json!({ "mape": 0.08, "samples": 30 }));

    let unknown: serde_json::Value = reqwest::get(format!(
        "{}/api/metrics?shelter_id=shelter-9&item_id=food",
        srv.base_url
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();
    assert_eq!(unknown, json!({}));
}

#[tokio::test]
async fn procurement_run_orders_low_stock_pairs() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // blankets: 100/day with 50 on hand -> order; food: plenty on hand -> none.
    for (item, daily, on_hand) in [("blankets", 100.0, 50.0), ("food", 10.0, 1000.0)] {
        seed_usage(&client, &srv.base_url, item, daily).await;

        let res = client
            .post(format!("{}/api/forecast", srv.base_url))
            .json(&json!({
                "shelter_id": "shelter-1",
                "item_id": item,
                "start_date": "2024-02-01",
                "end_date": "2024-02-07",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let res = client
            .put(format!("{}/api/inventory", srv.base_url))
            .json(&json!({ "shelter_id": "shelter-1", "item_id": item, "inventory_level": on_hand }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .post(format!("{}/api/procurement/run", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let summary: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        summary,
        json!({ "pairs_processed": 2, "orders_generated": 1, "pairs_failed": 0 })
    );

    let orders: serde_json::Value = client
        .get(format!("{}/api/orders", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["shelter_id"], "shelter-1");
    assert_eq!(orders[0]["item_id"], "blankets");
    assert_eq!(orders[0]["order_quantity"], 1350.0);
    assert_eq!(orders[0]["current_inventory"], 50.0);
    assert_eq!(orders[0]["forecasted_usage"], 100.0);
    assert_eq!(orders[0]["days_until_stockout"], 0.5);
}

#[tokio::test]
async fn malformed_usage_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/usage", srv.base_url))
        .json(&json!({ "shelter_id": "  ", "item_id": "food", "samples": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_pair");
}

#[tokio::test]
async fn inventory_update_echoes_the_stored_reading() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/api/inventory", srv.base_url))
        .json(&json!({ "shelter_id": "shelter-1", "item_id": "food", "inventory_level": -4.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["shelter_id"], "shelter-1");
    assert_eq!(body["item_id"], "food");
    assert_eq!(body["inventory_level"], 0.0);
    assert!(body["observed_at"].is_string());
}

#[tokio::test]
async fn inventory_update_is_refused_when_devices_own_inventory() {
    let services = AppServices::with_external_inventory(&test_config(), Arc::new(DeviceOwnedInventory));
    let srv = TestServer::spawn_with(Arc::new(services)).await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{}/api/inventory", srv.base_url))
        .json(&json!({ "shelter_id": "shelter-1", "item_id": "food", "inventory_level": 10.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "inventory_external");

    // The agent still reads the external source: empty stock with a forecast orders.
    seed_usage(&client, &srv.base_url, "food", 10.0).await;
    forecast_week(&client, &srv.base_url, "food").await;
    let summary: serde_json::Value = client
        .post(format!("{}/api/procurement/run", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["orders_generated"], 1);
}

#[tokio::test]
async fn order_stream_pushes_orders_as_they_are_enqueued() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Headers arrive only after the handler has subscribed.
    let mut stream = client
        .get(format!("{}/api/orders/stream", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    assert!(
        stream.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    seed_usage(&client, &srv.base_url, "blankets", 100.0).await;
    forecast_week(&client, &srv.base_url, "blankets").await;
    let res = client
        .post(format!("{}/api/procurement/run", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let mut received = String::new();
    let read = tokio::time::timeout(Duration::from_secs(5), async {
        while !(received.contains("event: purchase_order") && received.contains("blankets")) {
            match stream.chunk().await.unwrap() {
                Some(bytes) => received.push_str(&String::from_utf8_lossy(&bytes)),
                None => break,
            }
        }
    })
    .await;
    assert!(read.is_ok(), "no order event within 5s, got {received:?}");
    assert!(received.contains("event: purchase_order"));
    assert!(received.contains("\"item_id\":\"blankets\""));
}
