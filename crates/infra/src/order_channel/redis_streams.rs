//! Redis Streams-backed order queue.
//!
//! - **Stream Key**: `shelterflow:orders` unless configured otherwise
//! - **Message**: `XADD` with `shelter_id`, `item_id` fields for routing and
//!   the full order as JSON in `payload`
//! - **Bounded**: the stream is approximately trimmed to `MAX_LEN` entries

use async_trait::async_trait;
use tracing::{instrument, warn};

use shelterflow_procurement::PurchaseOrder;

use super::OrderChannel;
use crate::error::{PortError, PortResult};

/// Default stream key for orders
const DEFAULT_STREAM_KEY: &str = "shelterflow:orders";

/// Approximate stream length cap
const MAX_LEN: usize = 100_000;

#[derive(Debug, Clone)]
pub struct RedisOrderQueue {
    client: redis::Client,
    stream_key: String,
}

impl RedisOrderQueue {
    /// Create a new queue.
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `stream_key` - stream key (default: "shelterflow:orders")
    pub fn new(redis_url: impl AsRef<str>, stream_key: Option<String>) -> PortResult<Self> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| PortError::Misconfigured(format!("redis url: {e}")))?;

        Ok(Self {
            client,
            stream_key: stream_key.unwrap_or_else(|| DEFAULT_STREAM_KEY.to_string()),
        })
    }
}

#[async_trait]
impl OrderChannel for RedisOrderQueue {
    #[instrument(
        skip(self, order),
        fields(stream_key = %self.stream_key, pair = %order.pair()),
        err
    )]
    async fn enqueue(&self, order: &PurchaseOrder) -> PortResult<()> {
        let payload = serde_json::to_string(order)
            .map_err(|e| PortError::malformed(format!("serialize order: {e}")))?;

        let mut conn = self
            .client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| PortError::unavailable(format!("redis connection: {e}")))?;

        let id: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(MAX_LEN)
            .arg("*")
            .arg("shelter_id")
            .arg(order.location_id().as_str())
            .arg("item_id")
            .arg(order.item_id().as_str())
            .arg("payload")
            .arg(&payload)
            .query_async(&mut conn)
            .await
            .map_err(|e| PortError::unavailable(format!("redis XADD: {e}")))?;

        if id.is_empty() {
            warn!(stream_key = %self.stream_key, "XADD returned an empty message id");
        }

        Ok(())
    }
}
