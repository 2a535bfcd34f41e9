//! Device-shadow inventory readings.
//!
//! Each shelter sensor publishes a shadow document for the thing named
//! `{location}-{item}`:
//!
//! ```json
//! { "state": { "reported": { "inventory_level": 42.0 } } }
//! ```

use chrono::{DateTime, Utc};

use shelterflow_core::PairKey;
use shelterflow_procurement::InventoryReading;

use crate::error::{PortError, PortResult};

/// Extract the reported inventory level from a shadow document.
///
/// The level may be a JSON number or a numeric string.
pub fn parse_shadow_document(
    pair: &PairKey,
    raw: &[u8],
    observed_at: DateTime<Utc>,
) -> PortResult<InventoryReading> {
    let doc: serde_json::Value =
        serde_json::from_slice(raw).map_err(|e| PortError::malformed(format!("shadow {pair}: {e}")))?;

    let level = doc
        .pointer("/state/reported/inventory_level")
        .ok_or_else(|| PortError::malformed(format!("shadow {pair}: missing state.reported.inventory_level")))?;

    let quantity = match level {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| PortError::malformed(format!("shadow {pair}: inventory_level is not numeric")))?;

    Ok(InventoryReading::new(pair.clone(), quantity, observed_at))
}

#[cfg(feature = "redis")]
mod redis_source {
    use async_trait::async_trait;
    use chrono::Utc;
    use tracing::instrument;

    use shelterflow_core::PairKey;
    use shelterflow_procurement::InventoryReading;

    use super::parse_shadow_document;
    use crate::error::{PortError, PortResult};
    use crate::inventory::InventorySource;

    /// Default key prefix for shadow documents.
    const DEFAULT_KEY_PREFIX: &str = "shelterflow:shadow:";

    /// Reads shadow documents mirrored into Redis under `{prefix}{thing}`.
    #[derive(Debug, Clone)]
    pub struct DeviceShadowInventorySource {
        client: redis::Client,
        key_prefix: String,
    }

    impl DeviceShadowInventorySource {
        pub fn new(redis_url: impl AsRef<str>, key_prefix: Option<String>) -> PortResult<Self> {
            let client = redis::Client::open(redis_url.as_ref())
                .map_err(|e| PortError::Misconfigured(format!("redis url: {e}")))?;
            Ok(Self {
                client,
                key_prefix: key_prefix.unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
            })
        }
    }

    #[async_trait]
    impl InventorySource for DeviceShadowInventorySource {
        #[instrument(skip(self), fields(thing = %pair), err)]
        async fn reading(&self, pair: &PairKey) -> PortResult<Option<InventoryReading>> {
            let mut conn = self
                .client
                .get_multiplexed_tokio_connection()
                .await
                .map_err(|e| PortError::unavailable(format!("redis connection: {e}")))?;

            let raw: Option<Vec<u8>> = redis::cmd("GET")
                .arg(format!("{}{}", self.key_prefix, pair))
                .query_async(&mut conn)
                .await
                .map_err(|e| PortError::unavailable(format!("redis GET: {e}")))?;

            match raw {
                Some(bytes) => parse_shadow_document(pair, &bytes, Utc::now()).map(Some),
                None => Ok(None),
            }
        }
    }
}

#[cfg(feature = "redis")]
pub use redis_source::DeviceShadowInventorySource;
