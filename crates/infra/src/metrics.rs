//! Per-pair metrics lookup (forecast accuracy, usage summaries, ...).
//!
//! Records are opaque JSON objects owned by whichever job writes them.

use async_trait::async_trait;

use shelterflow_core::PairKey;

use crate::error::PortResult;
use crate::store::{InMemoryPairStore, PairStore};

#[async_trait]
pub trait MetricsStore: Send + Sync + 'static {
    async fn get(&self, pair: &PairKey) -> PortResult<Option<serde_json::Value>>;
}

/// In-memory metrics for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryMetricsStore {
    inner: InMemoryPairStore<serde_json::Value>,
}

impl InMemoryMetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, pair: PairKey, metrics: serde_json::Value) {
        self.inner.upsert(pair, metrics);
    }
}

#[async_trait]
impl MetricsStore for InMemoryMetricsStore {
    async fn get(&self, pair: &PairKey) -> PortResult<Option<serde_json::Value>> {
        Ok(self.inner.get(pair))
    }
}
