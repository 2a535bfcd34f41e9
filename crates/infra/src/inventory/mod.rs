//! Live inventory readings.

pub mod shadow;

use async_trait::async_trait;

use shelterflow_core::PairKey;
use shelterflow_procurement::InventoryReading;

use crate::error::PortResult;
use crate::store::{InMemoryPairStore, PairStore};

#[cfg(feature = "redis")]
pub use shadow::DeviceShadowInventorySource;
pub use shadow::parse_shadow_document;

/// Source of the most recent on-hand quantity for a pair.
///
/// - `Ok(None)`: no device state exists for the pair.
/// - `Err(PortError::Malformed)`: state exists but is unreadable.
/// - `Err(PortError::Unavailable)`: the source itself could not be reached.
#[async_trait]
pub trait InventorySource: Send + Sync + 'static {
    async fn reading(&self, pair: &PairKey) -> PortResult<Option<InventoryReading>>;
}

/// In-memory inventory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventorySource {
    inner: InMemoryPairStore<InventoryReading>,
}

impl InMemoryInventorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, reading: InventoryReading) {
        self.inner.upsert(reading.pair().clone(), reading);
    }

    pub fn all(&self) -> Vec<InventoryReading> {
        self.inner.list().into_iter().map(|(_, r)| r).collect()
    }
}

#[async_trait]
impl InventorySource for InMemoryInventorySource {
    async fn reading(&self, pair: &PairKey) -> PortResult<Option<InventoryReading>> {
        Ok(self.inner.get(pair))
    }
}
