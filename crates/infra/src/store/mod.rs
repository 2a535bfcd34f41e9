//! Forecast persistence.
//!
//! The engine only ever needs the most recent forecast per pair, so stores
//! keep exactly one record per (location, item) and `put` replaces it.

pub mod pair_store;
pub mod postgres;

use async_trait::async_trait;

use shelterflow_core::PairKey;
use shelterflow_forecasting::Forecast;

use crate::error::PortResult;

pub use pair_store::{InMemoryPairStore, PairStore};
pub use postgres::{PostgresForecastStore, PostgresMetricsStore};

#[async_trait]
pub trait ForecastStore: Send + Sync + 'static {
    /// Latest forecast for the pair, `None` when none was ever stored.
    async fn latest(&self, pair: &PairKey) -> PortResult<Option<Forecast>>;

    /// Store a forecast as the latest for its pair.
    async fn put(&self, forecast: &Forecast) -> PortResult<()>;
}

/// In-memory forecast store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryForecastStore {
    inner: InMemoryPairStore<Forecast>,
}

impl InMemoryForecastStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForecastStore for InMemoryForecastStore {
    async fn latest(&self, pair: &PairKey) -> PortResult<Option<Forecast>> {
        Ok(self.inner.get(pair))
    }

    async fn put(&self, forecast: &Forecast) -> PortResult<()> {
        self.inner.upsert(forecast.pair().clone(), forecast.clone());
        Ok(())
    }
}
