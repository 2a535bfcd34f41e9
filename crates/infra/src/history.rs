//! Historical usage lookup for forecast generation.

use async_trait::async_trait;

use shelterflow_core::PairKey;
use shelterflow_forecasting::UsageSample;

use crate::error::PortResult;
use crate::store::{InMemoryPairStore, PairStore};

#[async_trait]
pub trait UsageHistory: Send + Sync + 'static {
    /// Raw usage samples for the pair, in any order; empty when unknown.
    async fn samples(&self, pair: &PairKey) -> PortResult<Vec<UsageSample>>;
}

/// In-memory usage history for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUsageHistory {
    inner: InMemoryPairStore<Vec<UsageSample>>,
}

impl InMemoryUsageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append samples to the pair's history.
    pub fn record(&self, pair: PairKey, samples: impl IntoIterator<Item = UsageSample>) {
        self.inner.update_with(pair, |all| all.extend(samples));
    }
}

#[async_trait]
impl UsageHistory for InMemoryUsageHistory {
    async fn samples(&self, pair: &PairKey) -> PortResult<Vec<UsageSample>> {
        Ok(self.inner.get(pair).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn record_appends() {
        let history = InMemoryUsageHistory::new();
        let pair = PairKey::parse("shelter-1", "hygiene").unwrap();
        let t0 = Utc::now();

        history.record(pair.clone(), [UsageSample::new(t0, 3.0)]);
        history.record(pair.clone(), [UsageSample::new(t0 + Duration::days(1), 5.0)]);

        let samples = history.samples(&pair).await.unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].usage, 5.0);

        let other = PairKey::parse("shelter-2", "hygiene").unwrap();
        assert!(history.samples(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_records_keep_every_sample() {
        let history = InMemoryUsageHistory::new();
        let pair = PairKey::parse("shelter-1", "blankets").unwrap();
        let t0 = Utc::now();

        std::thread::scope(|s| {
            for worker in 0..8 {
                let history = &history;
                let pair = pair.clone();
                s.spawn(move || {
                    for i in 0..500 {
                        history.record(pair.clone(), [UsageSample::new(t0, (worker * 500 + i) as f64)]);
                    }
                });
            }
        });

        assert_eq!(history.samples(&pair).await.unwrap().len(), 8 * 500);
    }
}
