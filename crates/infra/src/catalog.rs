//! Enumeration of the (location, item) pairs the procurement agent tracks.

use async_trait::async_trait;

use shelterflow_core::PairKey;

use crate::error::PortResult;

#[async_trait]
pub trait PairCatalog: Send + Sync + 'static {
    async fn pairs(&self) -> PortResult<Vec<PairKey>>;
}

/// Fixed catalog, typically seeded from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticPairCatalog {
    pairs: Vec<PairKey>,
}

impl StaticPairCatalog {
    pub fn new(pairs: Vec<PairKey>) -> Self {
        let mut pairs = pairs;
        pairs.sort();
        pairs.dedup();
        Self { pairs }
    }
}

#[async_trait]
impl PairCatalog for StaticPairCatalog {
    async fn pairs(&self) -> PortResult<Vec<PairKey>> {
        Ok(self.pairs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicates_are_collapsed() {
        let a = PairKey::parse("shelter-1", "food").unwrap();
        let b = PairKey::parse("shelter-1", "blankets").unwrap();
        let catalog = StaticPairCatalog::new(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(catalog.pairs().await.unwrap(), vec![b, a]);
    }
}
