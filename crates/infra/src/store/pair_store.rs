use std::collections::HashMap;
use std::sync::RwLock;

use shelterflow_core::PairKey;

/// Pair-keyed key/value store abstraction for in-process state.
pub trait PairStore<V>: Send + Sync {
    fn get(&self, pair: &PairKey) -> Option<V>;
    fn upsert(&self, pair: PairKey, value: V);
    fn list(&self) -> Vec<(PairKey, V)>;
}

/// In-memory pair store for tests/dev.
#[derive(Debug)]
pub struct InMemoryPairStore<V> {
    inner: RwLock<HashMap<PairKey, V>>,
}

impl<V> InMemoryPairStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Modify the pair's value in place under a single write lock, starting
    /// from `V::default()` when the pair is new.
    pub fn update_with(&self, pair: PairKey, f: impl FnOnce(&mut V))
    where
        V: Default,
    {
        if let Ok(mut map) = self.inner.write() {
            f(map.entry(pair).or_default());
        }
    }
}

impl<V> Default for InMemoryPairStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PairStore<V> for InMemoryPairStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, pair: &PairKey) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(pair).cloned()
    }

    fn upsert(&self, pair: PairKey, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(pair, value);
        }
    }

    fn list(&self) -> Vec<(PairKey, V)> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut out: Vec<(PairKey, V)> = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
