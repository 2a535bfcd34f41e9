//! Outbound purchase-order channel.
//!
//! One message per order, each a self-contained JSON record. The channel
//! makes a single enqueue attempt; redelivery and dedup are the consumer's
//! concern.

#[cfg(feature = "redis")]
pub mod redis_streams;

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use shelterflow_procurement::PurchaseOrder;

use crate::error::{PortError, PortResult};

#[cfg(feature = "redis")]
pub use redis_streams::RedisOrderQueue;

#[async_trait]
pub trait OrderChannel: Send + Sync + 'static {
    async fn enqueue(&self, order: &PurchaseOrder) -> PortResult<()>;
}

/// Orders kept for listing when no capacity is given.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// In-memory channel for tests/dev, and the local mirror of an external queue.
///
/// Keeps the most recent `capacity` orders (oldest evicted first) and
/// broadcasts each one to live subscribers (lossy; slow subscribers miss
/// messages rather than blocking the agent).
#[derive(Debug)]
pub struct InMemoryOrderChannel {
    inner: Mutex<VecDeque<PurchaseOrder>>,
    capacity: usize,
    tx: broadcast::Sender<PurchaseOrder>,
}

impl Default for InMemoryOrderChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOrderChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(256);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY))),
            capacity: capacity.max(1),
            tx,
        }
    }

    /// Retained orders, oldest first.
    pub fn all(&self) -> Vec<PurchaseOrder> {
        self.inner
            .lock()
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PurchaseOrder> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl OrderChannel for InMemoryOrderChannel {
    async fn enqueue(&self, order: &PurchaseOrder) -> PortResult<()> {
        {
            let mut history = self
                .inner
                .lock()
                .map_err(|_| PortError::unavailable("order channel lock poisoned"))?;
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(order.clone());
        }

        let _ = self.tx.send(order.clone());
        Ok(())
    }
}
