use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use shelterflow_forecasting::MovingAverageModel;
use shelterflow_infra::agent::ProcurementAgent;
use shelterflow_infra::catalog::StaticPairCatalog;
use shelterflow_infra::config::ServiceConfig;
use shelterflow_infra::forecast_service::ForecastService;
use shelterflow_infra::history::InMemoryUsageHistory;
use shelterflow_infra::inventory::{DeviceShadowInventorySource, InMemoryInventorySource, InventorySource};
use shelterflow_infra::metrics::{InMemoryMetricsStore, MetricsStore};
use shelterflow_infra::order_channel::{InMemoryOrderChannel, OrderChannel, RedisOrderQueue};
use shelterflow_infra::store::{ForecastStore, InMemoryForecastStore, PostgresForecastStore, PostgresMetricsStore};
use shelterflow_infra::{PortError, PortResult};
use shelterflow_procurement::PurchaseOrder;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Port(#[from] PortError),
}

/// Handles shared by every request, built once at startup.
///
/// Usage history is always held in memory and fed through `POST /api/usage`.
/// Every order the agent enqueues is also kept in `orders` so it can be listed
/// and streamed, whether or not an external queue is configured.
pub struct AppServices {
    forecasts: ForecastService,
    usage: Arc<InMemoryUsageHistory>,
    inventory: Option<Arc<InMemoryInventorySource>>,
    metrics: Arc<dyn MetricsStore>,
    agent: Arc<ProcurementAgent>,
    orders: Arc<InMemoryOrderChannel>,
}

impl AppServices {
    /// Fully in-memory wiring (dev/test), ignoring any external URLs.
    pub fn in_memory(config: &ServiceConfig) -> Self {
        Self::in_memory_with_metrics(config, Arc::new(InMemoryMetricsStore::new()))
    }

    /// In-memory wiring with caller-provided metrics.
    pub fn in_memory_with_metrics(config: &ServiceConfig, metrics: Arc<dyn MetricsStore>) -> Self {
        let inventory = Arc::new(InMemoryInventorySource::new());
        let orders = Arc::new(InMemoryOrderChannel::new());
        Self::assemble(
            config,
            Arc::new(InMemoryForecastStore::new()),
            inventory.clone(),
            Some(inventory),
            orders.clone(),
            orders,
            metrics,
        )
    }

    /// In-memory wiring whose inventory is owned elsewhere, so
    /// `PUT /api/inventory` is refused.
    pub fn with_external_inventory(config: &ServiceConfig, inventory: Arc<dyn InventorySource>) -> Self {
        let orders = Arc::new(InMemoryOrderChannel::new());
        Self::assemble(
            config,
            Arc::new(InMemoryForecastStore::new()),
            inventory,
            None,
            orders.clone(),
            orders,
            Arc::new(InMemoryMetricsStore::new()),
        )
    }

    fn assemble(
        config: &ServiceConfig,
        store: Arc<dyn ForecastStore>,
        inventory: Arc<dyn InventorySource>,
        local_inventory: Option<Arc<InMemoryInventorySource>>,
        channel: Arc<dyn OrderChannel>,
        orders: Arc<InMemoryOrderChannel>,
        metrics: Arc<dyn MetricsStore>,
    ) -> Self {
        let usage = Arc::new(InMemoryUsageHistory::new());
        let forecasts = ForecastService::new(usage.clone(), store.clone(), Arc::new(MovingAverageModel::new()));
        let agent = Arc::new(ProcurementAgent::new(
            Arc::new(StaticPairCatalog::new(config.pairs.clone())),
            store,
            inventory,
            channel,
            config.policy,
        ));

        Self {
            forecasts,
            usage,
            inventory: local_inventory,
            metrics,
            agent,
            orders,
        }
    }

    pub fn forecasts(&self) -> &ForecastService {
        &self.forecasts
    }

    pub fn usage(&self) -> &InMemoryUsageHistory {
        &self.usage
    }

    /// Writable inventory, present only when device state is not external.
    pub fn local_inventory(&self) -> Option<&InMemoryInventorySource> {
        self.inventory.as_deref()
    }

    pub fn metrics(&self) -> &dyn MetricsStore {
        self.metrics.as_ref()
    }

    pub fn agent(&self) -> Arc<ProcurementAgent> {
        self.agent.clone()
    }

    pub fn orders(&self) -> &InMemoryOrderChannel {
        &self.orders
    }
}

/// Wire adapters from config: Postgres for forecasts/metrics when
/// `DATABASE_URL` is set, Redis for the order queue and device state when
/// their URLs are set, in-memory otherwise.
pub async fn build_services(config: &ServiceConfig) -> Result<AppServices, ServicesError> {
    let (store, metrics): (Arc<dyn ForecastStore>, Arc<dyn MetricsStore>) = match &config.database_url {
        Some(url) => {
            let pool = PgPool::connect(url).await?;
            info!(
                forecasts_table = %config.forecasts_table,
                metrics_table = %config.metrics_table,
                "using postgres stores"
            );
            (
                Arc::new(PostgresForecastStore::new(pool.clone(), config.forecasts_table.clone())?)
                    as Arc<dyn ForecastStore>,
                Arc::new(PostgresMetricsStore::new(pool, config.metrics_table.clone())?) as Arc<dyn MetricsStore>,
            )
        }
        None => (
            Arc::new(InMemoryForecastStore::new()) as Arc<dyn ForecastStore>,
            Arc::new(InMemoryMetricsStore::new()) as Arc<dyn MetricsStore>,
        ),
    };

    let (inventory, local_inventory): (Arc<dyn InventorySource>, _) = match &config.device_state_url {
        Some(url) => {
            info!("reading inventory from device state");
            let source = DeviceShadowInventorySource::new(url, None)?;
            (Arc::new(source) as Arc<dyn InventorySource>, None)
        }
        None => {
            let local = Arc::new(InMemoryInventorySource::new());
            (local.clone() as Arc<dyn InventorySource>, Some(local))
        }
    };

    let orders = Arc::new(InMemoryOrderChannel::new());
    let channel: Arc<dyn OrderChannel> = match &config.order_queue_url {
        Some(url) => {
            info!("enqueuing orders to redis stream");
            Arc::new(MirroredOrderChannel {
                primary: Arc::new(RedisOrderQueue::new(url, None)?),
                mirror: orders.clone(),
            })
        }
        None => orders.clone(),
    };

    Ok(AppServices::assemble(
        config,
        store,
        inventory,
        local_inventory,
        channel,
        orders,
        metrics,
    ))
}

/// Sends to the external queue, then records locally once accepted.
struct MirroredOrderChannel {
    primary: Arc<dyn OrderChannel>,
    mirror: Arc<InMemoryOrderChannel>,
}

#[async_trait]
impl OrderChannel for MirroredOrderChannel {
    async fn enqueue(&self, order: &PurchaseOrder) -> PortResult<()> {
        self.primary.enqueue(order).await?;
        self.mirror.enqueue(order).await
    }
}
