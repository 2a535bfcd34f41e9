use std::sync::Arc;

use anyhow::Context;

use shelterflow_api::app::{build_app, build_services};
use shelterflow_infra::agent::ProcurementRunner;
use shelterflow_infra::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelterflow_observability::init();

    let config = ServiceConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(
        build_services(&config)
            .await
            .context("failed to wire services")?,
    );

    let runner = config.procurement_interval.map(|interval| {
        let runner = ProcurementRunner {
            interval,
            ..Default::default()
        };
        runner.spawn("procurement.scheduled", services.agent())
    });
    if runner.is_none() {
        tracing::info!("PROCUREMENT_INTERVAL_SECS not set; procurement runs on demand only");
    }

    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, pairs = config.pairs.len(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = runner {
        if let Some(last) = handle.latest_summary() {
            tracing::info!(
                pairs_processed = last.pairs_processed,
                orders_generated = last.orders_generated,
                pairs_failed = last.pairs_failed,
                "last scheduled procurement pass"
            );
        }
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
