use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::batch::BatchSummary;
use super::ProcurementAgent;

/// Config for the scheduled procurement runner.
#[derive(Debug, Clone)]
pub struct ProcurementRunner {
    pub interval: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for ProcurementRunner {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            max_retries: 5,
            base_backoff: Duration::from_millis(250),
        }
    }
}

/// Handle for a running procurement runner (shutdown + trigger hook).
#[derive(Debug)]
pub struct ProcurementRunnerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    trigger: mpsc::Sender<()>,
    summaries: watch::Receiver<Option<BatchSummary>>,
    join: Option<JoinHandle<()>>,
}

impl ProcurementRunnerHandle {
    /// Request an immediate pass.
    ///
    /// Triggers are coalesced (bounded queue). If a pass is already pending,
    /// this becomes a no-op.
    pub fn trigger(&self) {
        let _ = self.trigger.try_send(());
    }

    /// Summary of the most recent successful pass. Only the latest is kept.
    pub fn latest_summary(&self) -> Option<BatchSummary> {
        *self.summaries.borrow()
    }

    /// Wait for a pass that completed after the last one observed here.
    ///
    /// Returns `None` once the runner has stopped.
    pub async fn next_summary(&mut self) -> Option<BatchSummary> {
        self.summaries.changed().await.ok()?;
        *self.summaries.borrow_and_update()
    }

    /// Gracefully stop the runner task.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl ProcurementRunner {
    /// Spawn the runner on the current tokio runtime.
    ///
    /// - Schedule: runs once on startup, then every `interval`
    /// - Trigger: call `handle.trigger()` for an out-of-band pass
    /// - Failures: a failed pass is logged and retried with bounded
    ///   exponential backoff; never propagates
    pub fn spawn(&self, name: &'static str, agent: Arc<ProcurementAgent>) -> ProcurementRunnerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::channel::<()>(1);
        let (summary_tx, summary_rx) = watch::channel::<Option<BatchSummary>>(None);

        let cfg = self.clone();
        let join = tokio::spawn(runner_loop(name, cfg, agent, shutdown_rx, trigger_rx, summary_tx));

        ProcurementRunnerHandle {
            shutdown: Some(shutdown_tx),
            trigger: trigger_tx,
            summaries: summary_rx,
            join: Some(join),
        }
    }
}

async fn runner_loop(
    name: &'static str,
    cfg: ProcurementRunner,
    agent: Arc<ProcurementAgent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    mut trigger_rx: mpsc::Receiver<()>,
    summary_tx: watch::Sender<Option<BatchSummary>>,
) {
    info!(runner = name, interval_secs = cfg.interval.as_secs(), "procurement runner started");

    // First tick fires immediately: run once on startup.
    let mut ticker = tokio::time::interval(cfg.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut failures: u32 = 0;
    let mut retry_at: Option<Instant> = None;

    loop {
        let retry = async move {
            match retry_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        // Shutdown has priority.
        tokio::select! {
            biased;
            _ = &mut shutdown_rx => break,
            _ = ticker.tick() => {}
            Some(()) = trigger_rx.recv() => {}
            _ = retry => {}
        }
        retry_at = None;

        match agent.run_once(Utc::now()).await {
            Ok(summary) => {
                failures = 0;
                summary_tx.send_replace(Some(summary));
            }
            Err(e) => {
                warn!(runner = name, error = %e, "procurement pass failed");
                failures += 1;
                if failures <= cfg.max_retries {
                    retry_at = Some(Instant::now() + backoff(cfg.base_backoff, failures));
                } else {
                    failures = 0;
                }
            }
        }
    }

    info!(runner = name, "procurement runner stopped");
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    // Exponential backoff: base * 2^(attempt-1), capped.
    let pow = 1u32 << attempt.saturating_sub(1).min(10);
    let ms = base.as_millis().saturating_mul(pow as u128);
    Duration::from_millis(ms.min(10_000) as u64)
}
