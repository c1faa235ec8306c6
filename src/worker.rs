// Background history worker: keeps the chart series moving even when nobody is looking.
// Each tick asks the history service to refresh; the throttle window decides whether it fetches.

use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::Instrument;

use crate::history_service::HistoryService;

pub struct WorkerDeps {
    pub history: Arc<HistoryService>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct WorkerConfig {
    pub tick_interval_ms: u64,
    /// How often to log sampler stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        history,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        tick_interval_ms,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::debug_span!("worker", tick_interval_ms);
    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(tick_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        match history.refresh().await {
                            Ok(series) => {
                                tracing::trace!(samples = series.len(), "history tick");
                            }
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "history_refresh",
                                    "history refresh failed with no samples yet"
                                );
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            samples_taken_total = history.samples_taken_total(),
                            refresh_failures_total = history.refresh_failures_total(),
                            "history stats"
                        );
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}
