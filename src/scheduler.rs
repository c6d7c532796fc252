// Flush scheduler: one task owns the flush cadence.
// Ticks are serialized (the next tick is not polled until flush + publish
// completes), so at most one flush is in flight even when publishing runs
// longer than the interval. A tick that finds no elapsed window is a no-op.

use crate::aggregator::WindowedAggregator;
use crate::ingress::IngressTransport;
use crate::models::WindowSnapshot;
use crate::publisher::TelemetryPublisher;
use std::sync::Arc;
use tokio::time::{Duration, interval};

/// Aggregator, publisher, and shutdown for the scheduler.
pub struct SchedulerDeps<T> {
    pub aggregator: Arc<WindowedAggregator>,
    pub publisher: Arc<TelemetryPublisher<T>>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

pub struct SchedulerConfig {
    pub flush_interval_ms: u64,
}

pub fn spawn<T: IngressTransport + 'static>(
    deps: SchedulerDeps<T>,
    config: SchedulerConfig,
) -> tokio::task::JoinHandle<()> {
    let SchedulerDeps {
        aggregator,
        publisher,
        mut shutdown_rx,
    } = deps;

    tokio::spawn(async move {
        let mut tick = interval(Duration::from_millis(config.flush_interval_ms));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    match aggregator.flush(chrono::Utc::now()) {
                        Ok(Some(snapshot)) => publish_window(&publisher, &snapshot).await,
                        Ok(None) => {}
                        Err(e) => tracing::warn!(error = %e, "flush failed"),
                    }
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Scheduler shutting down");
                    break;
                }
            }
        }

        // Final flush of the partial window on graceful shutdown.
        match aggregator.drain() {
            Ok(snapshot) => publish_window(&publisher, &snapshot).await,
            Err(e) => tracing::warn!(error = %e, "final drain failed"),
        }
    })
}

async fn publish_window<T: IngressTransport>(
    publisher: &TelemetryPublisher<T>,
    snapshot: &WindowSnapshot,
) {
    for c in &snapshot.counts {
        tracing::info!(
            window = %snapshot.window_start,
            track_id = c.track_id,
            count = c.count,
            "window closed"
        );
    }
    if let Err(e) = publisher.send_data_values(snapshot).await {
        // At-most-once: the window's data is dropped, never retried, so a
        // stale window can never arrive after a newer one.
        tracing::warn!(
            error = %e,
            window = %snapshot.window_start,
            "publish failed; window dropped"
        );
    }
}
