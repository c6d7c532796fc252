// Scheduler integration: spawn, tick past a window boundary, shutdown drain

mod common;

use chrono::Utc;
use common::RecordingTransport;
use keywatch::aggregator::WindowedAggregator;
use keywatch::models::Track;
use keywatch::omf::MessageType;
use keywatch::publisher::TelemetryPublisher;
use keywatch::scheduler::{self, SchedulerConfig, SchedulerDeps};
use std::sync::Arc;

fn aggregator(window_secs: u64) -> Arc<WindowedAggregator> {
    let tracks = Track::from_keywords(&["fire".to_string()]);
    Arc::new(WindowedAggregator::new(&tracks, window_secs, Utc::now()))
}

fn spawn_scheduler(
    aggregator: &Arc<WindowedAggregator>,
    transport: RecordingTransport,
) -> (
    tokio::sync::oneshot::Sender<()>,
    tokio::task::JoinHandle<()>,
) {
    let publisher = Arc::new(TelemetryPublisher::new(transport));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = scheduler::spawn(
        SchedulerDeps {
            aggregator: aggregator.clone(),
            publisher,
            shutdown_rx,
        },
        SchedulerConfig {
            flush_interval_ms: 50,
        },
    );
    (shutdown_tx, handle)
}

fn published_counts(sent: &[(MessageType, serde_json::Value)]) -> Vec<u64> {
    sent.iter()
        .flat_map(|(_, body)| body.as_array().unwrap().clone())
        .map(|entry| entry["values"][0]["ItemCount"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn scheduler_publishes_closed_windows_and_drains_on_shutdown() {
    let agg = aggregator(1);
    agg.increment(1);
    agg.increment(1);

    let transport = RecordingTransport::default();
    let (shutdown_tx, handle) = spawn_scheduler(&agg, transport.clone());

    // Cross at least one 1s window boundary so a periodic flush fires.
    tokio::time::sleep(tokio::time::Duration::from_millis(1200)).await;
    agg.increment(1);

    let _ = shutdown_tx.send(());
    handle.await.expect("scheduler task");

    let sent = transport.sent();
    // At least one periodic publish plus the shutdown drain.
    assert!(sent.len() >= 2, "got {} messages", sent.len());
    assert!(sent.iter().all(|(k, _)| *k == MessageType::Data));

    // Every increment is attributed to exactly one published window.
    let total: u64 = published_counts(&sent).iter().sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn scheduler_drops_window_when_publish_fails() {
    let agg = aggregator(1);
    agg.increment(1);
    agg.increment(1);
    agg.increment(1);

    // The first publish attempt fails; that window is dropped, not retried.
    let transport = RecordingTransport::failing_attempt(1);
    let (shutdown_tx, handle) = spawn_scheduler(&agg, transport.clone());

    tokio::time::sleep(tokio::time::Duration::from_millis(1200)).await;
    agg.increment(1);
    agg.increment(1);
    tokio::time::sleep(tokio::time::Duration::from_millis(1200)).await;

    let _ = shutdown_tx.send(());
    handle.await.expect("scheduler task");

    let counts = published_counts(&transport.sent());
    // The failed window's count of 3 never reappears; the next window is
    // unaffected by the failure.
    assert!(
        !counts.contains(&3),
        "dropped window was re-sent: {:?}",
        counts
    );
    assert!(counts.contains(&2), "second window missing: {:?}", counts);
    assert_eq!(counts.iter().sum::<u64>(), 2);
}

#[tokio::test]
async fn scheduler_without_elapsed_window_publishes_nothing_until_shutdown() {
    // One-hour windows: no boundary can pass during the test.
    let agg = aggregator(3600);
    agg.increment(1);

    let transport = RecordingTransport::default();
    let (shutdown_tx, handle) = spawn_scheduler(&agg, transport.clone());

    tokio::time::sleep(tokio::time::Duration::from_millis(200)).await;
    assert!(transport.sent().is_empty());

    let _ = shutdown_tx.send(());
    handle.await.expect("scheduler task");

    // Only the shutdown drain was published, carrying the partial count.
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(published_counts(&sent), [1]);
}
