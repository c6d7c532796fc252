// Ingestor: channel events land in the aggregator; channel close stops the task

use chrono::{TimeZone, Utc};
use keywatch::aggregator::WindowedAggregator;
use keywatch::ingestor;
use keywatch::models::{MatchEvent, Track};
use std::sync::Arc;

#[tokio::test]
async fn ingestor_drains_events_into_counters_and_exits_on_close() {
    let tracks = Track::from_keywords(&["fire".to_string(), "flood".to_string()]);
    let start = Utc.timestamp_opt(0, 0).unwrap();
    let aggregator = Arc::new(WindowedAggregator::new(&tracks, 60, start));

    let (tx, rx) = tokio::sync::mpsc::channel(8);
    let handle = ingestor::spawn(rx, aggregator.clone());

    tx.send(MatchEvent {
        track_ids: vec![1, 2],
    })
    .await
    .unwrap();
    tx.send(MatchEvent { track_ids: vec![2] }).await.unwrap();
    tx.send(MatchEvent { track_ids: vec![99] }).await.unwrap();
    drop(tx);
    handle.await.expect("ingestor exits when channel closes");

    let snapshot = aggregator
        .flush(Utc.timestamp_opt(60, 0).unwrap())
        .unwrap()
        .expect("window closed");
    let count = |id: u32| {
        snapshot
            .counts
            .iter()
            .find(|c| c.track_id == id)
            .unwrap()
            .count
    };
    assert_eq!(count(1), 1);
    assert_eq!(count(2), 2);
}
