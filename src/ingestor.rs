// Match-event ingestor: drains the bounded event channel into the aggregator.
// The task exits when every sender is dropped (source stopped at shutdown).

use crate::aggregator::WindowedAggregator;
use crate::models::MatchEvent;
use std::sync::Arc;
use tokio::sync::mpsc;

pub fn spawn(
    mut rx: mpsc::Receiver<MatchEvent>,
    aggregator: Arc<WindowedAggregator>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            aggregator.increment_all(&event.track_ids);
        }
        tracing::debug!("Ingestor shutting down");
    })
}
