// Windowed match counters behind a single lock.
// Counters and the window watermark move together: a flush snapshots and
// resets every counter and advances the watermark in one critical section, so
// an increment lands wholly in the old window or wholly in the new one.

use crate::models::{Track, TrackCount, WindowSnapshot};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Floors `ts` to a multiple of `granularity_secs` in epoch time.
/// Idempotent and monotonic; no timezone conversion.
pub fn quantize(ts: DateTime<Utc>, granularity_secs: u64) -> DateTime<Utc> {
    let step_ms = granularity_secs as i64 * 1000;
    let floored = ts.timestamp_millis().div_euclid(step_ms) * step_ms;
    DateTime::from_timestamp_millis(floored).unwrap_or(ts)
}

struct AggState {
    window_start: DateTime<Utc>,
    counts: BTreeMap<u32, u64>,
}

pub struct WindowedAggregator {
    granularity_secs: u64,
    state: Mutex<AggState>,
}

impl WindowedAggregator {
    /// Known track ids come from the configured track list; events referencing
    /// any other id are dropped.
    pub fn new(tracks: &[Track], granularity_secs: u64, now: DateTime<Utc>) -> Self {
        let counts = tracks.iter().map(|t| (t.id, 0u64)).collect();
        Self {
            granularity_secs,
            state: Mutex::new(AggState {
                window_start: quantize(now, granularity_secs),
                counts,
            }),
        }
    }

    /// Start of the window currently accumulating.
    pub fn window_start(&self) -> anyhow::Result<DateTime<Utc>> {
        let state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("aggregator lock poisoned: {}", e))?;
        Ok(state.window_start)
    }

    pub fn increment(&self, track_id: u32) {
        self.increment_all(&[track_id]);
    }

    /// One event may match several tracks; a single lock acquisition covers
    /// the whole set so the counts cannot be split across a flush.
    pub fn increment_all(&self, track_ids: &[u32]) {
        let Ok(mut state) = self.state.lock() else {
            tracing::warn!("aggregator lock poisoned; dropping event");
            return;
        };
        for id in track_ids {
            match state.counts.get_mut(id) {
                Some(c) => *c += 1,
                None => tracing::debug!(track_id = id, "event for unknown track dropped"),
            }
        }
    }

    /// Closes the current window if `now` has moved past it.
    /// Returns `None` when no window boundary has been crossed; otherwise the
    /// snapshot is tagged with the window being closed (the previous
    /// watermark), all counters are reset, and the watermark advances.
    pub fn flush(&self, now: DateTime<Utc>) -> anyhow::Result<Option<WindowSnapshot>> {
        let w = quantize(now, self.granularity_secs);
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("aggregator lock poisoned: {}", e))?;
        if w <= state.window_start {
            return Ok(None);
        }
        let window_start = state.window_start;
        let counts = snapshot_and_reset(&mut state.counts);
        state.window_start = w;
        Ok(Some(WindowSnapshot {
            window_start,
            counts,
        }))
    }

    /// Closes the current partial window unconditionally (graceful shutdown).
    /// The watermark advances one granularity step past the drained window so
    /// it can never be re-published.
    pub fn drain(&self) -> anyhow::Result<WindowSnapshot> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("aggregator lock poisoned: {}", e))?;
        let window_start = state.window_start;
        let counts = snapshot_and_reset(&mut state.counts);
        state.window_start = window_start + chrono::Duration::seconds(self.granularity_secs as i64);
        Ok(WindowSnapshot {
            window_start,
            counts,
        })
    }
}

fn snapshot_and_reset(counts: &mut BTreeMap<u32, u64>) -> Vec<TrackCount> {
    counts
        .iter_mut()
        .map(|(&id, c)| {
            let count = *c;
            *c = 0;
            TrackCount {
                track_id: id,
                count,
            }
        })
        .collect()
}
