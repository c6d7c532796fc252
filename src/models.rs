// Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked keyword. Ids are assigned 1..N from configuration order and are
/// stable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: u32,
    pub label: String,
}

impl Track {
    /// Builds the track list from the configured keyword order.
    pub fn from_keywords(keywords: &[String]) -> Vec<Track> {
        keywords
            .iter()
            .enumerate()
            .map(|(i, label)| Track {
                id: (i + 1) as u32,
                label: label.clone(),
            })
            .collect()
    }
}

/// One track's count in a closed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCount {
    pub track_id: u32,
    pub count: u64,
}

/// A closed aggregation window: the window start and one count per configured
/// track (zero counts included).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub window_start: DateTime<Utc>,
    pub counts: Vec<TrackCount>,
}

/// One upstream match notification: the set of track ids the event matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub track_ids: Vec<u32>,
}
