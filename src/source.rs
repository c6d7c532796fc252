// Line source: a minimal stand-in for a streaming match source.
// Reads text lines from stdin and emits the set of tracks whose label occurs
// in the line. Anything able to produce MatchEvents can replace this task;
// connecting to a real event stream is a deployment concern.

use crate::models::{MatchEvent, Track};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Case-insensitive substring match of every track label against `line`.
pub fn match_tracks(line: &str, labels: &[(u32, String)]) -> Vec<u32> {
    let lower = line.to_lowercase();
    labels
        .iter()
        .filter(|(_, label)| lower.contains(label))
        .map(|(id, _)| *id)
        .collect()
}

/// Lowered labels paired with track ids, computed once per process.
pub fn lowered_labels(tracks: &[Track]) -> Vec<(u32, String)> {
    tracks
        .iter()
        .map(|t| (t.id, t.label.to_lowercase()))
        .collect()
}

pub fn spawn_stdin(
    tracks: Vec<Track>,
    tx: mpsc::Sender<MatchEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let labels = lowered_labels(&tracks);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let track_ids = match_tracks(&line, &labels);
                    if track_ids.is_empty() {
                        continue;
                    }
                    // A full queue drops the match rather than stalling the reader.
                    match tx.try_send(MatchEvent { track_ids }) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            tracing::debug!("event queue full; match dropped");
                        }
                        Err(TrySendError::Closed(_)) => break,
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        tracing::debug!("Line source shutting down");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<(u32, String)> {
        lowered_labels(&Track::from_keywords(&[
            "california fire".to_string(),
            "flood".to_string(),
        ]))
    }

    #[test]
    fn match_tracks_is_case_insensitive() {
        let ids = match_tracks("CALIFORNIA Fire near the coast", &labels());
        assert_eq!(ids, [1]);
    }

    #[test]
    fn match_tracks_returns_every_matching_track() {
        let ids = match_tracks("california fire causes flood warning", &labels());
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn match_tracks_returns_empty_when_nothing_matches() {
        assert!(match_tracks("sunny day", &labels()).is_empty());
    }
}
