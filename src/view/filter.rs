//! Filter stage: case-insensitive substring search

use crate::model::{DisplayTrack, TrackText};

/// Keep tracks whose title, artist or album contains the query
///
/// A blank query keeps everything.
pub fn filter_tracks(tracks: &[DisplayTrack], query: &str) -> Vec<DisplayTrack> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return tracks.to_vec();
    }

    tracks
        .iter()
        .filter(|t| t.matches_needle(&needle))
        .cloned()
        .collect()
}
