//! Merge stage: remote and local tracks into one ordered sequence
//!
//! Local tracks claim absolute slots; remote tracks fill the remaining slots
//! in their existing relative order.

use crate::model::{DisplayTrack, LocalTrack, RemoteTrack};
use std::collections::HashMap;

/// Merge both sources and number the result from 1
///
/// Every input track appears exactly once in the output. When two local
/// tracks claim the same slot the later one in `local` wins it; the displaced
/// one is appended after any leftover remote tracks.
pub fn merge_tracks(remote: &[RemoteTrack], local: &[LocalTrack]) -> Vec<DisplayTrack> {
    if local.is_empty() {
        return number(remote.iter().map(DisplayTrack::from_remote).collect());
    }

    let mut by_position: HashMap<usize, &LocalTrack> = HashMap::with_capacity(local.len());
    let mut displaced: Vec<&LocalTrack> = Vec::new();
    for track in local {
        if let Some(previous) = by_position.insert(track.playlist_position as usize, track) {
            log::debug!(
                "Local track {} displaced from slot {} by local track {}",
                previous.id,
                track.playlist_position,
                track.id
            );
            displaced.push(previous);
        }
    }

    let max_position = local
        .iter()
        .map(|t| t.playlist_position as usize)
        .max()
        .unwrap_or(0);
    let total_slots = (remote.len() + local.len()).max(max_position + 1);

    let mut merged = Vec::with_capacity(remote.len() + local.len());
    let mut remaining = remote.iter();

    for slot in 0..total_slots {
        if let Some(track) = by_position.get(&slot) {
            merged.push(DisplayTrack::from_local(track));
        } else if let Some(track) = remaining.next() {
            merged.push(DisplayTrack::from_remote(track));
        }
    }

    merged.extend(remaining.map(DisplayTrack::from_remote));
    merged.extend(displaced.into_iter().map(DisplayTrack::from_local));

    number(merged)
}

fn number(mut tracks: Vec<DisplayTrack>) -> Vec<DisplayTrack> {
    for (i, track) in tracks.iter_mut().enumerate() {
        track.number = i + 1;
    }
    tracks
}
