//! Catalog search pages
//!
//! Used by the track-replacement flow: free-text query against the remote
//! catalog, returning one bounded page plus the total number of matches.

use crate::model::{RemoteTrack, TrackText};
use serde::{Deserialize, Serialize};

/// Largest page a backend will return
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of catalog search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<RemoteTrack>,

    /// Number of matches across all pages
    pub total: usize,

    pub offset: usize,
    pub limit: usize,
}

impl SearchPage {
    pub fn empty(offset: usize, limit: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            offset,
            limit: clamp_limit(limit),
        }
    }

    /// Whether more results follow this page
    pub fn has_more(&self) -> bool {
        self.offset + self.items.len() < self.total
    }

    /// Offset of the next page, if there is one
    pub fn next_offset(&self) -> Option<usize> {
        self.has_more().then(|| self.offset + self.items.len())
    }
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_PAGE_SIZE)
}

/// Search a set of catalog tracks and cut out one page
///
/// A blank query matches nothing: the catalog is never listed wholesale.
pub fn search_tracks<'a, I>(tracks: I, query: &str, offset: usize, limit: usize) -> SearchPage
where
    I: IntoIterator<Item = &'a RemoteTrack>,
{
    let limit = clamp_limit(limit);
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchPage::empty(offset, limit);
    }

    let matches: Vec<&RemoteTrack> = tracks
        .into_iter()
        .filter(|t| t.matches_needle(&needle))
        .collect();

    let items = matches
        .iter()
        .skip(offset)
        .take(limit)
        .map(|t| (*t).clone())
        .collect();

    SearchPage {
        items,
        total: matches.len(),
        offset,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quality;

    fn track(id: u64, title: &str, artist: &str) -> RemoteTrack {
        RemoteTrack {
            id,
            title: title.to_string(),
            artist: artist.to_string(),
            album: "Album".to_string(),
            duration_secs: 200,
            quality: Quality::default(),
            label: None,
            artwork: None,
            added_index: 0,
        }
    }

    #[test]
    fn test_search_pages_and_totals() {
        let tracks: Vec<RemoteTrack> = (1..=5)
            .map(|i| track(i, &format!("Night Drive {}", i), "Kavinsky"))
            .collect();

        let page = search_tracks(&tracks, "night", 0, 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.next_offset(), Some(2));

        let last = search_tracks(&tracks, "NIGHT", 4, 2);
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, 5);
        assert!(!last.has_more());
    }

    #[test]
    fn test_search_matches_artist_and_clamps_limit() {
        let tracks = vec![track(1, "Intro", "Moderat"), track(2, "Bad Kingdom", "moderat")];

        let page = search_tracks(&tracks, "  Moderat ", 0, 0);
        assert_eq!(page.limit, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 1);

        let page = search_tracks(&tracks, "moderat", 0, 10_000);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_blank_query_returns_empty_page() {
        let tracks = vec![track(1, "Intro", "Moderat")];
        let page = search_tracks(&tracks, "   ", 0, 10);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }
}
