use super::track::OrderEntry;
use serde::{Deserialize, Serialize};

/// A playlist as stored by a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: u64,

    /// Playlist name
    pub name: String,

    /// Folder containing this playlist (None = top level)
    pub folder_id: Option<u64>,

    /// Whether the playlist is available offline
    pub offline: bool,

    /// Whether the current user owns (and may edit) the playlist
    pub owned: bool,

    /// Remote track entries (ordered by added index)
    pub entries: Vec<PlaylistEntry>,

    /// Local tracks placed into this playlist
    pub local_entries: Vec<LocalEntry>,

    /// Stored custom order, if the user ever switched to manual sorting
    pub custom_order: Option<Vec<OrderEntry>>,
}

/// Remote entry in a playlist, referencing a catalog track by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Catalog track id
    pub track_id: u64,

    /// Position in the remote ordering (0-based)
    pub added_index: u32,
}

/// Local entry in a playlist, referencing a local collection track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEntry {
    pub local_id: u64,

    /// Slot claimed in the merged playlist (0-based)
    pub position: u32,
}

/// Playlist row shown by the playlist browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: u64,
    pub name: String,
    pub folder_id: Option<u64>,
    pub track_count: usize,
    pub offline: bool,
    pub owned: bool,
}

/// Playlist folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: u64,
    pub name: String,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            folder_id: None,
            offline: false,
            owned: true,
            entries: Vec::new(),
            local_entries: Vec::new(),
            custom_order: None,
        }
    }

    /// Append a remote track after the newest entry
    pub fn add_track(&mut self, track_id: u64) {
        let added_index = self.next_added_index();
        self.entries.push(PlaylistEntry {
            track_id,
            added_index,
        });
    }

    fn next_added_index(&self) -> u32 {
        self.entries
            .iter()
            .map(|e| e.added_index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn contains_remote(&self, track_id: u64) -> bool {
        self.entries.iter().any(|e| e.track_id == track_id)
    }

    pub fn contains_local(&self, local_id: u64) -> bool {
        self.local_entries.iter().any(|e| e.local_id == local_id)
    }

    /// Number of tracks from both sources
    pub fn len(&self) -> usize {
        self.entries.len() + self.local_entries.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn summary(&self) -> PlaylistSummary {
        PlaylistSummary {
            id: self.id,
            name: self.name.clone(),
            folder_id: self.folder_id,
            track_count: self.len(),
            offline: self.offline,
            owned: self.owned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_track_assigns_next_added_index() {
        let mut playlist = Playlist::new(1, "Warmup".to_string());
        playlist.add_track(10);
        playlist.add_track(11);

        assert_eq!(playlist.entries[0].added_index, 0);
        assert_eq!(playlist.entries[1].added_index, 1);
        assert!(playlist.contains_remote(11));
        assert!(!playlist.contains_local(11));
    }

    #[test]
    fn test_added_index_continues_after_gap() {
        let mut playlist = Playlist::new(1, "Gaps".to_string());
        playlist.entries.push(PlaylistEntry {
            track_id: 1,
            added_index: 7,
        });
        playlist.add_track(2);
        assert_eq!(playlist.entries[1].added_index, 8);
    }

    #[test]
    fn test_summary_counts_both_sources() {
        let mut playlist = Playlist::new(3, "Mixed".to_string());
        playlist.add_track(10);
        playlist.local_entries.push(LocalEntry {
            local_id: 1,
            position: 0,
        });

        let summary = playlist.summary();
        assert_eq!(summary.track_count, 2);
        assert_eq!(summary.name, "Mixed");
    }
}
