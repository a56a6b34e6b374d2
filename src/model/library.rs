use super::{Folder, LocalEntry, LocalTrack, OrderEntry, Playlist, PlaylistSummary, RemoteTrack, TrackKey};
use crate::backend::{BackendError, BackendResult};
use crate::search::{self, SearchPage};
use crate::view::order::{place_key, CustomOrder};
use std::collections::BTreeMap;

/// Everything a backend serves: catalog, local collection, folders, playlists
///
/// Both bundled backends keep one of these and delegate their commands to it,
/// so the command semantics live in one place.
#[derive(Debug, Clone, Default)]
pub struct Library {
    /// Streaming catalog indexed by track id
    catalog: BTreeMap<u64, RemoteTrack>,

    /// Local file collection indexed by local id
    local_collection: BTreeMap<u64, LocalTrack>,

    folders: Vec<Folder>,

    playlists: Vec<Playlist>,
}

impl Library {
    /// Create a new empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a catalog track. Its `added_index` is ignored; playlists assign their own.
    pub fn add_catalog_track(&mut self, track: RemoteTrack) {
        self.catalog.insert(track.id, track);
    }

    /// Add a local collection track. Its `playlist_position` is ignored.
    pub fn add_local_file(&mut self, track: LocalTrack) {
        self.local_collection.insert(track.id, track);
    }

    pub fn add_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    /// Add a playlist to the library
    pub fn add_playlist(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    pub fn catalog(&self) -> impl Iterator<Item = &RemoteTrack> {
        self.catalog.values()
    }

    pub fn local_collection(&self) -> impl Iterator<Item = &LocalTrack> {
        self.local_collection.values()
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Get all playlists
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn playlist(&self, id: u64) -> BackendResult<&Playlist> {
        self.playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or(BackendError::PlaylistNotFound(id))
    }

    fn playlist_mut(&mut self, id: u64) -> BackendResult<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(BackendError::PlaylistNotFound(id))
    }

    /// Total number of catalog tracks
    pub fn track_count(&self) -> usize {
        self.catalog.len()
    }

    /// Total number of playlists
    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }

    pub fn summaries(&self) -> Vec<PlaylistSummary> {
        self.playlists.iter().map(Playlist::summary).collect()
    }

    /// Remote tracks of a playlist ordered by added index
    pub fn remote_tracks(&self, playlist_id: u64) -> BackendResult<Vec<RemoteTrack>> {
        let playlist = self.playlist(playlist_id)?;

        let mut entries = playlist.entries.clone();
        entries.sort_by_key(|e| e.added_index);

        let mut tracks = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.catalog.get(&entry.track_id) {
                Some(track) => tracks.push(RemoteTrack {
                    added_index: entry.added_index,
                    ..track.clone()
                }),
                None => log::debug!(
                    "Playlist {} references unknown catalog track {}",
                    playlist_id,
                    entry.track_id
                ),
            }
        }
        Ok(tracks)
    }

    /// Local tracks of a playlist carrying their slot positions
    pub fn local_tracks(&self, playlist_id: u64) -> BackendResult<Vec<LocalTrack>> {
        let playlist = self.playlist(playlist_id)?;

        let mut tracks = Vec::with_capacity(playlist.local_entries.len());
        for entry in &playlist.local_entries {
            match self.local_collection.get(&entry.local_id) {
                Some(track) => tracks.push(LocalTrack {
                    playlist_position: entry.position,
                    ..track.clone()
                }),
                None => log::debug!(
                    "Playlist {} references unknown local track {}",
                    playlist_id,
                    entry.local_id
                ),
            }
        }
        Ok(tracks)
    }

    pub fn custom_order(&self, playlist_id: u64) -> BackendResult<Option<&[OrderEntry]>> {
        Ok(self.playlist(playlist_id)?.custom_order.as_deref())
    }

    pub fn set_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()> {
        self.playlist_mut(playlist_id)?.custom_order = Some(entries.to_vec());
        Ok(())
    }

    /// Move (or insert) one key in the stored custom order
    pub fn move_in_order(
        &mut self,
        playlist_id: u64,
        key: TrackKey,
        new_position: usize,
    ) -> BackendResult<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        if !playlist_has_key(playlist, key) {
            return Err(BackendError::TrackNotFound(key));
        }

        let current = CustomOrder::from_entries(playlist.custom_order.as_deref().unwrap_or(&[]));
        playlist.custom_order = Some(place_key(&current, key, new_position).entries());
        Ok(())
    }

    /// Append catalog tracks; ids already in the playlist are skipped
    pub fn add_tracks(&mut self, playlist_id: u64, track_ids: &[u64]) -> BackendResult<()> {
        if let Some(missing) = track_ids.iter().find(|id| !self.catalog.contains_key(id)) {
            return Err(BackendError::TrackNotFound(TrackKey::Remote(*missing)));
        }

        let playlist = self.playlist_mut(playlist_id)?;
        for &id in track_ids {
            if playlist.contains_remote(id) {
                log::debug!("Track {} already in playlist {}", id, playlist_id);
                continue;
            }
            playlist.add_track(id);
        }
        Ok(())
    }

    /// Place a local track at a slot, moving it if it is already present
    pub fn add_local_track(
        &mut self,
        playlist_id: u64,
        local_id: u64,
        position: u32,
    ) -> BackendResult<()> {
        if !self.local_collection.contains_key(&local_id) {
            return Err(BackendError::TrackNotFound(TrackKey::Local(local_id)));
        }

        let playlist = self.playlist_mut(playlist_id)?;
        match playlist
            .local_entries
            .iter_mut()
            .find(|e| e.local_id == local_id)
        {
            Some(entry) => entry.position = position,
            None => playlist.local_entries.push(LocalEntry { local_id, position }),
        }
        Ok(())
    }

    /// Remove tracks and their custom-order entries
    ///
    /// Nothing is removed if any key is not part of the playlist.
    pub fn remove_tracks(&mut self, playlist_id: u64, keys: &[TrackKey]) -> BackendResult<()> {
        let playlist = self.playlist_mut(playlist_id)?;
        if let Some(missing) = keys.iter().find(|k| !playlist_has_key(playlist, **k)) {
            return Err(BackendError::TrackNotFound(*missing));
        }

        playlist
            .entries
            .retain(|e| !keys.contains(&TrackKey::Remote(e.track_id)));
        playlist
            .local_entries
            .retain(|e| !keys.contains(&TrackKey::Local(e.local_id)));

        if let Some(order) = playlist.custom_order.take() {
            let mut sequence = CustomOrder::from_entries(&order).sequence();
            sequence.retain(|k| !keys.contains(k));
            playlist.custom_order = Some(CustomOrder::from_sequence(&sequence).entries());
        }
        Ok(())
    }

    pub fn search(&self, query: &str, offset: usize, limit: usize) -> SearchPage {
        search::search_tracks(self.catalog.values(), query, offset, limit)
    }
}

fn playlist_has_key(playlist: &Playlist, key: TrackKey) -> bool {
    match key {
        TrackKey::Remote(id) => playlist.contains_remote(id),
        TrackKey::Local(id) => playlist.contains_local(id),
    }
}
