//! File-backed backend over the library XML store

use super::traits::{BackendError, BackendResult, PlaylistBackend};
use crate::model::{Folder, Library, LocalTrack, OrderEntry, PlaylistSummary, RemoteTrack, TrackKey};
use crate::search::SearchPage;
use crate::store;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Backend that keeps the library in memory and rewrites the XML file after
/// every successful command
pub struct XmlBackend {
    path: PathBuf,
    library: Library,
}

impl XmlBackend {
    /// Open the library file, starting empty if it does not exist yet
    pub fn open(path: &Path) -> Result<Self> {
        let library = if path.exists() {
            store::load_library(path)?
        } else {
            log::info!("No library at {:?}, starting empty", path);
            Library::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Apply a change to a copy, persist it, then swap it in
    ///
    /// The in-memory library only changes once the file write succeeded.
    fn mutate<F>(&mut self, change: F) -> BackendResult<()>
    where
        F: FnOnce(&mut Library) -> BackendResult<()>,
    {
        let mut next = self.library.clone();
        change(&mut next)?;

        store::save_library(&next, &self.path)
            .map_err(|e| BackendError::Storage(format!("{:#}", e)))?;

        self.library = next;
        Ok(())
    }
}

impl PlaylistBackend for XmlBackend {
    fn list_folders(&self) -> BackendResult<Vec<Folder>> {
        Ok(self.library.folders().to_vec())
    }

    fn list_playlists(&self) -> BackendResult<Vec<PlaylistSummary>> {
        Ok(self.library.summaries())
    }

    fn fetch_remote_tracks(&self, playlist_id: u64) -> BackendResult<Vec<RemoteTrack>> {
        self.library.remote_tracks(playlist_id)
    }

    fn fetch_local_tracks(&self, playlist_id: u64) -> BackendResult<Vec<LocalTrack>> {
        self.library.local_tracks(playlist_id)
    }

    fn has_custom_order(&self, playlist_id: u64) -> BackendResult<bool> {
        Ok(self.library.custom_order(playlist_id)?.is_some())
    }

    fn fetch_custom_order(&self, playlist_id: u64) -> BackendResult<Vec<OrderEntry>> {
        Ok(self
            .library
            .custom_order(playlist_id)?
            .map(<[OrderEntry]>::to_vec)
            .unwrap_or_default())
    }

    fn init_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()> {
        self.mutate(|library| library.set_custom_order(playlist_id, entries))
    }

    fn set_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()> {
        self.mutate(|library| library.set_custom_order(playlist_id, entries))
    }

    fn move_track(
        &mut self,
        playlist_id: u64,
        key: TrackKey,
        new_position: usize,
    ) -> BackendResult<()> {
        self.mutate(|library| library.move_in_order(playlist_id, key, new_position))
    }

    fn add_tracks(&mut self, playlist_id: u64, track_ids: &[u64]) -> BackendResult<()> {
        self.mutate(|library| library.add_tracks(playlist_id, track_ids))
    }

    fn add_local_track(
        &mut self,
        playlist_id: u64,
        local_id: u64,
        position: u32,
    ) -> BackendResult<()> {
        self.mutate(|library| library.add_local_track(playlist_id, local_id, position))
    }

    fn remove_tracks(&mut self, playlist_id: u64, keys: &[TrackKey]) -> BackendResult<()> {
        self.mutate(|library| library.remove_tracks(playlist_id, keys))
    }

    fn search_catalog(&self, query: &str, offset: usize, limit: usize) -> BackendResult<SearchPage> {
        Ok(self.library.search(query, offset, limit))
    }
}
