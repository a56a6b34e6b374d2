//! In-memory backend
//!
//! Serves a [`Library`] held in memory. Failures can be injected per command
//! so callers can exercise their recovery paths.

use super::traits::{BackendError, BackendResult, PlaylistBackend};
use crate::model::{Folder, Library, LocalTrack, OrderEntry, PlaylistSummary, RemoteTrack, TrackKey};
use crate::search::SearchPage;
use std::cell::Cell;

/// Commands that can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchTracks,
    FetchCustomOrder,
    InitCustomOrder,
    SetCustomOrder,
    MoveTrack,
    AddTracks,
    RemoveTracks,
    Search,
}

/// Backend over an in-memory library
#[derive(Debug, Default)]
pub struct MemoryBackend {
    library: Library,
    failing: Vec<Command>,
    calls: Cell<usize>,
}

impl MemoryBackend {
    pub fn new(library: Library) -> Self {
        Self {
            library,
            failing: Vec::new(),
            calls: Cell::new(0),
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Make every subsequent call of `command` fail until cleared
    pub fn fail_on(&mut self, command: Command) {
        if !self.failing.contains(&command) {
            self.failing.push(command);
        }
    }

    pub fn clear_failures(&mut self) {
        self.failing.clear();
    }

    /// Number of commands served so far
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    fn check(&self, command: Command) -> BackendResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.failing.contains(&command) {
            log::debug!("Injected failure for {:?}", command);
            return Err(BackendError::Unavailable(format!("{:?} failed", command)));
        }
        Ok(())
    }
}

impl PlaylistBackend for MemoryBackend {
    fn list_folders(&self) -> BackendResult<Vec<Folder>> {
        self.check(Command::FetchTracks)?;
        Ok(self.library.folders().to_vec())
    }

    fn list_playlists(&self) -> BackendResult<Vec<PlaylistSummary>> {
        self.check(Command::FetchTracks)?;
        Ok(self.library.summaries())
    }

    fn fetch_remote_tracks(&self, playlist_id: u64) -> BackendResult<Vec<RemoteTrack>> {
        self.check(Command::FetchTracks)?;
        self.library.remote_tracks(playlist_id)
    }

    fn fetch_local_tracks(&self, playlist_id: u64) -> BackendResult<Vec<LocalTrack>> {
        self.check(Command::FetchTracks)?;
        self.library.local_tracks(playlist_id)
    }

    fn has_custom_order(&self, playlist_id: u64) -> BackendResult<bool> {
        self.check(Command::FetchCustomOrder)?;
        Ok(self.library.custom_order(playlist_id)?.is_some())
    }

    fn fetch_custom_order(&self, playlist_id: u64) -> BackendResult<Vec<OrderEntry>> {
        self.check(Command::FetchCustomOrder)?;
        Ok(self
            .library
            .custom_order(playlist_id)?
            .map(<[OrderEntry]>::to_vec)
            .unwrap_or_default())
    }

    fn init_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()> {
        self.check(Command::InitCustomOrder)?;
        self.library.set_custom_order(playlist_id, entries)
    }

    fn set_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()> {
        self.check(Command::SetCustomOrder)?;
        self.library.set_custom_order(playlist_id, entries)
    }

    fn move_track(
        &mut self,
        playlist_id: u64,
        key: TrackKey,
        new_position: usize,
    ) -> BackendResult<()> {
        self.check(Command::MoveTrack)?;
        self.library.move_in_order(playlist_id, key, new_position)
    }

    fn add_tracks(&mut self, playlist_id: u64, track_ids: &[u64]) -> BackendResult<()> {
        self.check(Command::AddTracks)?;
        self.library.add_tracks(playlist_id, track_ids)
    }

    fn add_local_track(
        &mut self,
        playlist_id: u64,
        local_id: u64,
        position: u32,
    ) -> BackendResult<()> {
        self.check(Command::AddTracks)?;
        self.library.add_local_track(playlist_id, local_id, position)
    }

    fn remove_tracks(&mut self, playlist_id: u64, keys: &[TrackKey]) -> BackendResult<()> {
        self.check(Command::RemoveTracks)?;
        self.library.remove_tracks(playlist_id, keys)
    }

    fn search_catalog(&self, query: &str, offset: usize, limit: usize) -> BackendResult<SearchPage> {
        self.check(Command::Search)?;
        Ok(self.library.search(query, offset, limit))
    }
}
