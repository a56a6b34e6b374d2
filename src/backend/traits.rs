//! Backend command interface and its error type

use crate::model::{Folder, LocalTrack, OrderEntry, PlaylistSummary, RemoteTrack, TrackKey};
use crate::search::SearchPage;
use thiserror::Error;

/// Failure reported by a backend command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("playlist {0} not found")]
    PlaylistNotFound(u64),

    #[error("track {0} not found")]
    TrackNotFound(TrackKey),

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Commands a playlist view issues against the backend
///
/// Everything is request/response and fallible. Reads take `&self`, writes
/// take `&mut self`.
pub trait PlaylistBackend {
    /// All playlist folders
    fn list_folders(&self) -> BackendResult<Vec<Folder>>;

    /// All playlists, unfiltered
    fn list_playlists(&self) -> BackendResult<Vec<PlaylistSummary>>;

    /// Remote tracks of a playlist, in remote order
    fn fetch_remote_tracks(&self, playlist_id: u64) -> BackendResult<Vec<RemoteTrack>>;

    /// Local tracks of a playlist with their positions
    fn fetch_local_tracks(&self, playlist_id: u64) -> BackendResult<Vec<LocalTrack>>;

    /// Whether a custom order was ever stored for the playlist
    fn has_custom_order(&self, playlist_id: u64) -> BackendResult<bool>;

    /// Stored custom order (empty if none)
    fn fetch_custom_order(&self, playlist_id: u64) -> BackendResult<Vec<OrderEntry>>;

    /// Store the first custom order for a playlist
    fn init_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()>;

    /// Overwrite the whole custom order
    fn set_custom_order(&mut self, playlist_id: u64, entries: &[OrderEntry]) -> BackendResult<()>;

    /// Move one track to a new position in the stored custom order
    fn move_track(&mut self, playlist_id: u64, key: TrackKey, new_position: usize)
        -> BackendResult<()>;

    /// Append catalog tracks to a playlist
    fn add_tracks(&mut self, playlist_id: u64, track_ids: &[u64]) -> BackendResult<()>;

    /// Place a local collection track at a slot of the playlist
    fn add_local_track(&mut self, playlist_id: u64, local_id: u64, position: u32)
        -> BackendResult<()>;

    /// Remove tracks (remote or local) from a playlist
    fn remove_tracks(&mut self, playlist_id: u64, keys: &[TrackKey]) -> BackendResult<()>;

    /// Free-text catalog search, one page at a time
    fn search_catalog(&self, query: &str, offset: usize, limit: usize) -> BackendResult<SearchPage>;
}
