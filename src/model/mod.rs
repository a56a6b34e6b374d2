//! Data model shared by the view-models and the backends
//!
//! Remote and local tracks keep their own id namespaces; `TrackKey` is the
//! identity used everywhere a track from either source is addressed.

mod library;
mod playlist;
mod track;

pub use library::Library;
pub use playlist::{Folder, LocalEntry, Playlist, PlaylistEntry, PlaylistSummary};
pub use track::{DisplayTrack, LocalTrack, OrderEntry, Quality, RemoteTrack, TrackKey, TrackText};
