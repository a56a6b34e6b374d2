//! Playlist View - merged playlist track view-model
//!
//! This library interleaves remote and local playlist tracks, applies search
//! and sort, and keeps a user-defined custom order with optimistic
//! reordering against a fallible backend.

pub mod backend;
pub mod config;
pub mod model;
pub mod search;
pub mod store;
pub mod view;

pub use backend::{BackendError, MemoryBackend, PlaylistBackend, XmlBackend};
pub use config::ViewConfig;
pub use view::{PlaylistBrowser, TrackView};
