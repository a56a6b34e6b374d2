//! View-models
//!
//! The track view runs a fixed pipeline on every input change:
//! merge (remote + local) -> filter (query) -> sort (field, custom order).
//! Each stage is a pure function over the previous stage's output.

pub mod filter;
pub mod merge;
pub mod order;
pub mod playlists;
pub mod replace;
pub mod session;
pub mod sort;
pub mod track_view;

pub use filter::filter_tracks;
pub use merge::merge_tracks;
pub use order::{CustomOrder, ShiftDirection};
pub use playlists::{filter_playlists, FolderFilter, PlaylistBrowser, PlaylistFilter};
pub use replace::ReplacementSearch;
pub use session::{OrderSession, PendingPersist, PersistRequest, ReloadTicket, ReorderOutcome};
pub use sort::{sort_tracks, SortDirection, SortField, SortState};
pub use track_view::{LoadState, MutationOutcome, TrackView, ViewEvent};
