//! Playlist detail view-model
//!
//! Owns the two track sources, the search query, the sort state and the
//! custom-order session of one playlist. The display sequence is recomputed
//! synchronously whenever any of them changes, so readers never see a
//! half-updated list.

use super::filter::filter_tracks;
use super::merge::merge_tracks;
use super::order::ShiftDirection;
use super::session::{OrderSession, ReorderOutcome};
use super::sort::{sort_tracks, SortField, SortState};
use crate::backend::{BackendResult, PlaylistBackend};
use crate::config::ViewConfig;
use crate::model::{DisplayTrack, LocalTrack, RemoteTrack, TrackKey};

/// Fetch state of the track sources
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing fetched yet
    #[default]
    Idle,
    Ready,
    /// Last fetch failed; the message is shown inline with a retry action
    Failed(String),
}

/// Notifications for the surrounding UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Tracks were added or removed; sidebars should refresh counts
    PlaylistChanged(u64),
    /// Start playback of the visible list at `start`
    PlayRequested { playlist_id: u64, start: usize },
    OpenArtist(String),
    OpenAlbum(String),
    Back,
}

/// Result of adding, removing or replacing tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,

    /// Replacement done, but it could not take the old track's custom slot
    Unplaced,

    /// Replacement added but the old track could not be removed (nor the
    /// replacement taken out again); the playlist holds both
    Partial,

    /// The backend refused and nothing changed; sources were reloaded from it
    Failed,
}

impl MutationOutcome {
    /// Whether the playlist's track set changed
    pub fn changed_playlist(&self) -> bool {
        !matches!(self, MutationOutcome::Failed)
    }
}

pub struct TrackView {
    playlist_id: u64,
    remote: Vec<RemoteTrack>,
    local: Vec<LocalTrack>,
    query: String,
    sort: SortState,
    session: OrderSession,
    load_state: LoadState,

    /// Merge output, rebuilt only when the sources change
    merged: Vec<DisplayTrack>,

    /// Filtered and sorted rows
    display: Vec<DisplayTrack>,

    events: Vec<ViewEvent>,
}

impl TrackView {
    pub fn new(playlist_id: u64) -> Self {
        Self {
            playlist_id,
            remote: Vec::new(),
            local: Vec::new(),
            query: String::new(),
            sort: SortState::default(),
            session: OrderSession::new(playlist_id),
            load_state: LoadState::Idle,
            merged: Vec::new(),
            display: Vec::new(),
            events: Vec::new(),
        }
    }

    /// New view starting at the configured sort field
    ///
    /// A configured `Custom` sort takes effect on the first `load`, which
    /// is where the stored order can be fetched.
    pub fn from_config(playlist_id: u64, config: &ViewConfig) -> Self {
        let mut view = Self::new(playlist_id);
        view.sort = SortState::new(config.default_sort);
        view
    }

    pub fn playlist_id(&self) -> u64 {
        self.playlist_id
    }

    /// Rows to render
    pub fn display(&self) -> &[DisplayTrack] {
        &self.display
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn session(&self) -> &OrderSession {
        &self.session
    }

    /// Number of tracks before filtering
    pub fn total_tracks(&self) -> usize {
        self.merged.len()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.merged.iter().map(|t| t.duration_secs as u64).sum()
    }

    /// Fetch both sources; also the retry action after a failure
    ///
    /// Returns false if the fetch failed. The previous rows stay visible.
    pub fn load<B>(&mut self, backend: &mut B) -> bool
    where
        B: PlaylistBackend + ?Sized,
    {
        match fetch_sources(backend, self.playlist_id) {
            Ok((remote, local)) => {
                log::info!(
                    "Loaded playlist {}: {} remote, {} local tracks",
                    self.playlist_id,
                    remote.len(),
                    local.len()
                );
                self.load_state = LoadState::Ready;
                self.set_sources(remote, local);
                if self.sort.field() == SortField::Custom {
                    self.enter_custom(backend);
                }
                true
            }
            Err(e) => {
                log::warn!("Loading playlist {} failed: {}", self.playlist_id, e);
                self.load_state = LoadState::Failed(e.to_string());
                false
            }
        }
    }

    /// Replace both sources (e.g. with data fetched elsewhere)
    pub fn set_sources(&mut self, remote: Vec<RemoteTrack>, local: Vec<LocalTrack>) {
        self.remote = remote;
        self.local = local;
        self.merged = merge_tracks(&self.remote, &self.local);
        self.recompute();
    }

    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.recompute();
        }
    }

    /// Select a sort field as a column header click would
    ///
    /// Entering `Custom` loads or seeds the stored order first.
    pub fn select_sort<B>(&mut self, backend: &mut B, field: SortField)
    where
        B: PlaylistBackend + ?Sized,
    {
        self.sort.select(field);
        if field == SortField::Custom {
            self.enter_custom(backend);
        }
        self.recompute();
    }

    /// Keys of all tracks in custom order, ignoring the filter
    pub fn custom_sequence(&self) -> Vec<TrackKey> {
        let mut tracks = self.merged.clone();
        sort_tracks(
            &mut tracks,
            SortState::new(SortField::Custom),
            self.session.order(),
        );
        tracks.into_iter().map(|t| t.key).collect()
    }

    /// Move a track within the full custom order (drag and drop, up/down)
    pub fn move_track<B>(&mut self, backend: &mut B, from: usize, to: usize) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if !self.in_custom_mode() {
            return ReorderOutcome::Rejected;
        }
        let ordered = self.custom_sequence();
        let outcome = self.session.move_track(backend, &ordered, from, to);
        self.recompute();
        outcome
    }

    /// Move a track, addressed by key, to a slot of the full custom order
    pub fn move_key<B>(&mut self, backend: &mut B, key: TrackKey, to: usize) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if !self.in_custom_mode() {
            return ReorderOutcome::Rejected;
        }
        let ordered = self.custom_sequence();
        let outcome = self.session.move_key(backend, &ordered, key, to);
        self.recompute();
        outcome
    }

    /// Move every selected track one slot up or down
    pub fn shift_selection<B>(
        &mut self,
        backend: &mut B,
        selected: &[TrackKey],
        direction: ShiftDirection,
    ) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if !self.in_custom_mode() {
            return ReorderOutcome::Rejected;
        }
        let ordered = self.custom_sequence();
        let outcome = self
            .session
            .shift_selection(backend, &ordered, selected, direction);
        self.recompute();
        outcome
    }

    /// Append catalog tracks to the playlist
    pub fn add_tracks<B>(&mut self, backend: &mut B, track_ids: &[u64]) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        let result = backend.add_tracks(self.playlist_id, track_ids);
        self.finish_mutation(backend, "add tracks", result)
    }

    /// Place a local collection track at a slot
    pub fn add_local_track<B>(&mut self, backend: &mut B, local_id: u64, position: u32) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        let result = backend.add_local_track(self.playlist_id, local_id, position);
        self.finish_mutation(backend, "add local track", result)
    }

    pub fn remove_tracks<B>(&mut self, backend: &mut B, keys: &[TrackKey]) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        let result = backend.remove_tracks(self.playlist_id, keys);
        self.finish_mutation(backend, "remove tracks", result)
    }

    /// Swap a track for a catalog track picked in the replacement search
    ///
    /// With a custom order loaded the replacement takes the old track's
    /// slot; otherwise it lands where the backend appends it. If the old
    /// track cannot be removed, the add is undone where possible.
    pub fn replace_track<B>(
        &mut self,
        backend: &mut B,
        old: TrackKey,
        replacement_id: u64,
    ) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        let replacement = TrackKey::Remote(replacement_id);
        if old == replacement {
            return MutationOutcome::Applied;
        }

        let slot = self.custom_sequence().iter().position(|k| *k == old);
        let already_present = self.merged.iter().any(|t| t.key == replacement);

        if let Err(e) = backend.add_tracks(self.playlist_id, &[replacement_id]) {
            return self.finish_mutation(backend, "replace track", Err(e));
        }

        let mut outcome = match backend.remove_tracks(self.playlist_id, &[old]) {
            Ok(()) => MutationOutcome::Applied,
            Err(e) => {
                log::warn!(
                    "Failed to remove {} from playlist {} while replacing it: {}",
                    old,
                    self.playlist_id,
                    e
                );
                if already_present {
                    MutationOutcome::Failed
                } else {
                    self.undo_add(backend, replacement)
                }
            }
        };

        if outcome.changed_playlist() {
            self.events.push(ViewEvent::PlaylistChanged(self.playlist_id));
        }
        self.reload_after_mutation(backend);

        if outcome == MutationOutcome::Applied && self.session.is_ready() {
            if let Some(slot) = slot {
                let ordered = self.custom_sequence();
                let slot = slot.min(ordered.len().saturating_sub(1));
                let placed = if ordered.get(slot) == Some(&replacement) {
                    ReorderOutcome::Applied
                } else {
                    self.session.move_key(backend, &ordered, replacement, slot)
                };
                if placed != ReorderOutcome::Applied {
                    log::warn!(
                        "Replacement {} could not take slot {} on playlist {}: {:?}",
                        replacement,
                        slot,
                        self.playlist_id,
                        placed
                    );
                    outcome = MutationOutcome::Unplaced;
                }
                self.recompute();
            }
        }
        outcome
    }

    /// Take a just-added replacement out again after a failed replace
    fn undo_add<B>(&mut self, backend: &mut B, replacement: TrackKey) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        match backend.remove_tracks(self.playlist_id, &[replacement]) {
            Ok(()) => MutationOutcome::Failed,
            Err(e) => {
                log::warn!(
                    "Could not undo adding {} to playlist {}: {}",
                    replacement,
                    self.playlist_id,
                    e
                );
                MutationOutcome::Partial
            }
        }
    }

    /// Request playback starting at a visible row
    pub fn play_from(&mut self, row: usize) {
        if row < self.display.len() {
            self.events.push(ViewEvent::PlayRequested {
                playlist_id: self.playlist_id,
                start: row,
            });
        }
    }

    pub fn open_artist(&mut self, row: usize) {
        if let Some(track) = self.display.get(row) {
            self.events.push(ViewEvent::OpenArtist(track.artist.clone()));
        }
    }

    pub fn open_album(&mut self, row: usize) {
        if let Some(track) = self.display.get(row) {
            self.events.push(ViewEvent::OpenAlbum(track.album.clone()));
        }
    }

    pub fn back(&mut self) {
        self.events.push(ViewEvent::Back);
    }

    /// Drain notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events)
    }

    fn in_custom_mode(&self) -> bool {
        self.sort.field() == SortField::Custom && self.session.is_ready()
    }

    fn enter_custom<B>(&mut self, backend: &mut B)
    where
        B: PlaylistBackend + ?Sized,
    {
        let merged: Vec<TrackKey> = self.merged.iter().map(|t| t.key).collect();
        if let Err(e) = self.session.ensure_loaded(backend, &merged) {
            log::warn!(
                "Custom order for playlist {} unavailable, using added order: {}",
                self.playlist_id,
                e
            );
        }
        self.recompute();
    }

    /// Reload sources after a content change, successful or not
    fn finish_mutation<B>(
        &mut self,
        backend: &mut B,
        action: &str,
        result: BackendResult<()>,
    ) -> MutationOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        let outcome = match result {
            Ok(()) => {
                log::debug!("{} on playlist {} succeeded", action, self.playlist_id);
                self.events.push(ViewEvent::PlaylistChanged(self.playlist_id));
                MutationOutcome::Applied
            }
            Err(e) => {
                log::warn!("Failed to {} on playlist {}: {}", action, self.playlist_id, e);
                MutationOutcome::Failed
            }
        };

        self.reload_after_mutation(backend);
        outcome
    }

    /// Reload sources, and the custom order if one is loaded
    fn reload_after_mutation<B>(&mut self, backend: &mut B)
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.session.is_ready() {
            self.session.resync(backend);
        }
        self.load(backend);
    }

    fn recompute(&mut self) {
        let mut rows = filter_tracks(&self.merged, &self.query);
        sort_tracks(&mut rows, self.sort, self.session.order());
        log::debug!(
            "Playlist {}: {} of {} tracks shown, sorted by {} {:?}",
            self.playlist_id,
            rows.len(),
            self.merged.len(),
            self.sort.field(),
            self.sort.direction()
        );
        self.display = rows;
    }
}

fn fetch_sources<B>(backend: &B, playlist_id: u64) -> BackendResult<(Vec<RemoteTrack>, Vec<LocalTrack>)>
where
    B: PlaylistBackend + ?Sized,
{
    let remote = backend.fetch_remote_tracks(playlist_id)?;
    let local = backend.fetch_local_tracks(playlist_id)?;
    Ok((remote, local))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Command, MemoryBackend};
    use crate::model::{Library, Playlist};
    use crate::view::merge::tests::{local, remote};
    use crate::view::order::CustomOrder;
    use crate::view::sort::SortDirection;

    const PLAYLIST: u64 = 7;

    /// Remote A..E (ids 1..5) and, optionally, local L (id 1) at slot 1
    fn backend(with_local: bool) -> MemoryBackend {
        let mut library = Library::new();
        let mut playlist = Playlist::new(PLAYLIST, "Test".to_string());
        for (i, title) in ["A", "B", "C", "D", "E"].iter().enumerate() {
            let id = i as u64 + 1;
            library.add_catalog_track(remote(id, title, 0));
            playlist.add_track(id);
        }
        library.add_catalog_track(remote(9, "Replacement", 0));
        library.add_local_file(local(1, "L", 0));
        library.add_playlist(playlist);

        let mut backend = MemoryBackend::new(library);
        if with_local {
            backend.add_local_track(PLAYLIST, 1, 1).unwrap();
        }
        backend
    }

    fn titles(view: &TrackView) -> Vec<&str> {
        view.display().iter().map(|t| t.title.as_str()).collect()
    }

    fn loaded(backend: &mut MemoryBackend) -> TrackView {
        let mut view = TrackView::new(PLAYLIST);
        assert!(view.load(backend));
        view
    }

    #[test]
    fn test_load_merges_sources() {
        let mut backend = backend(true);
        let view = loaded(&mut backend);

        assert_eq!(view.load_state(), &LoadState::Ready);
        assert_eq!(titles(&view), vec!["A", "L", "B", "C", "D", "E"]);
        assert_eq!(view.total_tracks(), 6);
    }

    #[test]
    fn test_fetch_failure_sets_error_state_and_retry_recovers() {
        let mut backend = backend(false);
        backend.fail_on(Command::FetchTracks);

        let mut view = TrackView::new(PLAYLIST);
        assert!(!view.load(&mut backend));
        assert!(matches!(view.load_state(), LoadState::Failed(_)));
        assert!(view.display().is_empty());

        backend.clear_failures();
        assert!(view.load(&mut backend));
        assert_eq!(view.display().len(), 5);
    }

    #[test]
    fn test_query_and_sort_recompute() {
        let mut backend = backend(true);
        let mut view = loaded(&mut backend);

        view.set_query("local");
        assert_eq!(titles(&view), vec!["L"]);

        view.set_query("");
        view.select_sort(&mut backend, SortField::Title);
        view.select_sort(&mut backend, SortField::Title);
        assert_eq!(view.sort().direction(), SortDirection::Descending);
        assert_eq!(titles(&view), vec!["L", "E", "D", "C", "B", "A"]);
    }

    #[test]
    fn test_entering_custom_seeds_from_merge_order() {
        let mut backend = backend(true);
        let mut view = loaded(&mut backend);

        view.select_sort(&mut backend, SortField::Custom);

        let stored = CustomOrder::from_entries(&backend.fetch_custom_order(PLAYLIST).unwrap());
        assert_eq!(stored.position(&TrackKey::Remote(1)), Some(0));
        assert_eq!(stored.position(&TrackKey::Local(1)), Some(1));
        assert_eq!(stored.position(&TrackKey::Remote(2)), Some(2));
        assert_eq!(titles(&view), vec!["A", "L", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_move_in_custom_mode() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);

        let outcome = view.move_track(&mut backend, 2, 0);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(titles(&view), vec!["C", "A", "B", "D", "E"]);

        // A fresh view reads the persisted order back
        let mut fresh = loaded(&mut backend);
        fresh.select_sort(&mut backend, SortField::Custom);
        assert_eq!(titles(&fresh), vec!["C", "A", "B", "D", "E"]);
    }

    #[test]
    fn test_move_outside_custom_mode_is_rejected() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        assert_eq!(view.move_track(&mut backend, 0, 1), ReorderOutcome::Rejected);
    }

    #[test]
    fn test_failed_persist_reverts_display() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        backend.fail_on(Command::MoveTrack);

        let outcome = view.move_key(&mut backend, TrackKey::Remote(5), 0);
        assert_eq!(outcome, ReorderOutcome::Reverted);
        assert_eq!(titles(&view), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn test_shift_selection_with_filter_active() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        view.set_query("artist 4");

        let outcome = view.shift_selection(&mut backend, &[TrackKey::Remote(4)], ShiftDirection::Up);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(view.custom_sequence()[2], TrackKey::Remote(4));
        assert_eq!(titles(&view), vec!["D"]);
    }

    #[test]
    fn test_add_and_remove_emit_change_events() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);

        assert_eq!(view.add_tracks(&mut backend, &[9]), MutationOutcome::Applied);
        assert_eq!(view.display().len(), 6);

        assert_eq!(
            view.remove_tracks(&mut backend, &[TrackKey::Remote(1)]),
            MutationOutcome::Applied
        );
        assert_eq!(view.display().len(), 5);

        assert_eq!(
            view.take_events(),
            vec![
                ViewEvent::PlaylistChanged(PLAYLIST),
                ViewEvent::PlaylistChanged(PLAYLIST)
            ]
        );
        assert!(view.take_events().is_empty());
    }

    #[test]
    fn test_failed_add_reloads_without_event() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);

        assert_eq!(view.add_tracks(&mut backend, &[404]), MutationOutcome::Failed);
        assert_eq!(view.display().len(), 5);
        assert!(view.take_events().is_empty());
    }

    #[test]
    fn test_replace_keeps_custom_slot() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);

        let outcome = view.replace_track(&mut backend, TrackKey::Remote(2), 9);
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(titles(&view), vec!["A", "Replacement", "C", "D", "E"]);
    }

    /// A new view over the same backend, sorted by the stored custom order
    fn stored_sequence(backend: &mut MemoryBackend) -> Vec<TrackKey> {
        let mut fresh = loaded(backend);
        fresh.select_sort(backend, SortField::Custom);
        fresh.custom_sequence()
    }

    #[test]
    fn test_move_past_track_added_in_custom_mode_matches_backend() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        view.add_tracks(&mut backend, &[9]);

        assert_eq!(view.move_track(&mut backend, 0, 5), ReorderOutcome::Applied);
        assert_eq!(titles(&view), vec!["B", "C", "D", "E", "Replacement", "A"]);
        assert_eq!(stored_sequence(&mut backend), view.custom_sequence());
    }

    #[test]
    fn test_shift_after_adding_local_track_matches_backend() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        view.add_local_track(&mut backend, 1, 0);
        assert_eq!(titles(&view), vec!["L", "A", "B", "C", "D", "E"]);

        let outcome = view.shift_selection(&mut backend, &[TrackKey::Local(1)], ShiftDirection::Down);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(titles(&view), vec!["A", "L", "B", "C", "D", "E"]);
        assert_eq!(stored_sequence(&mut backend), view.custom_sequence());
    }

    #[test]
    fn test_move_after_remove_matches_backend() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        view.remove_tracks(&mut backend, &[TrackKey::Remote(3)]);

        assert_eq!(view.move_track(&mut backend, 3, 0), ReorderOutcome::Applied);
        assert_eq!(titles(&view), vec!["E", "A", "B", "D"]);
        assert_eq!(stored_sequence(&mut backend), view.custom_sequence());
    }

    #[test]
    fn test_replace_last_track_keeps_slot() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);

        let outcome = view.replace_track(&mut backend, TrackKey::Remote(5), 9);
        assert_eq!(outcome, MutationOutcome::Applied);
        assert_eq!(titles(&view), vec!["A", "B", "C", "D", "Replacement"]);
    }

    #[test]
    fn test_replace_with_failed_remove_reports_partial_change() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        backend.fail_on(Command::RemoveTracks);

        let outcome = view.replace_track(&mut backend, TrackKey::Remote(2), 9);
        assert_eq!(outcome, MutationOutcome::Partial);
        assert_eq!(view.display().len(), 6);
        assert_eq!(view.take_events(), vec![ViewEvent::PlaylistChanged(PLAYLIST)]);
    }

    #[test]
    fn test_replace_with_present_track_and_failed_remove_changes_nothing() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.add_tracks(&mut backend, &[9]);
        view.take_events();
        backend.fail_on(Command::RemoveTracks);

        let outcome = view.replace_track(&mut backend, TrackKey::Remote(2), 9);
        assert_eq!(outcome, MutationOutcome::Failed);
        assert_eq!(view.display().len(), 6);
        assert!(view.take_events().is_empty());
    }

    #[test]
    fn test_replace_reports_unsaved_slot() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);
        view.select_sort(&mut backend, SortField::Custom);
        backend.fail_on(Command::MoveTrack);
        backend.fail_on(Command::SetCustomOrder);

        let outcome = view.replace_track(&mut backend, TrackKey::Remote(2), 9);
        assert_eq!(outcome, MutationOutcome::Unplaced);
        assert_eq!(titles(&view), vec!["A", "C", "D", "E", "Replacement"]);
        assert_eq!(view.take_events(), vec![ViewEvent::PlaylistChanged(PLAYLIST)]);
    }

    #[test]
    fn test_navigation_events() {
        let mut backend = backend(false);
        let mut view = loaded(&mut backend);

        view.play_from(2);
        view.play_from(99);
        view.open_artist(0);
        view.open_album(1);
        view.back();

        assert_eq!(
            view.take_events(),
            vec![
                ViewEvent::PlayRequested {
                    playlist_id: PLAYLIST,
                    start: 2
                },
                ViewEvent::OpenArtist("Artist 1".to_string()),
                ViewEvent::OpenAlbum("Album 2".to_string()),
                ViewEvent::Back,
            ]
        );
    }

    #[test]
    fn test_from_config_custom_sort_loads_on_first_load() {
        let mut backend = backend(false);
        let config = ViewConfig::default().with_sort(SortField::Custom);

        let mut view = TrackView::from_config(PLAYLIST, &config);
        view.load(&mut backend);

        assert!(view.session().is_ready());
        assert!(backend.has_custom_order(PLAYLIST).unwrap());
    }
}
