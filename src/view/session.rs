//! Custom-order session for one playlist
//!
//! Holds the in-memory custom order, applies reorders optimistically and
//! persists them through a FIFO queue. The backend stays the source of truth:
//! when a persist fails the queue is dropped and the order is reloaded. If
//! the reload fails too, the last order the backend confirmed is restored.
//!
//! Every local change bumps a revision. Reload responses carry the revision
//! they were requested at and are discarded if the order changed since, so a
//! slow response cannot overwrite newer optimistic state.

use super::order::{move_item, shift_selected, CustomOrder, ShiftDirection};
use crate::backend::{BackendResult, PlaylistBackend};
use crate::model::{OrderEntry, TrackKey};
use std::collections::VecDeque;

/// Result of a reorder as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Applied locally and confirmed by the backend
    Applied,

    /// Not applicable (boundary, bad index, order not loaded); nothing changed
    Rejected,

    /// Persisting failed; the order was resynchronised with the backend
    Reverted,
}

/// Backend call that makes a local change durable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistRequest {
    Initialize(Vec<OrderEntry>),
    Move { key: TrackKey, position: usize },
    Overwrite(Vec<OrderEntry>),
}

/// Queued persist with the order it will confirm
#[derive(Debug, Clone)]
pub struct PendingPersist {
    pub revision: u64,
    pub request: PersistRequest,
    snapshot: CustomOrder,
}

/// Proof of when a reload was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    revision: u64,
}

#[derive(Debug, Clone)]
pub struct OrderSession {
    playlist_id: u64,

    /// None until custom mode was entered once
    order: Option<CustomOrder>,

    /// Last order acknowledged by the backend
    confirmed: Option<CustomOrder>,

    revision: u64,
    queue: VecDeque<PendingPersist>,
}

impl OrderSession {
    pub fn new(playlist_id: u64) -> Self {
        Self {
            playlist_id,
            order: None,
            confirmed: None,
            revision: 0,
            queue: VecDeque::new(),
        }
    }

    pub fn playlist_id(&self) -> u64 {
        self.playlist_id
    }

    pub fn is_ready(&self) -> bool {
        self.order.is_some()
    }

    pub fn order(&self) -> Option<&CustomOrder> {
        self.order.as_ref()
    }

    pub fn confirmed(&self) -> Option<&CustomOrder> {
        self.confirmed.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of persists not yet sent
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Forget everything and go back to the uninitialized state
    pub fn reset(&mut self) {
        self.order = None;
        self.confirmed = None;
        self.queue.clear();
        self.revision += 1;
    }

    /// Enter custom mode
    ///
    /// Loads the stored order, or seeds one from `merged` (the current merge
    /// order) and persists it as the initial order. Errors from the existence
    /// check or the fetch are returned; a failed initial persist is recovered
    /// like any other persist failure.
    pub fn ensure_loaded<B>(&mut self, backend: &mut B, merged: &[TrackKey]) -> BackendResult<()>
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.order.is_some() {
            return Ok(());
        }

        if backend.has_custom_order(self.playlist_id)? {
            let entries = backend.fetch_custom_order(self.playlist_id)?;
            log::info!(
                "Loaded custom order for playlist {} ({} entries)",
                self.playlist_id,
                entries.len()
            );
            self.adopt(Some(CustomOrder::from_entries(&entries)));
            return Ok(());
        }

        log::info!(
            "Seeding custom order for playlist {} from {} tracks",
            self.playlist_id,
            merged.len()
        );
        let order = CustomOrder::from_sequence(merged);
        let entries = order.entries();
        self.apply(order, PersistRequest::Initialize(entries));
        self.flush(backend);
        Ok(())
    }

    /// Move the track at `from` to `to` in the full custom-ordered list
    pub fn move_track<B>(
        &mut self,
        backend: &mut B,
        ordered: &[TrackKey],
        from: usize,
        to: usize,
    ) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.order.is_none() {
            return ReorderOutcome::Rejected;
        }

        let mut keys = ordered.to_vec();
        if !move_item(&mut keys, from, to) {
            return ReorderOutcome::Rejected;
        }

        let key = keys[to];
        let order = CustomOrder::from_sequence(&keys);

        // The backend moves one key within its stored order. That only
        // yields `order` when the stored sequence is exactly `ordered`;
        // tracks sorted by the added-index fallback are not stored yet.
        let request = if self.holds_sequence(ordered) {
            log::debug!("Moving {} from {} to {}", key, from, to);
            PersistRequest::Move { key, position: to }
        } else {
            log::debug!(
                "Moving {} from {} to {}, rewriting the stored order ({} of {} tracks stored)",
                key,
                from,
                to,
                self.order.as_ref().map_or(0, CustomOrder::len),
                ordered.len()
            );
            PersistRequest::Overwrite(order.entries())
        };

        self.apply(order, request);
        self.settle(backend)
    }

    /// Move a track, addressed by key, to `to`
    pub fn move_key<B>(
        &mut self,
        backend: &mut B,
        ordered: &[TrackKey],
        key: TrackKey,
        to: usize,
    ) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        match ordered.iter().position(|k| *k == key) {
            Some(from) => self.move_track(backend, ordered, from, to),
            None => ReorderOutcome::Rejected,
        }
    }

    /// Move all selected tracks one slot up or down, persisted as one overwrite
    pub fn shift_selection<B>(
        &mut self,
        backend: &mut B,
        ordered: &[TrackKey],
        selected: &[TrackKey],
        direction: ShiftDirection,
    ) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.order.is_none() {
            return ReorderOutcome::Rejected;
        }

        let mut keys = ordered.to_vec();
        if !shift_selected(&mut keys, selected, direction) {
            log::debug!("Batch {:?} rejected for {} tracks", direction, selected.len());
            return ReorderOutcome::Rejected;
        }

        let order = CustomOrder::from_sequence(&keys);
        let entries = order.entries();
        self.apply(order, PersistRequest::Overwrite(entries));
        self.settle(backend)
    }

    /// Next queued persist, for callers that drive the backend themselves
    pub fn pop_request(&mut self) -> Option<PendingPersist> {
        self.queue.pop_front()
    }

    /// Record the backend's answer to a persist
    ///
    /// On failure the rest of the queue is dropped; those changes were built
    /// on top of the failed one. The caller must then reload.
    pub fn complete(&mut self, pending: PendingPersist, result: BackendResult<()>) -> bool {
        match result {
            Ok(()) => {
                self.confirmed = Some(pending.snapshot);
                true
            }
            Err(e) => {
                log::warn!(
                    "Persisting custom order for playlist {} failed (revision {}): {}",
                    self.playlist_id,
                    pending.revision,
                    e
                );
                self.queue.clear();
                false
            }
        }
    }

    /// Start a reload of the stored order
    pub fn begin_reload(&self) -> ReloadTicket {
        ReloadTicket {
            revision: self.revision,
        }
    }

    /// Apply a reload response: `Some` = stored order, `None` = nothing stored
    ///
    /// Returns false if the response is stale and was discarded. A failed
    /// reload falls back to the last confirmed order.
    pub fn finish_reload(
        &mut self,
        ticket: ReloadTicket,
        result: BackendResult<Option<Vec<OrderEntry>>>,
    ) -> bool {
        if ticket.revision != self.revision {
            log::debug!(
                "Discarding stale custom order reload for playlist {} (revision {} < {})",
                self.playlist_id,
                ticket.revision,
                self.revision
            );
            return false;
        }

        match result {
            Ok(Some(entries)) => self.adopt(Some(CustomOrder::from_entries(&entries))),
            Ok(None) => self.adopt(None),
            Err(e) => {
                log::warn!(
                    "Reloading custom order for playlist {} failed, restoring last confirmed order: {}",
                    self.playlist_id,
                    e
                );
                let confirmed = self.confirmed.clone();
                self.adopt(confirmed);
            }
        }
        true
    }

    /// Send every queued persist; on the first failure resync and stop
    ///
    /// Returns true if the whole queue was confirmed.
    pub fn flush<B>(&mut self, backend: &mut B) -> bool
    where
        B: PlaylistBackend + ?Sized,
    {
        while let Some(pending) = self.pop_request() {
            let result = send(backend, self.playlist_id, &pending.request);
            if !self.complete(pending, result) {
                self.resync(backend);
                return false;
            }
        }
        true
    }

    /// Reload from the backend right away
    pub fn resync<B>(&mut self, backend: &mut B)
    where
        B: PlaylistBackend + ?Sized,
    {
        let ticket = self.begin_reload();
        let result = fetch_stored(backend, self.playlist_id);
        self.finish_reload(ticket, result);
    }

    /// Whether the current order lists exactly `ordered`, in that sequence
    fn holds_sequence(&self, ordered: &[TrackKey]) -> bool {
        self.order
            .as_ref()
            .is_some_and(|order| order.sequence() == ordered)
    }

    fn apply(&mut self, order: CustomOrder, request: PersistRequest) {
        self.revision += 1;
        self.order = Some(order.clone());
        self.queue.push_back(PendingPersist {
            revision: self.revision,
            request,
            snapshot: order,
        });
    }

    /// Take an authoritative order as both current and confirmed
    fn adopt(&mut self, order: Option<CustomOrder>) {
        self.revision += 1;
        self.order = order.clone();
        self.confirmed = order;
    }

    fn settle<B>(&mut self, backend: &mut B) -> ReorderOutcome
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.flush(backend) {
            ReorderOutcome::Applied
        } else {
            ReorderOutcome::Reverted
        }
    }
}

fn send<B>(backend: &mut B, playlist_id: u64, request: &PersistRequest) -> BackendResult<()>
where
    B: PlaylistBackend + ?Sized,
{
    match request {
        PersistRequest::Initialize(entries) => backend.init_custom_order(playlist_id, entries),
        PersistRequest::Move { key, position } => backend.move_track(playlist_id, *key, *position),
        PersistRequest::Overwrite(entries) => backend.set_custom_order(playlist_id, entries),
    }
}

fn fetch_stored<B>(backend: &B, playlist_id: u64) -> BackendResult<Option<Vec<OrderEntry>>>
where
    B: PlaylistBackend + ?Sized,
{
    if backend.has_custom_order(playlist_id)? {
        backend.fetch_custom_order(playlist_id).map(Some)
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, Command, MemoryBackend};
    use crate::model::{Library, Playlist, Quality, RemoteTrack};

    const PLAYLIST: u64 = 1;

    fn backend_with(ids: &[u64]) -> MemoryBackend {
        let mut library = Library::new();
        let mut playlist = Playlist::new(PLAYLIST, "Test".to_string());
        for &id in ids {
            library.add_catalog_track(RemoteTrack {
                id,
                title: format!("Track {}", id),
                artist: "Artist".to_string(),
                album: "Album".to_string(),
                duration_secs: 100,
                quality: Quality::default(),
                label: None,
                artwork: None,
                added_index: 0,
            });
            playlist.add_track(id);
        }
        library.add_playlist(playlist);
        MemoryBackend::new(library)
    }

    fn keys(ids: &[u64]) -> Vec<TrackKey> {
        ids.iter().map(|id| TrackKey::Remote(*id)).collect()
    }

    fn stored(backend: &MemoryBackend) -> Vec<TrackKey> {
        CustomOrder::from_entries(&backend.fetch_custom_order(PLAYLIST).unwrap()).sequence()
    }

    fn ready_session(backend: &mut MemoryBackend, ids: &[u64]) -> OrderSession {
        let mut session = OrderSession::new(PLAYLIST);
        session.ensure_loaded(backend, &keys(ids)).unwrap();
        session
    }

    #[test]
    fn test_seeds_and_persists_initial_order() {
        let mut backend = backend_with(&[1, 2, 3]);
        let session = ready_session(&mut backend, &[1, 2, 3]);

        assert!(session.is_ready());
        assert_eq!(session.order().unwrap().sequence(), keys(&[1, 2, 3]));
        assert_eq!(stored(&backend), keys(&[1, 2, 3]));
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn test_loads_existing_order_verbatim() {
        let mut backend = backend_with(&[1, 2, 3]);
        backend
            .set_custom_order(
                PLAYLIST,
                &[
                    OrderEntry::new(TrackKey::Remote(3), 0),
                    OrderEntry::new(TrackKey::Remote(1), 4),
                ],
            )
            .unwrap();

        let session = ready_session(&mut backend, &[1, 2, 3]);
        let order = session.order().unwrap();
        assert_eq!(order.position(&TrackKey::Remote(1)), Some(4));
        assert_eq!(order.position(&TrackKey::Remote(2)), None);
    }

    #[test]
    fn test_move_applies_and_persists() {
        let mut backend = backend_with(&[1, 2, 3, 4, 5]);
        let mut session = ready_session(&mut backend, &[1, 2, 3, 4, 5]);

        let outcome = session.move_track(&mut backend, &keys(&[1, 2, 3, 4, 5]), 2, 0);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(session.order().unwrap().sequence(), keys(&[3, 1, 2, 4, 5]));
        assert_eq!(stored(&backend), keys(&[3, 1, 2, 4, 5]));
        assert_eq!(session.confirmed(), session.order());
    }

    #[test]
    fn test_move_with_unstored_tracks_rewrites_whole_order() {
        let mut backend = backend_with(&[1, 2, 3, 4]);
        // Track 4 joined after the order was seeded
        let mut session = ready_session(&mut backend, &[1, 2, 3]);

        let outcome = session.move_track(&mut backend, &keys(&[1, 2, 3, 4]), 0, 3);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(session.order().unwrap().sequence(), keys(&[2, 3, 4, 1]));
        assert_eq!(stored(&backend), keys(&[2, 3, 4, 1]));
    }

    #[test]
    fn test_move_of_stored_sequence_sends_single_move() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);
        backend.fail_on(Command::SetCustomOrder);

        let outcome = session.move_track(&mut backend, &keys(&[1, 2, 3]), 2, 0);
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(stored(&backend), keys(&[3, 1, 2]));
    }

    #[test]
    fn test_failed_move_reverts_to_backend_state() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);
        backend.fail_on(Command::MoveTrack);

        let outcome = session.move_track(&mut backend, &keys(&[1, 2, 3]), 0, 2);
        assert_eq!(outcome, ReorderOutcome::Reverted);
        assert_eq!(session.order().unwrap().sequence(), keys(&[1, 2, 3]));
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn test_failed_reload_restores_confirmed_order() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);
        session.move_track(&mut backend, &keys(&[1, 2, 3]), 2, 0);

        backend.fail_on(Command::SetCustomOrder);
        backend.fail_on(Command::FetchCustomOrder);
        let outcome = session.shift_selection(
            &mut backend,
            &keys(&[3, 1, 2]),
            &keys(&[2]),
            ShiftDirection::Up,
        );

        assert_eq!(outcome, ReorderOutcome::Reverted);
        assert_eq!(session.order().unwrap().sequence(), keys(&[3, 1, 2]));
    }

    #[test]
    fn test_batch_rejected_at_boundary() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);
        let before = backend.call_count();

        let outcome = session.shift_selection(
            &mut backend,
            &keys(&[1, 2, 3]),
            &keys(&[1, 3]),
            ShiftDirection::Up,
        );
        assert_eq!(outcome, ReorderOutcome::Rejected);
        assert_eq!(session.order().unwrap().sequence(), keys(&[1, 2, 3]));
        assert_eq!(backend.call_count(), before);
    }

    #[test]
    fn test_batch_down_persists_whole_order() {
        let mut backend = backend_with(&[1, 2, 3, 4]);
        let mut session = ready_session(&mut backend, &[1, 2, 3, 4]);

        let outcome = session.shift_selection(
            &mut backend,
            &keys(&[1, 2, 3, 4]),
            &keys(&[1, 2]),
            ShiftDirection::Down,
        );
        assert_eq!(outcome, ReorderOutcome::Applied);
        assert_eq!(stored(&backend), keys(&[3, 1, 2, 4]));
    }

    #[test]
    fn test_moves_rejected_before_loading() {
        let mut backend = backend_with(&[1, 2]);
        let mut session = OrderSession::new(PLAYLIST);
        let outcome = session.move_track(&mut backend, &keys(&[1, 2]), 0, 1);
        assert_eq!(outcome, ReorderOutcome::Rejected);
    }

    #[test]
    fn test_failed_initialize_leaves_session_uninitialized() {
        let mut backend = backend_with(&[1, 2]);
        backend.fail_on(Command::InitCustomOrder);

        let mut session = OrderSession::new(PLAYLIST);
        session.ensure_loaded(&mut backend, &keys(&[1, 2])).unwrap();

        assert!(!session.is_ready());
        assert!(!backend.has_custom_order(PLAYLIST).unwrap());
    }

    #[test]
    fn test_fetch_failure_is_returned() {
        let mut backend = backend_with(&[1]);
        backend.fail_on(Command::FetchCustomOrder);

        let mut session = OrderSession::new(PLAYLIST);
        let result = session.ensure_loaded(&mut backend, &keys(&[1]));
        assert!(matches!(result, Err(BackendError::Unavailable(_))));
        assert!(!session.is_ready());
    }

    #[test]
    fn test_stale_reload_is_discarded() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);

        let ticket = session.begin_reload();
        let stale = Ok(Some(CustomOrder::from_sequence(&keys(&[1, 2, 3])).entries()));

        session.move_track(&mut backend, &keys(&[1, 2, 3]), 0, 2);
        assert!(!session.finish_reload(ticket, stale));
        assert_eq!(session.order().unwrap().sequence(), keys(&[2, 3, 1]));
    }

    #[test]
    fn test_split_api_drops_queue_after_failure() {
        let mut backend = backend_with(&[1, 2, 3]);
        let mut session = ready_session(&mut backend, &[1, 2, 3]);
        backend.fail_on(Command::MoveTrack);
        backend.fail_on(Command::SetCustomOrder);

        // Two optimistic changes queued before anything is sent
        session.apply(
            CustomOrder::from_sequence(&keys(&[2, 1, 3])),
            PersistRequest::Move {
                key: TrackKey::Remote(2),
                position: 0,
            },
        );
        session.apply(
            CustomOrder::from_sequence(&keys(&[2, 3, 1])),
            PersistRequest::Overwrite(CustomOrder::from_sequence(&keys(&[2, 3, 1])).entries()),
        );
        assert_eq!(session.pending(), 2);

        let first = session.pop_request().unwrap();
        let result = send(&mut backend, PLAYLIST, &first.request);
        assert!(!session.complete(first, result));
        assert_eq!(session.pending(), 0);

        session.resync(&mut backend);
        assert_eq!(session.order().unwrap().sequence(), keys(&[1, 2, 3]));
    }
}
