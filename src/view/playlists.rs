//! Playlist browser: folder, offline and name filters over the playlist list

use super::track_view::LoadState;
use crate::backend::PlaylistBackend;
use crate::model::{Folder, PlaylistSummary};

/// Which folder the browser is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderFilter {
    #[default]
    All,
    /// Playlists outside any folder
    Unfiled,
    Folder(u64),
}

impl FolderFilter {
    fn accepts(&self, playlist: &PlaylistSummary) -> bool {
        match self {
            FolderFilter::All => true,
            FolderFilter::Unfiled => playlist.folder_id.is_none(),
            FolderFilter::Folder(id) => playlist.folder_id == Some(*id),
        }
    }
}

/// Combined browser filter; every criterion must hold
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistFilter {
    pub query: String,
    pub folder: FolderFilter,
    pub offline_only: bool,
}

impl PlaylistFilter {
    pub fn matches(&self, playlist: &PlaylistSummary) -> bool {
        let needle = self.query.trim().to_lowercase();
        (needle.is_empty() || playlist.name.to_lowercase().contains(&needle))
            && self.folder.accepts(playlist)
            && (!self.offline_only || playlist.offline)
    }
}

/// Apply a filter and order the result by name (case-insensitive, then id)
pub fn filter_playlists(playlists: &[PlaylistSummary], filter: &PlaylistFilter) -> Vec<PlaylistSummary> {
    let mut visible: Vec<PlaylistSummary> = playlists
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect();
    visible.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then(a.id.cmp(&b.id))
    });
    visible
}

#[derive(Debug, Default)]
pub struct PlaylistBrowser {
    folders: Vec<Folder>,
    playlists: Vec<PlaylistSummary>,
    filter: PlaylistFilter,
    load_state: LoadState,
    visible: Vec<PlaylistSummary>,
}

impl PlaylistBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch folders and playlists; returns false on failure
    pub fn load<B>(&mut self, backend: &B) -> bool
    where
        B: PlaylistBackend + ?Sized,
    {
        let fetched = backend
            .list_folders()
            .and_then(|folders| Ok((folders, backend.list_playlists()?)));

        match fetched {
            Ok((folders, playlists)) => {
                log::info!(
                    "Loaded {} playlists in {} folders",
                    playlists.len(),
                    folders.len()
                );
                self.folders = folders;
                self.playlists = playlists;
                self.load_state = LoadState::Ready;
                self.recompute();
                true
            }
            Err(e) => {
                log::warn!("Loading playlists failed: {}", e);
                self.load_state = LoadState::Failed(e.to_string());
                false
            }
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn filter(&self) -> &PlaylistFilter {
        &self.filter
    }

    /// Playlists passing the current filter, ordered by name
    pub fn visible(&self) -> &[PlaylistSummary] {
        &self.visible
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.recompute();
    }

    pub fn set_folder(&mut self, folder: FolderFilter) {
        self.filter.folder = folder;
        self.recompute();
    }

    pub fn set_offline_only(&mut self, offline_only: bool) {
        self.filter.offline_only = offline_only;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = filter_playlists(&self.playlists, &self.filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Command, MemoryBackend};
    use crate::model::{Library, Playlist};

    fn library() -> Library {
        let mut library = Library::new();
        library.add_folder(Folder {
            id: 1,
            name: "Work".to_string(),
        });

        let mut focus = Playlist::new(10, "focus".to_string());
        focus.folder_id = Some(1);
        focus.offline = true;
        let mut commute = Playlist::new(11, "Commute".to_string());
        commute.offline = true;
        let running = Playlist::new(12, "Running".to_string());
        let mut deep = Playlist::new(13, "Deep Focus".to_string());
        deep.folder_id = Some(1);

        for playlist in [focus, commute, running, deep] {
            library.add_playlist(playlist);
        }
        library
    }

    fn names(browser: &PlaylistBrowser) -> Vec<&str> {
        browser.visible().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_lists_all_sorted_by_name() {
        let backend = MemoryBackend::new(library());
        let mut browser = PlaylistBrowser::new();
        assert!(browser.load(&backend));

        assert_eq!(names(&browser), vec!["Commute", "Deep Focus", "focus", "Running"]);
        assert_eq!(browser.folders().len(), 1);
    }

    #[test]
    fn test_filters_combine() {
        let backend = MemoryBackend::new(library());
        let mut browser = PlaylistBrowser::new();
        browser.load(&backend);

        browser.set_query("FOCUS");
        assert_eq!(names(&browser), vec!["Deep Focus", "focus"]);

        browser.set_offline_only(true);
        assert_eq!(names(&browser), vec!["focus"]);

        browser.set_query("");
        browser.set_folder(FolderFilter::Unfiled);
        assert_eq!(names(&browser), vec!["Commute"]);

        browser.set_offline_only(false);
        browser.set_folder(FolderFilter::Folder(1));
        assert_eq!(names(&browser), vec!["Deep Focus", "focus"]);
    }

    #[test]
    fn test_load_failure() {
        let mut backend = MemoryBackend::new(library());
        backend.fail_on(Command::FetchTracks);

        let mut browser = PlaylistBrowser::new();
        assert!(!browser.load(&backend));
        assert!(matches!(browser.load_state(), LoadState::Failed(_)));
        assert!(browser.visible().is_empty());
    }
}
