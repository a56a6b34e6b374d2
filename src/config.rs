//! View configuration

use crate::search::{clamp_limit, MAX_PAGE_SIZE};
use crate::view::SortField;
use std::path::PathBuf;

/// Default location of the library file, before `~` expansion
pub const DEFAULT_LIBRARY_PATH: &str = "~/.local/share/playlist-view/library.xml";

/// Settings shared by the view-models and the CLI
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Library XML file served by the file backend
    pub library_path: PathBuf,

    /// Sort field a freshly opened playlist starts with
    pub default_sort: SortField,

    /// Page size for catalog searches (clamped to the backend maximum)
    pub search_page_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::new(PathBuf::from(
            shellexpand::tilde(DEFAULT_LIBRARY_PATH).into_owned(),
        ))
    }
}

impl ViewConfig {
    pub fn new(library_path: PathBuf) -> Self {
        Self {
            library_path,
            default_sort: SortField::Default,
            search_page_size: 20,
        }
    }

    /// Set the initial sort field
    pub fn with_sort(mut self, field: SortField) -> Self {
        self.default_sort = field;
        self
    }

    /// Set the search page size
    pub fn with_page_size(mut self, size: usize) -> Self {
        if size > MAX_PAGE_SIZE {
            log::warn!("Search page size {} capped at {}", size, MAX_PAGE_SIZE);
        }
        self.search_page_size = clamp_limit(size);
        self
    }
}
