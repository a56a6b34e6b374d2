//! Catalog search behind the track-replacement dialog

use crate::backend::PlaylistBackend;
use crate::config::ViewConfig;
use crate::model::{RemoteTrack, TrackKey};
use crate::search::clamp_limit;

/// Paged catalog search for a replacement of one track
#[derive(Debug)]
pub struct ReplacementSearch {
    target: TrackKey,
    query: String,
    page_size: usize,
    results: Vec<RemoteTrack>,
    total: usize,
    error: Option<String>,
}

impl ReplacementSearch {
    pub fn new(target: TrackKey, config: &ViewConfig) -> Self {
        Self {
            target,
            query: String::new(),
            page_size: clamp_limit(config.search_page_size),
            results: Vec::new(),
            total: 0,
            error: None,
        }
    }

    /// Track being replaced
    pub fn target(&self) -> TrackKey {
        self.target
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results fetched so far, across pages
    pub fn results(&self) -> &[RemoteTrack] {
        &self.results
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.results.len() < self.total
    }

    /// Run a new query from the first page
    pub fn search<B>(&mut self, backend: &B, query: &str)
    where
        B: PlaylistBackend + ?Sized,
    {
        self.query = query.to_string();
        self.results.clear();
        self.total = 0;
        self.fetch(backend);
    }

    /// Append the next page of the current query
    pub fn load_more<B>(&mut self, backend: &B)
    where
        B: PlaylistBackend + ?Sized,
    {
        if self.has_more() {
            self.fetch(backend);
        }
    }

    fn fetch<B>(&mut self, backend: &B)
    where
        B: PlaylistBackend + ?Sized,
    {
        let offset = self.results.len();
        match backend.search_catalog(&self.query, offset, self.page_size) {
            Ok(page) => {
                log::debug!(
                    "Search '{}' offset {}: {} of {} results",
                    self.query,
                    offset,
                    page.items.len(),
                    page.total
                );
                self.error = None;
                self.total = page.total;
                self.results.extend(page.items);
            }
            Err(e) => {
                log::warn!("Catalog search '{}' failed: {}", self.query, e);
                self.error = Some(e.to_string());
            }
        }
    }
}
