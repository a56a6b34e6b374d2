use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Identity of a track inside a playlist view
///
/// Remote and local tracks live in separate id namespaces, so the same raw id
/// can refer to two different tracks. The variant keeps them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackKey {
    /// Track from the streaming service catalog
    Remote(u64),

    /// Track from the user's local file collection
    Local(u64),
}

impl TrackKey {
    /// Raw id within the track's own namespace
    pub fn raw_id(&self) -> u64 {
        match self {
            TrackKey::Remote(id) | TrackKey::Local(id) => *id,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, TrackKey::Local(_))
    }
}

/// Composite key format: `{id}:{is_local}`, e.g. `12:false`
impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.raw_id(), self.is_local())
    }
}

impl FromStr for TrackKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, local) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid track key '{}': expected <id>:<true|false>", s))?;

        let id: u64 = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid track id in '{}'", s))?;

        match local.trim() {
            "true" => Ok(TrackKey::Local(id)),
            "false" => Ok(TrackKey::Remote(id)),
            other => Err(format!("invalid locality '{}' in '{}'", other, s)),
        }
    }
}

/// Audio quality attributes reported for a track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality {
    /// Bits per sample (e.g. 16, 24)
    pub bit_depth: Option<u8>,

    /// Sample rate in Hz
    pub sample_rate: Option<u32>,

    /// Whether the service flags this track as hi-res
    pub hires: bool,
}

impl Quality {
    /// Short label like "24-bit / 96 kHz", or None when nothing is known
    pub fn label(&self) -> Option<String> {
        match (self.bit_depth, self.sample_rate) {
            (Some(bits), Some(rate)) => Some(format!("{}-bit / {} kHz", bits, format_khz(rate))),
            (Some(bits), None) => Some(format!("{}-bit", bits)),
            (None, Some(rate)) => Some(format!("{} kHz", format_khz(rate))),
            (None, None) => None,
        }
    }
}

fn format_khz(rate: u32) -> String {
    if rate % 1000 == 0 {
        (rate / 1000).to_string()
    } else {
        format!("{:.1}", rate as f64 / 1000.0)
    }
}

/// Track from the streaming service, as returned for a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTrack {
    /// Catalog id (always positive)
    pub id: u64,

    pub title: String,
    pub artist: String,
    pub album: String,

    /// Duration in seconds
    pub duration_secs: u32,

    pub quality: Quality,

    /// Record label, if the service knows it
    pub label: Option<String>,

    /// Cover art URL
    pub artwork: Option<String>,

    /// Position in the remote ordering, assigned by the service
    pub added_index: u32,
}

/// Track added from the local file collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTrack {
    /// Id in the local collection namespace
    pub id: u64,

    pub title: String,
    pub artist: String,
    pub album: String,

    /// Duration in seconds
    pub duration_secs: u32,

    pub quality: Quality,

    pub label: Option<String>,
    pub artwork: Option<String>,

    /// File backing this track
    pub file_path: PathBuf,

    /// Absolute slot this track claims in the merged playlist (0-based)
    pub playlist_position: u32,
}

/// Unified row shown in a playlist view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTrack {
    pub key: TrackKey,

    /// 1-based position in the merged order, independent of the track id
    pub number: usize,

    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration_secs: u32,
    pub quality: Quality,
    pub label: Option<String>,
    pub artwork: Option<String>,

    /// Recency proxy: remote added index, or the slot for local tracks
    pub added_index: u32,
}

impl DisplayTrack {
    pub fn from_remote(track: &RemoteTrack) -> Self {
        Self {
            key: TrackKey::Remote(track.id),
            number: 0,
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_secs: track.duration_secs,
            quality: track.quality,
            label: track.label.clone(),
            artwork: track.artwork.clone(),
            added_index: track.added_index,
        }
    }

    pub fn from_local(track: &LocalTrack) -> Self {
        Self {
            key: TrackKey::Local(track.id),
            number: 0,
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_secs: track.duration_secs,
            quality: track.quality,
            label: track.label.clone(),
            artwork: track.artwork.clone(),
            added_index: track.playlist_position,
        }
    }

    pub fn is_local(&self) -> bool {
        self.key.is_local()
    }

    /// Duration as m:ss
    pub fn format_duration(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}

/// One persisted custom-order entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry {
    pub key: TrackKey,
    pub position: usize,
}

impl OrderEntry {
    pub fn new(key: TrackKey, position: usize) -> Self {
        Self { key, position }
    }
}

/// Text fields searched by the track filter and the catalog search
pub trait TrackText {
    fn title(&self) -> &str;
    fn artist(&self) -> &str;
    fn album(&self) -> &str;

    /// Case-insensitive substring match; `needle` must already be lowercase
    fn matches_needle(&self, needle: &str) -> bool {
        [self.title(), self.artist(), self.album()]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl TrackText for RemoteTrack {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist(&self) -> &str {
        &self.artist
    }

    fn album(&self) -> &str {
        &self.album
    }
}

impl TrackText for DisplayTrack {
    fn title(&self) -> &str {
        &self.title
    }

    fn artist(&self) -> &str {
        &self.artist
    }

    fn album(&self) -> &str {
        &self.album
    }
}
