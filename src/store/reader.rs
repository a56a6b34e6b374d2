//! Library XML reader

use crate::model::{
    Folder, Library, LocalEntry, LocalTrack, OrderEntry, Playlist, PlaylistEntry, Quality,
    RemoteTrack, TrackKey,
};
use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Parse a library XML file
pub fn load_library(path: &Path) -> Result<Library> {
    let file =
        File::open(path).with_context(|| format!("Failed to open library file: {:?}", path))?;

    let library = read_library(BufReader::new(file))
        .with_context(|| format!("Failed to parse library file: {:?}", path))?;

    log::info!(
        "Loaded library: {} catalog tracks, {} playlists",
        library.track_count(),
        library.playlist_count()
    );
    Ok(library)
}

/// Parse library XML from any buffered source
pub fn read_library<R: BufRead>(source: R) -> Result<Library> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut library = Library::new();
    let mut current_playlist: Option<Playlist> = None;
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => anyhow::bail!(
                "XML parsing error at position {}: {}",
                reader.buffer_position(),
                e
            ),
        };

        match event {
            Event::Start(e) => {
                let attrs = attributes(&e)?;
                match e.name().as_ref() {
                    b"playlist" => current_playlist = parse_playlist(&attrs),
                    b"custom-order" => {
                        if let Some(ref mut playlist) = current_playlist {
                            playlist.custom_order = Some(Vec::new());
                        }
                    }
                    name => handle_leaf(name, &attrs, &mut library, &mut current_playlist),
                }
            }

            Event::Empty(e) => {
                let attrs = attributes(&e)?;
                match e.name().as_ref() {
                    b"playlist" => {
                        if let Some(playlist) = parse_playlist(&attrs) {
                            library.add_playlist(playlist);
                        }
                    }
                    b"custom-order" => {
                        if let Some(ref mut playlist) = current_playlist {
                            playlist.custom_order = Some(Vec::new());
                        }
                    }
                    name => handle_leaf(name, &attrs, &mut library, &mut current_playlist),
                }
            }

            Event::End(e) => {
                if e.name().as_ref() == b"playlist" {
                    if let Some(playlist) = current_playlist.take() {
                        library.add_playlist(playlist);
                    }
                }
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    Ok(library)
}

type Attrs = HashMap<String, String>;

fn attributes(element: &BytesStart) -> Result<Attrs> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.context("Malformed XML attribute")?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .context("Malformed XML attribute value")?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Elements that never have children
fn handle_leaf(
    name: &[u8],
    attrs: &Attrs,
    library: &mut Library,
    current_playlist: &mut Option<Playlist>,
) {
    match name {
        b"folder" => {
            if let (Some(id), Some(name)) = (positive_id(attrs, "id"), attrs.get("name")) {
                library.add_folder(Folder {
                    id,
                    name: name.clone(),
                });
            } else {
                log::warn!("Skipping folder without id or name: {:?}", attrs);
            }
        }
        b"track" => match parse_remote_track(attrs) {
            Some(track) => library.add_catalog_track(track),
            None => log::warn!("Skipping catalog track without id or title: {:?}", attrs),
        },
        b"file" => match parse_local_track(attrs) {
            Some(track) => library.add_local_file(track),
            None => log::warn!("Skipping local file without id, title or location: {:?}", attrs),
        },
        b"entry" | b"local" | b"item" => {
            let Some(playlist) = current_playlist.as_mut() else {
                log::debug!("Ignoring <{}> outside of a playlist", String::from_utf8_lossy(name));
                return;
            };
            parse_playlist_child(name, attrs, playlist);
        }
        _ => {}
    }
}

fn parse_playlist(attrs: &Attrs) -> Option<Playlist> {
    let Some(id) = positive_id(attrs, "id") else {
        log::warn!("Skipping playlist without a valid id: {:?}", attrs);
        return None;
    };

    let name = attrs
        .get("name")
        .cloned()
        .unwrap_or_else(|| "Unnamed".to_string());

    let mut playlist = Playlist::new(id, name);
    playlist.folder_id = positive_id(attrs, "folder");
    playlist.offline = flag(attrs, "offline").unwrap_or(false);
    playlist.owned = flag(attrs, "owned").unwrap_or(true);
    Some(playlist)
}

fn parse_playlist_child(name: &[u8], attrs: &Attrs, playlist: &mut Playlist) {
    match name {
        b"entry" => match (positive_id(attrs, "track"), number::<u32>(attrs, "added")) {
            (Some(track_id), Some(added_index)) => playlist.entries.push(PlaylistEntry {
                track_id,
                added_index,
            }),
            (Some(track_id), None) => playlist.add_track(track_id),
            _ => log::warn!("Skipping playlist entry without track: {:?}", attrs),
        },
        b"local" => match (positive_id(attrs, "track"), number::<u32>(attrs, "position")) {
            (Some(local_id), Some(position)) => {
                playlist.local_entries.push(LocalEntry { local_id, position })
            }
            _ => log::warn!("Skipping local entry without track or position: {:?}", attrs),
        },
        b"item" => {
            let key = match (positive_id(attrs, "track"), flag(attrs, "local")) {
                (Some(id), Some(true)) => TrackKey::Local(id),
                (Some(id), _) => TrackKey::Remote(id),
                _ => {
                    log::warn!("Skipping custom order item without track: {:?}", attrs);
                    return;
                }
            };
            let Some(position) = number::<usize>(attrs, "position") else {
                log::warn!("Skipping custom order item without position: {:?}", attrs);
                return;
            };
            playlist
                .custom_order
                .get_or_insert_with(Vec::new)
                .push(OrderEntry::new(key, position));
        }
        _ => {}
    }
}

fn parse_remote_track(attrs: &Attrs) -> Option<RemoteTrack> {
    Some(RemoteTrack {
        id: positive_id(attrs, "id")?,
        title: attrs.get("title")?.clone(),
        artist: text_or(attrs, "artist", "Unknown Artist"),
        album: text_or(attrs, "album", "Unknown Album"),
        duration_secs: number(attrs, "duration").unwrap_or(0),
        quality: parse_quality(attrs),
        label: optional_text(attrs, "label"),
        artwork: optional_text(attrs, "artwork"),
        added_index: 0,
    })
}

fn parse_local_track(attrs: &Attrs) -> Option<LocalTrack> {
    Some(LocalTrack {
        id: positive_id(attrs, "id")?,
        title: attrs.get("title")?.clone(),
        artist: text_or(attrs, "artist", "Unknown Artist"),
        album: text_or(attrs, "album", "Unknown Album"),
        duration_secs: number(attrs, "duration").unwrap_or(0),
        quality: parse_quality(attrs),
        label: optional_text(attrs, "label"),
        artwork: optional_text(attrs, "artwork"),
        file_path: uri_to_path(attrs.get("location")?)?,
        playlist_position: 0,
    })
}

fn parse_quality(attrs: &Attrs) -> Quality {
    Quality {
        bit_depth: number(attrs, "bit-depth"),
        sample_rate: number(attrs, "sample-rate"),
        hires: flag(attrs, "hires").unwrap_or(false),
    }
}

fn number<T: std::str::FromStr>(attrs: &Attrs, key: &str) -> Option<T> {
    attrs.get(key).and_then(|v| v.trim().parse().ok())
}

/// Ids are positive; 0 and anything unparsable count as missing
fn positive_id(attrs: &Attrs, key: &str) -> Option<u64> {
    number::<u64>(attrs, key).filter(|id| *id > 0)
}

fn flag(attrs: &Attrs, key: &str) -> Option<bool> {
    match attrs.get(key).map(|v| v.trim()) {
        Some("true") | Some("1") => Some(true),
        Some("false") | Some("0") => Some(false),
        _ => None,
    }
}

fn optional_text(attrs: &Attrs, key: &str) -> Option<String> {
    attrs.get(key).filter(|v| !v.trim().is_empty()).cloned()
}

fn text_or(attrs: &Attrs, key: &str, fallback: &str) -> String {
    optional_text(attrs, key).unwrap_or_else(|| fallback.to_string())
}

/// Convert file:// URI to PathBuf
fn uri_to_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix("file://")
        .and_then(|path| urlencoding::decode(path).ok())
        .map(|decoded| PathBuf::from(decoded.into_owned()))
}
