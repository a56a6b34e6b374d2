//! Library XML writer

use crate::model::{Library, LocalTrack, Playlist, Quality, RemoteTrack};
use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the library to `path`, replacing the file in one rename
pub fn save_library(library: &Library, path: &Path) -> Result<()> {
    let xml = write_library(library)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let tmp_path = path.with_extension("xml.tmp");
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create {:?}", tmp_path))?;
    file.write_all(&xml)
        .with_context(|| format!("Failed to write {:?}", tmp_path))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync {:?}", tmp_path))?;

    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to move {:?} to {:?}", tmp_path, path))?;

    log::debug!("Library written to {:?} ({} bytes)", path, xml.len());
    Ok(())
}

/// Serialize the library to XML bytes
pub fn write_library(library: &Library) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("library");
    root.push_attribute(("version", "1"));
    writer.write_event(Event::Start(root))?;

    writer.write_event(Event::Start(BytesStart::new("folders")))?;
    for folder in library.folders() {
        let mut element = BytesStart::new("folder");
        element.push_attribute(("id", folder.id.to_string().as_str()));
        element.push_attribute(("name", folder.name.as_str()));
        writer.write_event(Event::Empty(element))?;
    }
    writer.write_event(Event::End(BytesEnd::new("folders")))?;

    writer.write_event(Event::Start(BytesStart::new("catalog")))?;
    for track in library.catalog() {
        writer.write_event(Event::Empty(remote_track_element(track)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("catalog")))?;

    writer.write_event(Event::Start(BytesStart::new("local-collection")))?;
    for track in library.local_collection() {
        writer.write_event(Event::Empty(local_track_element(track)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("local-collection")))?;

    writer.write_event(Event::Start(BytesStart::new("playlists")))?;
    for playlist in library.playlists() {
        write_playlist(&mut writer, playlist)?;
    }
    writer.write_event(Event::End(BytesEnd::new("playlists")))?;

    writer.write_event(Event::End(BytesEnd::new("library")))?;
    Ok(writer.into_inner())
}

fn write_playlist(writer: &mut Writer<Vec<u8>>, playlist: &Playlist) -> Result<()> {
    let mut element = BytesStart::new("playlist");
    element.push_attribute(("id", playlist.id.to_string().as_str()));
    element.push_attribute(("name", playlist.name.as_str()));
    if let Some(folder_id) = playlist.folder_id {
        element.push_attribute(("folder", folder_id.to_string().as_str()));
    }
    element.push_attribute(("offline", bool_str(playlist.offline)));
    element.push_attribute(("owned", bool_str(playlist.owned)));
    writer.write_event(Event::Start(element))?;

    for entry in &playlist.entries {
        let mut child = BytesStart::new("entry");
        child.push_attribute(("track", entry.track_id.to_string().as_str()));
        child.push_attribute(("added", entry.added_index.to_string().as_str()));
        writer.write_event(Event::Empty(child))?;
    }

    for entry in &playlist.local_entries {
        let mut child = BytesStart::new("local");
        child.push_attribute(("track", entry.local_id.to_string().as_str()));
        child.push_attribute(("position", entry.position.to_string().as_str()));
        writer.write_event(Event::Empty(child))?;
    }

    if let Some(ref order) = playlist.custom_order {
        writer.write_event(Event::Start(BytesStart::new("custom-order")))?;
        for entry in order {
            let mut child = BytesStart::new("item");
            child.push_attribute(("track", entry.key.raw_id().to_string().as_str()));
            child.push_attribute(("local", bool_str(entry.key.is_local())));
            child.push_attribute(("position", entry.position.to_string().as_str()));
            writer.write_event(Event::Empty(child))?;
        }
        writer.write_event(Event::End(BytesEnd::new("custom-order")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("playlist")))?;
    Ok(())
}

fn remote_track_element(track: &RemoteTrack) -> BytesStart<'static> {
    let mut element = BytesStart::new("track");
    push_common(
        &mut element,
        track.id,
        &track.title,
        &track.artist,
        &track.album,
        track.duration_secs,
    );
    push_optional(&mut element, &track.label, &track.artwork, &track.quality);
    element
}

fn local_track_element(track: &LocalTrack) -> BytesStart<'static> {
    let mut element = BytesStart::new("file");
    push_common(
        &mut element,
        track.id,
        &track.title,
        &track.artist,
        &track.album,
        track.duration_secs,
    );
    push_optional(&mut element, &track.label, &track.artwork, &track.quality);
    element.push_attribute(("location", path_to_uri(&track.file_path).as_str()));
    element
}

fn push_common(
    element: &mut BytesStart,
    id: u64,
    title: &str,
    artist: &str,
    album: &str,
    duration_secs: u32,
) {
    element.push_attribute(("id", id.to_string().as_str()));
    element.push_attribute(("title", title));
    element.push_attribute(("artist", artist));
    element.push_attribute(("album", album));
    element.push_attribute(("duration", duration_secs.to_string().as_str()));
}

fn push_optional(
    element: &mut BytesStart,
    label: &Option<String>,
    artwork: &Option<String>,
    quality: &Quality,
) {
    if let Some(label) = label {
        element.push_attribute(("label", label.as_str()));
    }
    if let Some(artwork) = artwork {
        element.push_attribute(("artwork", artwork.as_str()));
    }
    if let Some(bits) = quality.bit_depth {
        element.push_attribute(("bit-depth", bits.to_string().as_str()));
    }
    if let Some(rate) = quality.sample_rate {
        element.push_attribute(("sample-rate", rate.to_string().as_str()));
    }
    if quality.hires {
        element.push_attribute(("hires", "true"));
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Convert a path to a file:// URI, keeping separators readable
fn path_to_uri(path: &Path) -> String {
    let encoded = urlencoding::encode(&path.to_string_lossy()).replace("%2F", "/");
    format!("file://{}", encoded)
}
