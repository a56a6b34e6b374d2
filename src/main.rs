use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use playlist_view::config::DEFAULT_LIBRARY_PATH;
use playlist_view::model::TrackKey;
use playlist_view::view::{
    FolderFilter, LoadState, MutationOutcome, ReorderOutcome, ShiftDirection, SortField,
};
use playlist_view::{PlaylistBackend, PlaylistBrowser, TrackView, ViewConfig, XmlBackend};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "playlist-view")]
#[command(about = "Browse, sort and reorder playlists of a library file", long_about = None)]
struct Args {
    /// Path to the library file
    #[arg(short = 'l', long, default_value = DEFAULT_LIBRARY_PATH)]
    library: String,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List playlists
    Playlists {
        /// Only playlists whose name contains this text
        #[arg(short = 's', long)]
        search: Option<String>,

        /// Only playlists in this folder
        #[arg(long, conflicts_with = "unfiled")]
        folder: Option<u64>,

        /// Only playlists outside any folder
        #[arg(long)]
        unfiled: bool,

        /// Only playlists available offline
        #[arg(long)]
        offline: bool,
    },

    /// Show the tracks of a playlist
    Show {
        playlist: u64,

        /// Filter tracks by title, artist or album
        #[arg(short = 's', long)]
        search: Option<String>,

        /// Sort field (default, title, artist, album, duration, added, label, custom)
        #[arg(long, default_value = "default")]
        sort: SortField,

        /// Flip the sort field's initial direction
        #[arg(short = 'r', long)]
        reverse: bool,
    },

    /// Move a track within the custom order (0-based positions)
    Move { playlist: u64, from: usize, to: usize },

    /// Shift tracks one slot up or down in the custom order
    Shift {
        playlist: u64,

        #[arg(long, conflicts_with = "down", required_unless_present = "down")]
        up: bool,

        #[arg(long)]
        down: bool,

        /// Track keys, e.g. 12:false or 3:true
        #[arg(required = true)]
        keys: Vec<TrackKey>,
    },

    /// Search the catalog
    Search {
        query: String,

        #[arg(long, default_value = "0")]
        offset: usize,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Add catalog tracks to a playlist
    Add {
        playlist: u64,

        #[arg(required = true)]
        tracks: Vec<u64>,
    },

    /// Place a local collection track at a slot of a playlist
    AddLocal {
        playlist: u64,
        track: u64,
        position: u32,
    },

    /// Remove tracks from a playlist
    Remove {
        playlist: u64,

        #[arg(required = true)]
        keys: Vec<TrackKey>,
    },

    /// Replace a track with a catalog track, keeping its custom slot
    Replace {
        playlist: u64,
        key: TrackKey,
        replacement: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let library_path = shellexpand::tilde(&args.library);
    let config = ViewConfig::new(PathBuf::from(library_path.as_ref()));

    let mut backend = XmlBackend::open(&config.library_path)
        .with_context(|| format!("Failed to open library {:?}", config.library_path))?;
    log::debug!(
        "Library loaded: {} tracks, {} playlists",
        backend.library().track_count(),
        backend.library().playlist_count()
    );

    match args.command {
        Commands::Playlists {
            search,
            folder,
            unfiled,
            offline,
        } => {
            let mut browser = PlaylistBrowser::new();
            if !browser.load(&backend) {
                bail!("Could not list playlists");
            }
            if let Some(query) = search {
                browser.set_query(&query);
            }
            if let Some(id) = folder {
                browser.set_folder(FolderFilter::Folder(id));
            } else if unfiled {
                browser.set_folder(FolderFilter::Unfiled);
            }
            browser.set_offline_only(offline);

            for playlist in browser.visible() {
                let folder = playlist
                    .folder_id
                    .and_then(|id| browser.folders().iter().find(|f| f.id == id))
                    .map(|f| format!("{}/", f.name))
                    .unwrap_or_default();
                println!(
                    "{:>6}  {}{}  ({} tracks{})",
                    playlist.id,
                    folder,
                    playlist.name,
                    playlist.track_count,
                    if playlist.offline { ", offline" } else { "" }
                );
            }
        }

        Commands::Show {
            playlist,
            search,
            sort,
            reverse,
        } => {
            let mut view = open_view(&mut backend, &config, playlist)?;
            view.select_sort(&mut backend, sort);
            if reverse && sort.toggles() {
                view.select_sort(&mut backend, sort);
            }
            if let Some(query) = search {
                view.set_query(&query);
            }
            print_tracks(&view);
        }

        Commands::Move { playlist, from, to } => {
            let mut view = open_custom_view(&mut backend, &config, playlist)?;
            report_reorder(view.move_track(&mut backend, from, to))?;
            print_tracks(&view);
        }

        Commands::Shift {
            playlist,
            up,
            down: _,
            keys,
        } => {
            let direction = if up {
                ShiftDirection::Up
            } else {
                ShiftDirection::Down
            };
            let mut view = open_custom_view(&mut backend, &config, playlist)?;
            report_reorder(view.shift_selection(&mut backend, &keys, direction))?;
            print_tracks(&view);
        }

        Commands::Search {
            query,
            offset,
            limit,
        } => {
            let limit = limit.unwrap_or(config.search_page_size);
            let page = backend
                .search_catalog(&query, offset, limit)
                .context("Catalog search failed")?;

            for track in &page.items {
                println!("{:>8}  {} - {} ({})", track.id, track.artist, track.title, track.album);
            }
            match page.next_offset() {
                Some(next) => println!("{} matches, next page at --offset {}", page.total, next),
                None => println!("{} matches", page.total),
            }
        }

        Commands::Add { playlist, tracks } => {
            let mut view = open_view(&mut backend, &config, playlist)?;
            report_mutation(view.add_tracks(&mut backend, &tracks))?;
            print_tracks(&view);
        }

        Commands::AddLocal {
            playlist,
            track,
            position,
        } => {
            let mut view = open_view(&mut backend, &config, playlist)?;
            report_mutation(view.add_local_track(&mut backend, track, position))?;
            print_tracks(&view);
        }

        Commands::Remove { playlist, keys } => {
            let mut view = open_view(&mut backend, &config, playlist)?;
            report_mutation(view.remove_tracks(&mut backend, &keys))?;
            print_tracks(&view);
        }

        Commands::Replace {
            playlist,
            key,
            replacement,
        } => {
            let mut view = open_view(&mut backend, &config, playlist)?;
            if backend.library().custom_order(playlist)?.is_some() {
                view.select_sort(&mut backend, SortField::Custom);
            }
            report_mutation(view.replace_track(&mut backend, key, replacement))?;
            print_tracks(&view);
        }
    }

    Ok(())
}

fn open_view(backend: &mut XmlBackend, config: &ViewConfig, playlist: u64) -> Result<TrackView> {
    let mut view = TrackView::from_config(playlist, config);
    view.load(backend);
    if let LoadState::Failed(message) = view.load_state() {
        bail!("Could not load playlist {}: {}", playlist, message);
    }
    Ok(view)
}

fn open_custom_view(backend: &mut XmlBackend, config: &ViewConfig, playlist: u64) -> Result<TrackView> {
    let mut view = open_view(backend, config, playlist)?;
    view.select_sort(backend, SortField::Custom);
    if !view.session().is_ready() {
        bail!("Custom order of playlist {} is unavailable", playlist);
    }
    Ok(view)
}

fn report_reorder(outcome: ReorderOutcome) -> Result<()> {
    match outcome {
        ReorderOutcome::Applied => Ok(()),
        ReorderOutcome::Rejected => bail!("Move not possible"),
        ReorderOutcome::Reverted => bail!("Move could not be saved; order left unchanged"),
    }
}

fn report_mutation(outcome: MutationOutcome) -> Result<()> {
    match outcome {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Unplaced => {
            log::warn!("Replacement added at the end; its custom slot could not be saved");
            Ok(())
        }
        MutationOutcome::Partial => {
            bail!("Replacement added but the old track could not be removed")
        }
        MutationOutcome::Failed => bail!("Playlist could not be changed"),
    }
}

fn print_tracks(view: &TrackView) {
    for track in view.display() {
        println!(
            "{:>4}  {:<10} {} - {} ({}) [{}]{}",
            track.number,
            track.key.to_string(),
            track.artist,
            track.title,
            track.album,
            track.format_duration(),
            track
                .label
                .as_deref()
                .map(|l| format!(" {}", l))
                .unwrap_or_default()
        );
    }
    let total = view.total_duration_secs();
    println!(
        "{} of {} tracks, {}:{:02}:{:02}",
        view.display().len(),
        view.total_tracks(),
        total / 3600,
        (total % 3600) / 60,
        total % 60
    );
}
