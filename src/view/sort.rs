//! Sort stage and the sort-field selection state

use super::order::CustomOrder;
use crate::model::DisplayTrack;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field a playlist view can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    /// Merge order, untouched
    #[default]
    Default,
    Title,
    Artist,
    Album,
    Duration,
    /// Recency by added index; ascending means newest first
    Added,
    /// Record label; tracks without one always go last
    Label,
    /// Persisted manual order
    Custom,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Default,
        SortField::Title,
        SortField::Artist,
        SortField::Album,
        SortField::Duration,
        SortField::Added,
        SortField::Label,
        SortField::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortField::Default => "default",
            SortField::Title => "title",
            SortField::Artist => "artist",
            SortField::Album => "album",
            SortField::Duration => "duration",
            SortField::Added => "added",
            SortField::Label => "label",
            SortField::Custom => "custom",
        }
    }

    /// Direction picked when the field is newly selected
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::Added => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// Whether selecting the field again flips the direction
    pub fn toggles(&self) -> bool {
        !matches!(self, SortField::Default | SortField::Custom)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortField::ALL
            .into_iter()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = SortField::ALL.iter().map(|f| f.name()).collect();
                format!("unknown sort field '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Current sort field and direction of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    field: SortField,
    direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField) -> Self {
        Self {
            field,
            direction: initial_direction(field),
        }
    }

    pub fn field(&self) -> SortField {
        self.field
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Whether the direction toggle is offered for the current field
    pub fn toggle_enabled(&self) -> bool {
        self.field.toggles()
    }

    /// Select a field the way a column header click does
    ///
    /// Same field flips the direction; a new field starts at its default.
    /// `Default` and `Custom` always sit at ascending.
    pub fn select(&mut self, field: SortField) {
        if !field.toggles() {
            self.field = field;
            self.direction = SortDirection::Ascending;
        } else if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = field.default_direction();
        }
    }

    /// Set field and direction directly (direction is ignored where toggling is off)
    pub fn set(&mut self, field: SortField, direction: SortDirection) {
        self.field = field;
        self.direction = if field.toggles() {
            direction
        } else {
            SortDirection::Ascending
        };
    }
}

fn initial_direction(field: SortField) -> SortDirection {
    if field.toggles() {
        field.default_direction()
    } else {
        SortDirection::Ascending
    }
}

/// Sort tracks in place (stable)
///
/// `custom` is only consulted for `SortField::Custom`.
pub fn sort_tracks(tracks: &mut [DisplayTrack], state: SortState, custom: Option<&CustomOrder>) {
    let ascending = state.direction == SortDirection::Ascending;

    match state.field {
        SortField::Default => {}
        SortField::Custom => {
            tracks.sort_by_key(|t| custom_rank(t, custom));
        }
        SortField::Added => {
            // Ascending shows the newest additions first
            tracks.sort_by(|a, b| {
                let cmp = b.added_index.cmp(&a.added_index);
                if ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }
        SortField::Label => {
            tracks.sort_by(|a, b| compare_labels(a, b, ascending));
        }
        field => {
            tracks.sort_by(|a, b| {
                let cmp = compare_by_field(a, b, field);
                if ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            });
        }
    }
}

/// Position in the custom order, falling back to the added index
fn custom_rank(track: &DisplayTrack, custom: Option<&CustomOrder>) -> usize {
    custom
        .and_then(|order| order.position(&track.key))
        .unwrap_or(track.added_index as usize)
}

fn compare_by_field(a: &DisplayTrack, b: &DisplayTrack, field: SortField) -> Ordering {
    match field {
        SortField::Title => compare_text(&a.title, &b.title),
        SortField::Artist => compare_text(&a.artist, &b.artist),
        SortField::Album => compare_text(&a.album, &b.album),
        SortField::Duration => a.duration_secs.cmp(&b.duration_secs),
        _ => Ordering::Equal,
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn compare_labels(a: &DisplayTrack, b: &DisplayTrack, ascending: bool) -> Ordering {
    match (a.label.as_deref(), b.label.as_deref()) {
        (Some(a_label), Some(b_label)) => {
            let cmp = compare_text(a_label, b_label);
            if ascending {
                cmp
            } else {
                cmp.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
