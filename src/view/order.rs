//! Custom order map and the reorder primitives behind manual sorting
//!
//! All reorder functions work on a full ordered sequence and return whether
//! anything changed. Positions are renumbered densely afterwards by the caller
//! through [`CustomOrder::from_sequence`].

use crate::model::{OrderEntry, TrackKey};
use std::collections::HashMap;

/// Direction of a batch move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Up,
    Down,
}

/// User-defined track order for one playlist: key -> position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomOrder {
    positions: HashMap<TrackKey, usize>,
}

impl CustomOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load stored entries verbatim. A key listed twice keeps its last position.
    pub fn from_entries(entries: &[OrderEntry]) -> Self {
        Self {
            positions: entries.iter().map(|e| (e.key, e.position)).collect(),
        }
    }

    /// Dense order `0..n` following the given sequence
    pub fn from_sequence(keys: &[TrackKey]) -> Self {
        Self {
            positions: keys.iter().enumerate().map(|(i, k)| (*k, i)).collect(),
        }
    }

    pub fn position(&self, key: &TrackKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &TrackKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entries ordered by position (ties by key, so the output is deterministic)
    pub fn entries(&self) -> Vec<OrderEntry> {
        let mut entries: Vec<OrderEntry> = self
            .positions
            .iter()
            .map(|(key, position)| OrderEntry::new(*key, *position))
            .collect();
        entries.sort_by(|a, b| a.position.cmp(&b.position).then(a.key.cmp(&b.key)));
        entries
    }

    /// Keys ordered by position
    pub fn sequence(&self) -> Vec<TrackKey> {
        self.entries().into_iter().map(|e| e.key).collect()
    }
}

/// Move the item at `from` to `to` with splice semantics
///
/// Items between the two indices shift one slot towards `from`. Returns false
/// when either index is out of range or nothing moves.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() || from == to {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Move every selected item one slot up or down
///
/// The whole operation is rejected (returns false, nothing changes) if the
/// selection matches no item or its extremal item already sits at the
/// boundary. Swaps run top-to-bottom for `Up` and bottom-to-top for `Down`
/// so adjacent selected items keep their relative order.
pub fn shift_selected<T: PartialEq>(
    items: &mut [T],
    selected: &[T],
    direction: ShiftDirection,
) -> bool {
    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| selected.contains(item))
        .map(|(i, _)| i)
        .collect();

    let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
        return false;
    };

    match direction {
        ShiftDirection::Up => {
            if first == 0 {
                return false;
            }
            for &i in &indices {
                items.swap(i, i - 1);
            }
        }
        ShiftDirection::Down => {
            if last + 1 >= items.len() {
                return false;
            }
            indices.reverse();
            for &i in &indices {
                items.swap(i, i + 1);
            }
        }
    }
    true
}

/// Place `key` at `position` in a stored order, inserting it if absent
///
/// This is the backend-side counterpart of a single move: the position is
/// clamped to the end of the sequence and the result is dense.
pub fn place_key(order: &CustomOrder, key: TrackKey, position: usize) -> CustomOrder {
    let mut keys = order.sequence();
    keys.retain(|k| *k != key);
    let at = position.min(keys.len());
    keys.insert(at, key);
    CustomOrder::from_sequence(&keys)
}
