//! The domain state snapshot held by the history store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::cell::{CellKey, CellPaint};
use super::item::Item;
use super::zone::Zone;

/// Complete domain state: everything undo/redo can move between.
///
/// Snapshots are deeply comparable (`PartialEq`) and structurally cloneable;
/// zone coverage storage is shared between clones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainState {
    pub items: Vec<Item>,
    pub zones: Vec<Zone>,
    pub colored_cells: BTreeMap<CellKey, CellPaint>,
    #[serde(default)]
    pub map_locked: bool,
}

impl DomainState {
    /// Looks up an item by id.
    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks up a zone by id.
    pub fn zone(&self, id: Uuid) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// True when an item with this id exists.
    pub fn has_item(&self, id: Uuid) -> bool {
        self.item(id).is_some()
    }

    /// True when a zone with this id exists.
    pub fn has_zone(&self, id: Uuid) -> bool {
        self.zone(id).is_some()
    }
}

/// Which parts of the domain state differ between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub items: bool,
    pub zones: bool,
    pub cells: bool,
    pub lock: bool,
}

impl ChangeSet {
    /// Compares two snapshots collection by collection.
    pub fn between(old: &DomainState, new: &DomainState) -> Self {
        Self {
            items: old.items != new.items,
            zones: old.zones != new.zones,
            cells: old.colored_cells != new.colored_cells,
            lock: old.map_locked != new.map_locked,
        }
    }

    /// Every part changed (used after a wholesale reload).
    pub fn all() -> Self {
        Self {
            items: true,
            zones: true,
            cells: true,
            lock: true,
        }
    }

    /// True when nothing changed.
    pub fn is_empty(&self) -> bool {
        !(self.items || self.zones || self.cells || self.lock)
    }
}
