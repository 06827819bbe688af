//! Domain actions and the pure reducer.
//!
//! [`reduce`] never fails. Actions that do not apply (unknown ids, a
//! duplicate id on create) return the state unchanged, which the store
//! treats as a no-op that leaves history alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use gardenkit_core::{CellKey, CellPaint, DomainState, Item, ItemPatch, Zone, ZonePatch};

/// Every mutation of the domain state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainAction {
    /// Adds an item. Rejected when the id is already taken.
    CreateItem(Item),
    /// Applies a partial update to an existing item.
    UpdateItem(ItemPatch),
    /// Removes an item.
    DeleteItem(Uuid),
    /// Replaces every item.
    SetItems(Vec<Item>),
    /// Adds a zone. Rejected when the id is already taken.
    CreateZone(Zone),
    /// Applies a partial update to an existing zone.
    UpdateZone(ZonePatch),
    /// Removes a zone.
    DeleteZone(Uuid),
    /// Replaces every zone.
    SetZones(Vec<Zone>),
    /// Merges paint into the colored-cell buffer; later keys overwrite.
    SetColoredCells(BTreeMap<CellKey, CellPaint>),
    /// Uncolors individual cells.
    RemoveColoredCells(Vec<CellKey>),
    /// Empties the colored-cell buffer.
    ClearColoredCells,
    /// Flips the map lock.
    ToggleMapLock,
    /// Sets the map lock.
    SetMapLock(bool),
}

impl DomainAction {
    /// Action name as it appears in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            DomainAction::CreateItem(_) => "CREATE_ITEM",
            DomainAction::UpdateItem(_) => "UPDATE_ITEM",
            DomainAction::DeleteItem(_) => "DELETE_ITEM",
            DomainAction::SetItems(_) => "SET_ITEMS",
            DomainAction::CreateZone(_) => "CREATE_ZONE",
            DomainAction::UpdateZone(_) => "UPDATE_ZONE",
            DomainAction::DeleteZone(_) => "DELETE_ZONE",
            DomainAction::SetZones(_) => "SET_ZONES",
            DomainAction::SetColoredCells(_) => "SET_COLORED_CELLS",
            DomainAction::RemoveColoredCells(_) => "REMOVE_COLORED_CELLS",
            DomainAction::ClearColoredCells => "CLEAR_COLORED_CELLS",
            DomainAction::ToggleMapLock => "TOGGLE_MAP_LOCK",
            DomainAction::SetMapLock(_) => "SET_MAP_LOCK",
        }
    }

    /// Whether a state change made by this action gets an undo step.
    pub fn is_undoable(&self) -> bool {
        !matches!(
            self,
            DomainAction::ToggleMapLock | DomainAction::SetMapLock(_)
        )
    }
}

/// Applies `action` to `state`, returning the next state.
pub fn reduce(state: &DomainState, action: &DomainAction) -> DomainState {
    let mut next = state.clone();
    match action {
        DomainAction::CreateItem(item) => {
            if state.has_item(item.id) {
                tracing::debug!("Rejecting duplicate item {}", item.id);
            } else {
                next.items.push(item.clone());
            }
        }
        DomainAction::UpdateItem(patch) => {
            if let Some(item) = next.items.iter_mut().find(|item| item.id == patch.id) {
                item.apply(patch);
            }
        }
        DomainAction::DeleteItem(id) => next.items.retain(|item| item.id != *id),
        DomainAction::SetItems(items) => next.items = items.clone(),
        DomainAction::CreateZone(zone) => {
            if state.has_zone(zone.id) {
                tracing::debug!("Rejecting duplicate zone {}", zone.id);
            } else {
                next.zones.push(zone.clone());
            }
        }
        DomainAction::UpdateZone(patch) => {
            if let Some(zone) = next.zones.iter_mut().find(|zone| zone.id == patch.id) {
                zone.apply(patch);
            }
        }
        DomainAction::DeleteZone(id) => next.zones.retain(|zone| zone.id != *id),
        DomainAction::SetZones(zones) => next.zones = zones.clone(),
        DomainAction::SetColoredCells(cells) => {
            for (key, paint) in cells {
                next.colored_cells.insert(*key, paint.clone());
            }
        }
        DomainAction::RemoveColoredCells(keys) => {
            for key in keys {
                next.colored_cells.remove(key);
            }
        }
        DomainAction::ClearColoredCells => next.colored_cells.clear(),
        DomainAction::ToggleMapLock => next.map_locked = !state.map_locked,
        DomainAction::SetMapLock(locked) => next.map_locked = *locked,
    }
    next
}
