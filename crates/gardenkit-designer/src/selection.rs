//! Selection state and the objects it refers to.
//!
//! The selection holds ids only. [`selected_objects`] resolves them against
//! an explicit domain snapshot each time it is asked, so a selection never
//! holds stale copies of items or zones.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gardenkit_core::{DomainState, Item, Zone};

/// Result of a canvas hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hit {
    /// An item was hit.
    Item(Uuid),
    /// A zone was hit.
    Zone(Uuid),
}

/// What the user currently has selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub item: Option<Uuid>,
    pub zone: Option<Uuid>,
}

impl SelectionState {
    /// Nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the hit object, or clears the selection for a miss.
    pub fn select(&mut self, hit: Option<Hit>) {
        *self = match hit {
            Some(Hit::Item(id)) => Self {
                item: Some(id),
                zone: None,
            },
            Some(Hit::Zone(id)) => Self {
                item: None,
                zone: Some(id),
            },
            None => Self::default(),
        };
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.zone.is_none()
    }

    /// Drops ids that no longer exist in `domain`.
    pub fn retain_existing(&mut self, domain: &DomainState) {
        if self.item.is_some_and(|id| !domain.has_item(id)) {
            self.item = None;
        }
        if self.zone.is_some_and(|id| !domain.has_zone(id)) {
            self.zone = None;
        }
    }
}

/// A selected object resolved against the domain state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedObject<'a> {
    Item(&'a Item),
    Zone(&'a Zone),
}

/// Resolves the selection against a domain snapshot. Ids that no longer
/// exist are skipped.
pub fn selected_objects<'a>(
    domain: &'a DomainState,
    selection: &SelectionState,
) -> Vec<SelectedObject<'a>> {
    let mut objects = Vec::new();
    if let Some(item) = selection.item.and_then(|id| domain.item(id)) {
        objects.push(SelectedObject::Item(item));
    }
    if let Some(zone) = selection.zone.and_then(|id| domain.zone(id)) {
        objects.push(SelectedObject::Zone(zone));
    }
    objects
}
