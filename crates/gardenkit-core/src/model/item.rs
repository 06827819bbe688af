//! Placed items (plants, furniture, structures).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Metadata;

/// An item placed on the canvas.
///
/// `x`/`y` is the top-left corner in world units; `rotation` is in degrees,
/// clockwise, about the item's center. Everything in `metadata` is opaque
/// to the editor core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    /// Palette entry (species, structure type) this item was created from.
    pub menu_element_id: String,
    /// Image key of the icon drawn for this item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_planted: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Item {
    /// Creates an item with a fresh id.
    pub fn new(
        name: impl Into<String>,
        menu_element_id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            menu_element_id: menu_element_id.into(),
            icon: None,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            date_planted: None,
            metadata: Metadata::new(),
        }
    }

    /// Center of the item in world units.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Tests whether a world point lies inside the (possibly rotated) item.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (cx, cy) = self.center();
        let (sin, cos) = (-self.rotation).to_radians().sin_cos();
        let dx = x - cx;
        let dy = y - cy;
        let local_x = dx * cos - dy * sin;
        let local_y = dx * sin + dy * cos;
        local_x.abs() <= self.width / 2.0 && local_y.abs() <= self.height / 2.0
    }

    /// Applies a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(icon) = &patch.icon {
            self.icon = Some(icon.clone());
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(date) = patch.date_planted {
            self.date_planted = Some(date);
        }
        if let Some(metadata) = &patch.metadata {
            for (key, value) in metadata {
                self.metadata.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Partial update of an [`Item`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_planted: Option<NaiveDate>,
    /// Merged key by key into the item's metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ItemPatch {
    /// An empty patch for `id`.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Sets the position.
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Sets the size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the rotation in degrees.
    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }
}
