//! Painted zones and their cell coverage.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::cell::{Cell, CellBounds};
use super::Metadata;

/// The set of cells covered by a zone.
///
/// Cells are kept sorted and unique. The storage is shared, so cloning a zone
/// (and therefore a whole history snapshot) does not copy its cells, and
/// [`Coverage::same_as`] can detect an unchanged coverage by identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Coverage(Arc<[Cell]>);

impl Coverage {
    /// An empty coverage.
    pub fn empty() -> Self {
        Coverage(Arc::from(Vec::new()))
    }

    /// Builds a coverage from arbitrary cells, dropping duplicates.
    pub fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Self {
        let mut cells: Vec<Cell> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Coverage(Arc::from(cells))
    }

    /// Builds the coverage of a filled `cols x rows` rectangle.
    pub fn rect(col: i32, row: i32, cols: i32, rows: i32) -> Self {
        Self::from_cells(
            (row..row + rows).flat_map(|r| (col..col + cols).map(move |c| Cell::new(c, r))),
        )
    }

    /// True when both values share the same storage.
    pub fn same_as(&self, other: &Coverage) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of covered cells.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no cell is covered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Covered cells in `(col, row)` order.
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Iterates over the covered cells.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.0.iter().copied()
    }

    /// Tests membership.
    pub fn contains(&self, cell: Cell) -> bool {
        self.0.binary_search(&cell).is_ok()
    }

    /// Bounding rectangle, `None` for an empty coverage.
    pub fn bounds(&self) -> Option<CellBounds> {
        CellBounds::of(self.iter())
    }
}

impl PartialEq for Coverage {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) || self.0 == other.0
    }
}

impl Default for Coverage {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<Cell>> for Coverage {
    fn from(cells: Vec<Cell>) -> Self {
        Self::from_cells(cells)
    }
}

impl From<Coverage> for Vec<Cell> {
    fn from(coverage: Coverage) -> Self {
        coverage.0.to_vec()
    }
}

impl FromIterator<Cell> for Coverage {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        Self::from_cells(iter)
    }
}

/// A painted zone: an irregular region made of grid cells.
///
/// `coverage` is the source of truth. The smoothed outline, the label anchor
/// and the hit-test structure are derived from it by the contour pipeline
/// and never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Fill color as `#rrggbb`.
    pub color: String,
    pub coverage: Coverage,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Zone {
    /// Creates a zone with a fresh id.
    pub fn new(color: impl Into<String>, coverage: Coverage) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: None,
            color: color.into(),
            coverage,
            metadata: Metadata::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Applies a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, patch: &ZonePatch) {
        if let Some(name) = &patch.display_name {
            self.display_name = Some(name.clone());
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(coverage) = &patch.coverage {
            self.coverage = coverage.clone();
        }
        if let Some(metadata) = &patch.metadata {
            for (key, value) in metadata {
                self.metadata.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Partial update of a [`Zone`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePatch {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ZonePatch {
    /// An empty patch for `id`.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Replaces the coverage.
    pub fn coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Sets the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
