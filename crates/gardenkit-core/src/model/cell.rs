//! Grid cells and the painted-cell buffer keys.
//!
//! All coverage math uses `{col, row}` grid indices. A cell occupies the
//! world rectangle `[col * cell_size, (col + 1) * cell_size) x [row * cell_size, (row + 1) * cell_size)`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single grid cell addressed by column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Column index (x axis).
    pub col: i32,
    /// Row index (y axis).
    pub row: i32,
}

impl Cell {
    /// Creates a new cell.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Returns the cell containing a world-space point.
    pub fn from_world(x: f64, y: f64, cell_size: f64) -> Self {
        Self {
            col: (x / cell_size).floor() as i32,
            row: (y / cell_size).floor() as i32,
        }
    }

    /// Returns the world-space rectangle `(x, y, width, height)` of this cell.
    pub fn world_rect(&self, cell_size: f64) -> (f64, f64, f64, f64) {
        (
            f64::from(self.col) * cell_size,
            f64::from(self.row) * cell_size,
            cell_size,
            cell_size,
        )
    }

    /// Returns the buffer key of this cell.
    pub fn key(&self) -> CellKey {
        CellKey(*self)
    }
}

/// Inclusive bounding rectangle of a set of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBounds {
    /// Smallest column.
    pub min_col: i32,
    /// Smallest row.
    pub min_row: i32,
    /// Largest column.
    pub max_col: i32,
    /// Largest row.
    pub max_row: i32,
}

impl CellBounds {
    /// Number of columns spanned.
    pub fn cols(&self) -> u64 {
        (i64::from(self.max_col) - i64::from(self.min_col) + 1) as u64
    }

    /// Number of rows spanned.
    pub fn rows(&self) -> u64 {
        (i64::from(self.max_row) - i64::from(self.min_row) + 1) as u64
    }

    /// Cells in the bounding box grown by `padding` on every side, `None`
    /// when that does not fit in `usize`.
    pub fn padded_area(&self, padding: u64) -> Option<usize> {
        let cols = self.cols().checked_add(padding.checked_mul(2)?)?;
        let rows = self.rows().checked_add(padding.checked_mul(2)?)?;
        usize::try_from(cols.checked_mul(rows)?).ok()
    }

    /// Grows the bounds to include `cell`.
    pub fn include(&mut self, cell: Cell) {
        self.min_col = self.min_col.min(cell.col);
        self.min_row = self.min_row.min(cell.row);
        self.max_col = self.max_col.max(cell.col);
        self.max_row = self.max_row.max(cell.row);
    }

    /// Computes the bounds of an iterator of cells, `None` when empty.
    pub fn of<I: IntoIterator<Item = Cell>>(cells: I) -> Option<Self> {
        let mut iter = cells.into_iter();
        let first = iter.next()?;
        let mut bounds = CellBounds {
            min_col: first.col,
            min_row: first.row,
            max_col: first.col,
            max_row: first.row,
        };
        for cell in iter {
            bounds.include(cell);
        }
        Some(bounds)
    }
}

/// Key of the painted-cell buffer.
///
/// Always well formed: it serializes to and parses from the `"col,row"` form,
/// and a malformed string is rejected at deserialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(Cell);

impl CellKey {
    /// Returns the addressed cell.
    pub fn cell(&self) -> Cell {
        self.0
    }
}

impl From<Cell> for CellKey {
    fn from(cell: Cell) -> Self {
        CellKey(cell)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0.col, self.0.row)
    }
}

/// Error returned when a string is not a `"col,row"` key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed cell key {0:?}, expected \"col,row\"")]
pub struct CellKeyParseError(pub String);

impl FromStr for CellKey {
    type Err = CellKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (col, row) = s
            .split_once(',')
            .ok_or_else(|| CellKeyParseError(s.to_string()))?;
        let col = col
            .trim()
            .parse::<i32>()
            .map_err(|_| CellKeyParseError(s.to_string()))?;
        let row = row
            .trim()
            .parse::<i32>()
            .map_err(|_| CellKeyParseError(s.to_string()))?;
        Ok(CellKey(Cell::new(col, row)))
    }
}

impl Serialize for CellKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Paint applied to a single cell of the colored-cell buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellPaint {
    /// Fill color as `#rrggbb`.
    pub color: String,
    /// Palette entry the paint came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_element_id: Option<String>,
}

impl CellPaint {
    /// Creates paint with only a color.
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            menu_element_id: None,
        }
    }
}
