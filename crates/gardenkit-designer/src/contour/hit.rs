//! Point-in-zone test over the covered cell rectangles.

use std::collections::HashSet;

use gardenkit_core::{Cell, CellBounds, Coverage};

/// Union of a zone's cell rectangles, answering world-space point queries.
///
/// Tests against cells rather than the smoothed outline, so a click always
/// lands on exactly the painted cells.
#[derive(Debug, Clone, Default)]
pub struct CellHitTest {
    cells: HashSet<Cell>,
    bounds: Option<CellBounds>,
    cell_size: f64,
}

impl CellHitTest {
    /// Builds the test for a coverage.
    pub fn new(coverage: &Coverage, cell_size: f64) -> Self {
        Self {
            cells: coverage.iter().collect(),
            bounds: coverage.bounds(),
            cell_size,
        }
    }

    /// True when the world point lies in a covered cell.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !(self.cell_size > 0.0) || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let cell = Cell::from_world(x, y, self.cell_size);
        if cell.col < bounds.min_col
            || cell.col > bounds.max_col
            || cell.row < bounds.min_row
            || cell.row > bounds.max_row
        {
            return false;
        }
        self.cells.contains(&cell)
    }

    /// Number of covered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when nothing is covered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
