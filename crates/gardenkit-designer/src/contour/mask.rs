//! Binary occupancy mask of a zone's coverage.

use gardenkit_core::{Cell, CellBounds, Coverage};

/// Occupancy grid of a coverage's bounding box plus a one-cell empty border.
///
/// Mask cell `(x, y)` holds coverage cell
/// `(min_col + x - 1, min_row + y - 1)`. Lattice point `(x, y)` of the mask
/// is the top-left corner of mask cell `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    width: usize,
    height: usize,
    bounds: CellBounds,
    data: Vec<bool>,
}

impl CellMask {
    /// Largest mask, padding included, that [`CellMask::from_coverage`] builds.
    pub const MAX_CELLS: usize = 1 << 22;

    /// Builds the mask, `None` for an empty coverage or one whose padded
    /// bounding box exceeds [`CellMask::MAX_CELLS`].
    pub fn from_coverage(coverage: &Coverage) -> Option<Self> {
        Self::from_coverage_within(coverage, Self::MAX_CELLS)
    }

    /// Builds the mask, `None` for an empty coverage or one whose padded
    /// bounding box holds more than `max_cells` cells.
    pub fn from_coverage_within(coverage: &Coverage, max_cells: usize) -> Option<Self> {
        let bounds = coverage.bounds()?;
        let area = bounds.padded_area(1).filter(|area| *area <= max_cells)?;
        // Both fit in usize since their product does.
        let width = (bounds.cols() + 2) as usize;
        let height = (bounds.rows() + 2) as usize;
        let mut data = vec![false; area];
        for cell in coverage.iter() {
            let x = (i64::from(cell.col) - i64::from(bounds.min_col)) as usize + 1;
            let y = (i64::from(cell.row) - i64::from(bounds.min_row)) as usize + 1;
            data[y * width + x] = true;
        }
        Some(Self {
            width,
            height,
            bounds,
            data,
        })
    }

    /// Mask width in cells, padding included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in cells, padding included.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bounding rectangle of the coverage.
    pub fn bounds(&self) -> CellBounds {
        self.bounds
    }

    /// Occupancy of mask cell `(x, y)`. Anything outside the mask is empty.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.data[y as usize * self.width + x as usize]
    }

    /// First filled mask cell in row-major order.
    pub fn first_filled(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|filled| *filled)
            .map(|index| (index % self.width, index / self.width))
    }

    /// Coverage cell held by mask cell `(x, y)`, `None` for padding cells
    /// past the `i32` grid.
    pub fn cell_at(&self, x: usize, y: usize) -> Option<Cell> {
        let col = i64::from(self.bounds.min_col) + x as i64 - 1;
        let row = i64::from(self.bounds.min_row) + y as i64 - 1;
        Some(Cell::new(i32::try_from(col).ok()?, i32::try_from(row).ok()?))
    }

    /// Maps a mask lattice point to world coordinates.
    pub fn to_world(&self, x: f64, y: f64, cell_size: f64) -> (f64, f64) {
        (
            (x + f64::from(self.bounds.min_col) - 1.0) * cell_size,
            (y + f64::from(self.bounds.min_row) - 1.0) * cell_size,
        )
    }
}
