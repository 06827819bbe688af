//! Marching-squares outline trace.
//!
//! Walks the boundary between filled and empty mask cells along the cell
//! edges (threshold 0.5 on a binary mask, so no interpolation). The walk is
//! clockwise in y-down coordinates with the filled side on the right. At
//! each lattice point the 2x2 neighbourhood decides which headings are
//! possible; turning right is preferred, then straight, then left, which
//! keeps diagonally touching cells in separate rings.
//!
//! Only the outer ring of the first filled cell (row-major) is traced.
//! Holes and other components are ignored.

use crate::geometry::Point;

use super::mask::CellMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    fn turn_right(self) -> Self {
        match self {
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
            Heading::Up => Heading::Right,
        }
    }

    fn turn_left(self) -> Self {
        match self {
            Heading::Right => Heading::Up,
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
        }
    }

    fn step(self) -> (i64, i64) {
        match self {
            Heading::Right => (1, 0),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
        }
    }
}

/// 2x2 neighbourhood of a lattice point.
struct Neighbourhood {
    top_left: bool,
    top_right: bool,
    bottom_left: bool,
    bottom_right: bool,
}

impl Neighbourhood {
    fn at(mask: &CellMask, x: i64, y: i64) -> Self {
        Self {
            top_left: mask.get(x - 1, y - 1),
            top_right: mask.get(x, y - 1),
            bottom_left: mask.get(x - 1, y),
            bottom_right: mask.get(x, y),
        }
    }

    /// True when leaving along `heading` keeps filled on the right.
    fn allows(&self, heading: Heading) -> bool {
        match heading {
            Heading::Right => self.bottom_right && !self.top_right,
            Heading::Down => self.bottom_left && !self.bottom_right,
            Heading::Left => self.top_left && !self.bottom_left,
            Heading::Up => self.top_right && !self.top_left,
        }
    }
}

/// Traces the outer ring in mask lattice coordinates.
///
/// Only corners are emitted, so a filled rectangle yields four vertices.
/// Returns an empty ring for a mask with no filled cell.
pub fn trace_outline(mask: &CellMask) -> Vec<Point> {
    let Some((sx, sy)) = mask.first_filled() else {
        return Vec::new();
    };
    let start = (sx as i64, sy as i64);

    // Top-left corner of the first filled cell: the cells above and to the
    // left are empty, so the only way out is to the right.
    let mut vertices = vec![Point::new(start.0 as f64, start.1 as f64)];
    let mut position = start;
    let mut heading = Heading::Right;
    let max_steps = 4 * (mask.width() + 1) * (mask.height() + 1);

    for _ in 0..max_steps {
        let (dx, dy) = heading.step();
        position = (position.0 + dx, position.1 + dy);
        if position == start {
            return vertices;
        }

        let around = Neighbourhood::at(mask, position.0, position.1);
        let Some(next) = [heading.turn_right(), heading, heading.turn_left()]
            .into_iter()
            .find(|candidate| around.allows(*candidate))
        else {
            tracing::warn!("Contour trace stuck at {:?}", position);
            return vertices;
        };

        if next != heading {
            vertices.push(Point::new(position.0 as f64, position.1 as f64));
        }
        heading = next;
    }

    tracing::warn!("Contour trace did not close after {} steps", max_steps);
    vertices
}
