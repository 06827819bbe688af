//! Label placement at the pole of inaccessibility.
//!
//! Grid refinement: cover the bounding box with square probes, keep them in
//! a max-heap ordered by the best distance any point inside could reach,
//! and split the promising ones until no probe can beat the current best by
//! more than `precision`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::{point_in_ring, segment_distance, signed_area, Point};

#[derive(Clone, Copy)]
struct Probe {
    center: Point,
    half: f64,
    distance: f64,
    potential: f64,
}

impl Probe {
    fn new(center: Point, half: f64, ring: &[Point]) -> Self {
        let distance = signed_distance(&center, ring);
        Self {
            center,
            half,
            distance,
            potential: distance + half * std::f64::consts::SQRT_2,
        }
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.potential.total_cmp(&other.potential) == Ordering::Equal
    }
}

impl Eq for Probe {}

impl PartialOrd for Probe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Probe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.potential.total_cmp(&other.potential)
    }
}

/// Distance to the ring boundary, negative outside.
fn signed_distance(point: &Point, ring: &[Point]) -> f64 {
    let n = ring.len();
    let min = (0..n)
        .map(|i| segment_distance(point, &ring[i], &ring[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min);
    if point_in_ring(point, ring) {
        min
    } else {
        -min
    }
}

fn centroid(ring: &[Point]) -> Option<Point> {
    let area = signed_area(ring);
    if area.abs() < f64::EPSILON {
        return None;
    }
    let n = ring.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }
    Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Point inside `ring` farthest from its boundary, within `precision`.
///
/// Returns `None` for an empty ring. Degenerate rings (zero width or
/// height) return their first vertex.
pub fn pole_of_inaccessibility(ring: &[Point], precision: f64) -> Option<Point> {
    let first = *ring.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in ring {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let width = max_x - min_x;
    let height = max_y - min_y;
    let cell = width.min(height);
    if !(cell > 0.0) {
        return Some(first);
    }
    let precision = if precision > 0.0 { precision } else { 1.0 };

    let half = cell / 2.0;
    let mut queue = BinaryHeap::new();
    let mut x = min_x;
    while x < max_x {
        let mut y = min_y;
        while y < max_y {
            queue.push(Probe::new(Point::new(x + half, y + half), half, ring));
            y += cell;
        }
        x += cell;
    }

    let mut best = match centroid(ring) {
        Some(center) => Probe::new(center, 0.0, ring),
        None => Probe::new(first, 0.0, ring),
    };
    let bbox_probe = Probe::new(Point::new(min_x + width / 2.0, min_y + height / 2.0), 0.0, ring);
    if bbox_probe.distance > best.distance {
        best = bbox_probe;
    }

    while let Some(probe) = queue.pop() {
        if probe.distance > best.distance {
            best = probe;
        }
        if probe.potential - best.distance <= precision {
            continue;
        }

        let h = probe.half / 2.0;
        let c = probe.center;
        for (dx, dy) in [(-h, -h), (h, -h), (-h, h), (h, h)] {
            queue.push(Probe::new(Point::new(c.x + dx, c.y + dy), h, ring));
        }
    }

    Some(best.center)
}
