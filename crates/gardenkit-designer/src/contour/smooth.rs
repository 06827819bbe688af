//! Chaikin corner cutting on closed rings.

use crate::geometry::Point;

/// One closed-loop Chaikin pass: every edge `[p, q]` becomes the two points
/// at 25% and 75% along it, including the closing edge.
pub fn chaikin_pass(ring: &[Point]) -> Vec<Point> {
    if ring.len() < 2 {
        return ring.to_vec();
    }
    let mut out = Vec::with_capacity(ring.len() * 2);
    for (i, p) in ring.iter().enumerate() {
        let q = &ring[(i + 1) % ring.len()];
        out.push(p.lerp(q, 0.25));
        out.push(p.lerp(q, 0.75));
    }
    out
}

/// Chaikin pass that keeps exact horizontal/vertical right-angle corners.
///
/// A vertex whose incoming and outgoing edges are axis aligned and
/// perpendicular is emitted unchanged; every other vertex cuts its outgoing
/// edge as in [`chaikin_pass`].
pub fn chaikin_pass_preserving_right_angles(ring: &[Point]) -> Vec<Point> {
    if ring.len() < 2 {
        return ring.to_vec();
    }
    let n = ring.len();
    let mut out = Vec::with_capacity(n * 2);
    for (i, p) in ring.iter().enumerate() {
        let prev = &ring[(i + n - 1) % n];
        let next = &ring[(i + 1) % n];
        if is_axis_right_angle(prev, p, next) {
            out.push(*p);
        } else {
            out.push(p.lerp(next, 0.25));
            out.push(p.lerp(next, 0.75));
        }
    }
    out
}

fn is_axis_right_angle(prev: &Point, p: &Point, next: &Point) -> bool {
    let (dx1, dy1) = (p.x - prev.x, p.y - prev.y);
    let (dx2, dy2) = (next.x - p.x, next.y - p.y);
    let axis = |dx: f64, dy: f64| (dx == 0.0 && dy != 0.0) || (dy == 0.0 && dx != 0.0);
    axis(dx1, dy1) && axis(dx2, dy2) && dx1 * dx2 + dy1 * dy2 == 0.0
}

/// Applies `passes` smoothing passes.
pub fn smooth_ring(ring: &[Point], passes: usize, preserve_right_angles: bool) -> Vec<Point> {
    let mut out = ring.to_vec();
    for _ in 0..passes {
        out = if preserve_right_angles {
            chaikin_pass_preserving_right_angles(&out)
        } else {
            chaikin_pass(&out)
        };
    }
    out
}
