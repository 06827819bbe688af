//! Ramer-Douglas-Peucker simplification.

use crate::geometry::{segment_distance, Point};

/// Simplifies an open polyline, keeping both endpoints.
pub fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let start = points[0];
    let end = points[points.len() - 1];
    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, point) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = segment_distance(point, &start, &end);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > epsilon {
        let mut left = douglas_peucker(&points[..=max_idx], epsilon);
        let right = douglas_peucker(&points[max_idx..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![start, end]
    }
}

/// Simplifies a closed ring.
///
/// The ring is split at its first vertex and the vertex farthest from it;
/// each half is simplified on its own so the split points always survive.
pub fn simplify_ring(ring: &[Point], epsilon: f64) -> Vec<Point> {
    if ring.len() <= 3 {
        return ring.to_vec();
    }

    let anchor = ring[0];
    let (split, _) = ring
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, p)| (i, p.distance_to(&anchor)))
        .fold((1, f64::MIN), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        });

    let mut first_half = douglas_peucker(&ring[..=split], epsilon);

    let mut second: Vec<Point> = ring[split..].to_vec();
    second.push(anchor);
    let second_half = douglas_peucker(&second, epsilon);

    first_half.pop();
    first_half.extend(second_half);
    // The closing anchor duplicates the first vertex.
    first_half.pop();
    first_half
}
