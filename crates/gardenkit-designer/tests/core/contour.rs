use gardenkit_core::{Cell, Coverage, Zone, ZonePatch};
use gardenkit_designer::contour::{
    build_zone_geometry, chaikin_pass, douglas_peucker, pole_of_inaccessibility, smooth_ring,
    trace_outline, CellMask, ContourOptions, ZoneGeometryCache,
};
use gardenkit_designer::geometry::{point_in_ring, signed_area};
use gardenkit_designer::Point;
use proptest::prelude::*;

fn options() -> ContourOptions {
    ContourOptions::default()
}

fn within(p: Point, x0: f64, y0: f64, x1: f64, y1: f64) -> bool {
    p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
}

#[test]
fn test_two_by_two_block_traces_a_square() {
    let coverage = Coverage::rect(0, 0, 2, 2);
    let mask = CellMask::from_coverage(&coverage).unwrap();
    assert_eq!((mask.width(), mask.height()), (4, 4));

    let outline = trace_outline(&mask);
    assert_eq!(outline.len(), 4);
    for corner in [(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)] {
        assert!(outline.contains(&Point::new(corner.0, corner.1)), "missing {:?}", corner);
    }
    assert!(signed_area(&outline) > 0.0);
}

#[test]
fn test_two_by_two_block_geometry() {
    let geometry = build_zone_geometry(&Coverage::rect(0, 0, 2, 2), &options());
    assert_eq!(geometry.outline().len(), 4);
    assert!(geometry.border_path().len() >= 16);
    assert!(!geometry.is_fallback());

    for p in geometry.border_path() {
        assert!(within(*p, 0.0, 0.0, 40.0, 40.0), "{} outside block", p);
    }
    let anchor = geometry.label_anchor().unwrap();
    assert!(within(anchor, 0.0, 0.0, 40.0, 40.0));
    assert!(anchor.approx_eq(&Point::new(20.0, 20.0), 2.0));
}

#[test]
fn test_geometry_is_placed_at_coverage_offset() {
    let geometry = build_zone_geometry(&Coverage::rect(10, 5, 3, 2), &options());
    for p in geometry.border_path() {
        assert!(within(*p, 200.0, 100.0, 260.0, 140.0), "{} outside block", p);
    }
    assert!(geometry.contains(210.0, 110.0));
    assert!(!geometry.contains(190.0, 110.0));
}

#[test]
fn test_single_cell_has_a_path() {
    let geometry = build_zone_geometry(&Coverage::rect(4, 4, 1, 1), &options());
    assert!(!geometry.border_path().is_empty());
    let anchor = geometry.label_anchor().unwrap();
    assert!(within(anchor, 80.0, 80.0, 100.0, 100.0));
}

#[test]
fn test_empty_coverage_falls_back() {
    let geometry = build_zone_geometry(&Coverage::empty(), &options());
    assert!(geometry.is_fallback());
    assert!(geometry.border_path().is_empty());
    assert!(geometry.label_anchor().is_none());
    assert!(!geometry.contains(0.0, 0.0));
}

#[test]
fn test_l_shape_label_inside_coverage() {
    // ##
    // #
    // ###
    let cells = [(0, 0), (1, 0), (0, 1), (0, 2), (1, 2), (2, 2)]
        .into_iter()
        .map(|(c, r)| Cell::new(c, r));
    let coverage = Coverage::from_cells(cells);
    let geometry = build_zone_geometry(&coverage, &options());

    assert!(geometry.outline().len() >= 6);
    let anchor = geometry.label_anchor().unwrap();
    assert!(geometry.contains(anchor.x, anchor.y), "label at {}", anchor);
    assert!(point_in_ring(&anchor, geometry.border_path()));
}

#[test]
fn test_large_outline_is_simplified() {
    let radius = 20;
    let disc = Coverage::from_cells((-radius..=radius).flat_map(|r| {
        (-radius..=radius)
            .filter(move |c| c * c + r * r <= radius * radius)
            .map(move |c| Cell::new(c + radius, r + radius))
    }));
    let traced = trace_outline(&CellMask::from_coverage(&disc).unwrap()).len();
    assert!(traced > options().simplify_threshold);

    let geometry = build_zone_geometry(&disc, &options());
    assert!(geometry.outline().len() <= traced);
    assert!(geometry.border_path().len() >= geometry.outline().len());
    let anchor = geometry.label_anchor().unwrap();
    assert!(anchor.approx_eq(&Point::new(410.0, 410.0), 40.0));
}

#[test]
fn test_chaikin_doubles_vertices() {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(4.0, 4.0),
        Point::new(0.0, 4.0),
    ];
    let once = chaikin_pass(&square);
    assert_eq!(once.len(), 8);
    assert!(once.contains(&Point::new(1.0, 0.0)));
    assert!(once.contains(&Point::new(3.0, 0.0)));
    assert_eq!(smooth_ring(&square, 2, false).len(), 16);
    assert_eq!(smooth_ring(&square, 0, false).len(), 4);
}

#[test]
fn test_douglas_peucker_drops_near_collinear_points() {
    let line = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.1),
        Point::new(2.0, -0.1),
        Point::new(3.0, 5.0),
        Point::new(4.0, 0.0),
    ];
    let simplified = douglas_peucker(&line, 0.5);
    assert_eq!(
        simplified,
        vec![Point::new(0.0, 0.0), Point::new(2.0, -0.1), Point::new(3.0, 5.0), Point::new(4.0, 0.0)]
    );
}

#[test]
fn test_pole_of_inaccessibility_of_rectangle() {
    let rect = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 40.0),
        Point::new(0.0, 40.0),
    ];
    let pole = pole_of_inaccessibility(&rect, 0.5).unwrap();
    assert!((pole.y - 20.0).abs() < 1.0);
    assert!(pole.x > 19.0 && pole.x < 81.0);
    assert_eq!(pole_of_inaccessibility(&rect[..2], 0.5), Some(rect[0]));
    assert!(pole_of_inaccessibility(&[], 0.5).is_none());
}

#[test]
fn test_cache_rebuilds_only_changed_coverage() {
    let mut cache = ZoneGeometryCache::new(options());
    let beds = Zone::new("#8bc34a", Coverage::rect(0, 0, 4, 4));
    let path = Zone::new("#9e9e9e", Coverage::rect(6, 0, 1, 8));
    let mut zones = vec![beds.clone(), path.clone()];

    assert_eq!(cache.sync(&zones), 2);
    assert_eq!(cache.sync(&zones), 0);
    assert_eq!(cache.rebuilds(), 2);

    zones[0].apply(&ZonePatch::new(beds.id).display_name("Raised beds"));
    assert_eq!(cache.sync(&zones), 0);

    zones[0].apply(&ZonePatch::new(beds.id).coverage(Coverage::rect(0, 0, 5, 4)));
    assert_eq!(cache.sync(&zones), 1);

    zones.remove(1);
    cache.sync(&zones);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(path.id).is_none());
}

#[test]
fn test_cache_freshness_follows_coverage_storage() {
    let mut cache = ZoneGeometryCache::new(options());
    let beds = Zone::new("#8bc34a", Coverage::rect(0, 0, 4, 4));
    let mut zones = vec![beds.clone()];
    cache.sync(&zones);

    zones[0] = beds.clone();
    assert_eq!(cache.sync(&zones), 0);

    // Same cells in new storage count as a new coverage.
    zones[0].coverage = Coverage::rect(0, 0, 4, 4);
    assert_eq!(zones[0].coverage, beds.coverage);
    assert_eq!(cache.sync(&zones), 1);
    assert_eq!(cache.rebuilds(), 2);
}

#[test]
fn test_cache_hit_test_prefers_topmost_zone() {
    let mut cache = ZoneGeometryCache::new(options());
    let lawn = Zone::new("#4caf50", Coverage::rect(0, 0, 10, 10));
    let pond = Zone::new("#2196f3", Coverage::rect(2, 2, 2, 2));
    let zones = vec![lawn.clone(), pond.clone()];
    cache.sync(&zones);

    assert_eq!(cache.hit_test(&zones, 50.0, 50.0), Some(pond.id));
    assert_eq!(cache.hit_test(&zones, 150.0, 150.0), Some(lawn.id));
    assert_eq!(cache.hit_test(&zones, 250.0, 50.0), None);
}

/// Filled disc of `radius` cells centered on `(radius, radius)`.
fn disc(radius: i32) -> Coverage {
    Coverage::from_cells((-radius..=radius).flat_map(|r| {
        (-radius..=radius)
            .filter(move |c| c * c + r * r <= radius * radius)
            .map(move |c| Cell::new(c + radius, r + radius))
    }))
}

fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// True when two non-adjacent edges of the closed ring properly cross.
fn self_intersects(ring: &[Point]) -> bool {
    let n = ring.len();
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[(i + 1) % n]);
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (c, d) = (&ring[j], &ring[(j + 1) % n]);
            let d1 = cross(a, b, c);
            let d2 = cross(a, b, d);
            let d3 = cross(c, d, a);
            let d4 = cross(c, d, b);
            if d1 * d2 < -1e-9 && d3 * d4 < -1e-9 {
                return true;
            }
        }
    }
    false
}

#[test]
fn test_self_intersection_check_detects_a_bow_tie() {
    let bow_tie = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
    ];
    assert!(self_intersects(&bow_tie));
    assert!(!self_intersects(&bow_tie[..3]));
}

proptest! {
    #[test]
    fn prop_rectangle_outline_is_simple(
        col in -50i32..50,
        row in -50i32..50,
        cols in 1i32..12,
        rows in 1i32..12,
    ) {
        let geometry = build_zone_geometry(&Coverage::rect(col, row, cols, rows), &options());
        prop_assert!(!geometry.border_path().is_empty());
        prop_assert!(!self_intersects(geometry.border_path()));
    }

    #[test]
    fn prop_disc_outline_is_simple(radius in 1i32..=20) {
        let geometry = build_zone_geometry(&disc(radius), &options());
        prop_assert!(!geometry.border_path().is_empty());
        prop_assert!(!self_intersects(geometry.border_path()));
    }

    #[test]
    fn prop_any_nonempty_coverage_has_a_path(
        cells in prop::collection::vec((0i32..12, 0i32..12), 1..40),
    ) {
        let coverage = Coverage::from_cells(cells.into_iter().map(|(c, r)| Cell::new(c, r)));
        let geometry = build_zone_geometry(&coverage, &options());
        prop_assert!(!geometry.border_path().is_empty());
        prop_assert!(geometry.label_anchor().is_some());
    }

    #[test]
    fn prop_scattered_cells_never_panic(
        cells in prop::collection::vec((any::<i32>(), any::<i32>()), 1..6),
    ) {
        let coverage = Coverage::from_cells(cells.iter().map(|&(c, r)| Cell::new(c, r)));
        let geometry = build_zone_geometry(&coverage, &options());
        prop_assert!(!geometry.border_path().is_empty());
        let (col, row) = cells[0];
        let cell_size = options().cell_size;
        let x = (f64::from(col) + 0.5) * cell_size;
        let y = (f64::from(row) + 0.5) * cell_size;
        prop_assert!(geometry.contains(x, y));
    }
}
