//! Zone geometry: coverage in, outline, label anchor and hit test out.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use gardenkit_core::{CellBounds, Coverage, Zone};
use gardenkit_settings::ContourSettings;

use crate::geometry::Point;

use super::hit::CellHitTest;
use super::label::pole_of_inaccessibility;
use super::mask::CellMask;
use super::simplify::simplify_ring;
use super::smooth::smooth_ring;
use super::trace::trace_outline;

/// Tuning of the contour pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourOptions {
    /// World size of one cell.
    pub cell_size: f64,
    /// Outlines with more vertices than this are simplified.
    pub simplify_threshold: usize,
    /// Simplification tolerance in cells.
    pub simplify_epsilon: f64,
    /// Chaikin passes.
    pub smoothing_passes: usize,
    /// Label search precision in world units.
    pub label_precision: f64,
    /// Keep axis-aligned right-angle corners while smoothing.
    pub preserve_right_angles: bool,
    /// Largest padded mask traced. Wider coverages skip the outline and
    /// are drawn as their cells.
    pub max_mask_cells: usize,
}

impl ContourOptions {
    /// Options from the contour settings and the world cell size.
    pub fn from_settings(settings: &ContourSettings, cell_size: f64) -> Self {
        Self {
            cell_size,
            simplify_threshold: settings.simplify_threshold,
            simplify_epsilon: settings.simplify_epsilon,
            smoothing_passes: settings.smoothing_passes,
            label_precision: settings.label_precision,
            preserve_right_angles: settings.preserve_right_angles,
            max_mask_cells: CellMask::MAX_CELLS,
        }
    }

    /// Limits tracing to coverages that fit a `cols x rows` world.
    pub fn with_world_extent(mut self, cols: u32, rows: u32) -> Self {
        let padded = (u64::from(cols) + 2) * (u64::from(rows) + 2);
        self.max_mask_cells = usize::try_from(padded).unwrap_or(usize::MAX);
        self
    }
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self::from_settings(&ContourSettings::default(), 20.0)
    }
}

/// Everything derived from one zone's coverage.
#[derive(Debug, Clone)]
pub struct ZoneGeometry {
    outline: Vec<Point>,
    border_path: Vec<Point>,
    label_anchor: Option<Point>,
    fallback: bool,
    hit: CellHitTest,
}

impl ZoneGeometry {
    /// Traced (and possibly simplified) outline in mask units.
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// Smoothed closed outline in world units.
    pub fn border_path(&self) -> &[Point] {
        &self.border_path
    }

    /// Where the zone's name goes, in world units.
    pub fn label_anchor(&self) -> Option<Point> {
        self.label_anchor
    }

    /// True when the outline is too small to fill and the zone should be
    /// drawn as its raw cell rectangles.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Point query against the covered cells.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.hit.contains(x, y)
    }

    /// The cell hit test.
    pub fn hit_test(&self) -> &CellHitTest {
        &self.hit
    }
}

/// Runs the full pipeline for one coverage.
///
/// Never fails: an empty coverage yields an empty fallback geometry, and a
/// single cell yields its square.
pub fn build_zone_geometry(coverage: &Coverage, options: &ContourOptions) -> ZoneGeometry {
    let hit = CellHitTest::new(coverage, options.cell_size);
    let Some(bounds) = coverage.bounds() else {
        return ZoneGeometry {
            outline: Vec::new(),
            border_path: Vec::new(),
            label_anchor: None,
            fallback: true,
            hit,
        };
    };
    let Some(mask) = CellMask::from_coverage_within(coverage, options.max_mask_cells) else {
        tracing::warn!(
            "Zone spans {}x{} cells, drawing it without an outline",
            bounds.cols(),
            bounds.rows()
        );
        return bounding_box_geometry(bounds, options.cell_size, hit);
    };

    let mut outline = trace_outline(&mask);
    // The padding border is empty, so a vertex at the mask origin is noise.
    outline.retain(|p| !(p.x == 0.0 && p.y == 0.0));

    if outline.len() > options.simplify_threshold {
        let before = outline.len();
        outline = simplify_ring(&outline, options.simplify_epsilon);
        tracing::trace!("Simplified outline {} -> {} vertices", before, outline.len());
    }

    let fallback = outline.len() < 3;
    let smoothed = if fallback {
        outline.clone()
    } else {
        smooth_ring(&outline, options.smoothing_passes, options.preserve_right_angles)
    };

    let border_path: Vec<Point> = smoothed
        .iter()
        .map(|p| {
            let (x, y) = mask.to_world(p.x, p.y, options.cell_size);
            Point::new(x, y)
        })
        .collect();

    let label_anchor = if fallback {
        let b = mask.bounds();
        let (x0, y0) = mask.to_world(1.0, 1.0, options.cell_size);
        Some(Point::new(
            x0 + b.cols() as f64 * options.cell_size / 2.0,
            y0 + b.rows() as f64 * options.cell_size / 2.0,
        ))
    } else {
        pole_of_inaccessibility(&border_path, options.label_precision)
    };

    ZoneGeometry {
        outline,
        border_path,
        label_anchor,
        fallback,
        hit,
    }
}

/// Fallback for coverages too wide to trace: the bounding box as border,
/// labelled at its center.
fn bounding_box_geometry(bounds: CellBounds, cell_size: f64, hit: CellHitTest) -> ZoneGeometry {
    let x0 = f64::from(bounds.min_col) * cell_size;
    let y0 = f64::from(bounds.min_row) * cell_size;
    let x1 = (f64::from(bounds.max_col) + 1.0) * cell_size;
    let y1 = (f64::from(bounds.max_row) + 1.0) * cell_size;
    ZoneGeometry {
        outline: Vec::new(),
        border_path: vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ],
        label_anchor: Some(Point::new((x0 + x1) / 2.0, (y0 + y1) / 2.0)),
        fallback: true,
        hit,
    }
}

#[derive(Debug, Clone)]
struct CachedGeometry {
    coverage: Coverage,
    geometry: Arc<ZoneGeometry>,
}

/// Per-zone geometry cache, rebuilt only when a zone's coverage changes.
#[derive(Debug, Default)]
pub struct ZoneGeometryCache {
    options: ContourOptions,
    entries: HashMap<Uuid, CachedGeometry>,
    rebuilds: u64,
}

impl ZoneGeometryCache {
    /// Creates an empty cache.
    pub fn new(options: ContourOptions) -> Self {
        Self {
            options,
            entries: HashMap::new(),
            rebuilds: 0,
        }
    }

    /// Pipeline options in use.
    pub fn options(&self) -> &ContourOptions {
        &self.options
    }

    /// Changes the options, dropping every entry if they differ.
    pub fn set_options(&mut self, options: ContourOptions) {
        if options != self.options {
            self.options = options;
            self.entries.clear();
        }
    }

    /// Brings the cache in line with `zones`: rebuilds entries whose
    /// coverage storage changed and drops entries of removed zones. Returns the
    /// number of zones rebuilt.
    pub fn sync(&mut self, zones: &[Zone]) -> usize {
        let mut rebuilt = 0;
        for zone in zones {
            let fresh = self
                .entries
                .get(&zone.id)
                .is_some_and(|cached| cached.coverage.same_as(&zone.coverage));
            if !fresh {
                self.insert(zone);
                rebuilt += 1;
            }
        }
        if self.entries.len() > zones.len() || rebuilt > 0 {
            self.entries
                .retain(|id, _| zones.iter().any(|zone| zone.id == *id));
        }
        if rebuilt > 0 {
            tracing::debug!("Rebuilt geometry for {} zones", rebuilt);
        }
        rebuilt
    }

    /// Geometry of `zone`, building it if missing or stale.
    pub fn get_or_build(&mut self, zone: &Zone) -> Arc<ZoneGeometry> {
        match self.entries.get(&zone.id) {
            Some(cached) if cached.coverage.same_as(&zone.coverage) => cached.geometry.clone(),
            _ => self.insert(zone),
        }
    }

    /// Cached geometry of a zone, if present.
    pub fn get(&self, id: Uuid) -> Option<&ZoneGeometry> {
        self.entries.get(&id).map(|cached| cached.geometry.as_ref())
    }

    /// Topmost zone (last in `zones`) containing the world point.
    pub fn hit_test(&self, zones: &[Zone], x: f64, y: f64) -> Option<Uuid> {
        zones
            .iter()
            .rev()
            .find(|zone| match self.entries.get(&zone.id) {
                Some(cached) if cached.coverage.same_as(&zone.coverage) => {
                    cached.geometry.contains(x, y)
                }
                _ => CellHitTest::new(&zone.coverage, self.options.cell_size).contains(x, y),
            })
            .map(|zone| zone.id)
    }

    /// Forgets one zone.
    pub fn invalidate(&mut self, id: Uuid) {
        self.entries.remove(&id);
    }

    /// Forgets every zone.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached zones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of pipeline runs since creation.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn insert(&mut self, zone: &Zone) -> Arc<ZoneGeometry> {
        let geometry = Arc::new(build_zone_geometry(&zone.coverage, &self.options));
        self.rebuilds += 1;
        self.entries.insert(
            zone.id,
            CachedGeometry {
                coverage: zone.coverage.clone(),
                geometry: geometry.clone(),
            },
        );
        geometry
    }
}
