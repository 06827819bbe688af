//! Scene painter: draws domain state into the editor layers.
//!
//! Each `paint_*` function fills one layer from a snapshot. Zone names are
//! not rasterized; [`ScenePainter::paint_zones`] returns their placements
//! so the host can draw text with its own font stack.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tiny_skia::{Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};
use uuid::Uuid;

use gardenkit_core::{CellKey, CellPaint, Item, Zone};

use crate::color::Rgb;
use crate::contour::ZoneGeometryCache;
use crate::geometry::Point;
use crate::image_cache::{ImageCache, ImageHandle};
use crate::render::LayerContext;

const BACKGROUND: Rgb = Rgb::new(0xf4, 0xf1, 0xe8);
const GRID_LINE: Rgb = Rgb::new(0xd8, 0xd2, 0xc0);
const SELECTION: Rgb = Rgb::new(0x08, 0x91, 0xc5);
const ITEM_FILL: Rgb = Rgb::new(0x6b, 0x8e, 0x23);
const OUTLINE_DARKEN: f64 = 0.6;

/// Where to draw a zone's display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub zone: Uuid,
    pub text: String,
    /// Anchor in world units; text is centered on it.
    pub anchor: Point,
    /// Text color as `#rrggbb`.
    pub color: String,
}

/// Draws the background grid, zones, painted cells and items.
#[derive(Debug, Clone)]
pub struct ScenePainter {
    cell_size: f64,
    cols: u32,
    rows: u32,
}

fn solid(color: Rgb, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia(alpha));
    paint.anti_alias = true;
    paint
}

fn stroke(width: f64) -> Stroke {
    Stroke {
        width: width as f32,
        ..Stroke::default()
    }
}

/// Closed path through the midpoints of `points`, with each vertex as the
/// control point of a quadratic curve.
fn smooth_polygon(points: &[Point]) -> Option<Path> {
    if points.len() < 3 {
        return None;
    }
    let mid = |a: &Point, b: &Point| ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let n = points.len();
    let mut pb = PathBuilder::new();
    let (sx, sy) = mid(&points[n - 1], &points[0]);
    pb.move_to(sx as f32, sy as f32);
    for i in 0..n {
        let control = &points[i];
        let (mx, my) = mid(control, &points[(i + 1) % n]);
        pb.quad_to(control.x as f32, control.y as f32, mx as f32, my as f32);
    }
    pb.close();
    pb.finish()
}

impl ScenePainter {
    /// Creates a painter for a `cols x rows` grid.
    pub fn new(cell_size: f64, cols: u32, rows: u32) -> Self {
        Self {
            cell_size,
            cols,
            rows,
        }
    }

    /// World extent as `(width, height)`.
    pub fn world_size(&self) -> (f64, f64) {
        (
            f64::from(self.cols) * self.cell_size,
            f64::from(self.rows) * self.cell_size,
        )
    }

    /// Background color, optional image stretched over the world, grid lines.
    pub fn paint_background(&self, ctx: &mut LayerContext<'_>, image: Option<&Pixmap>) {
        let (width, height) = self.world_size();
        ctx.fill_rect(0.0, 0.0, width, height, &solid(BACKGROUND, 255));

        if let Some(image) = image {
            let sx = width / f64::from(image.width());
            let sy = height / f64::from(image.height());
            ctx.draw_pixmap(image, Transform::from_scale(sx as f32, sy as f32));
        }

        let mut pb = PathBuilder::new();
        for col in 0..=self.cols {
            let x = (f64::from(col) * self.cell_size) as f32;
            pb.move_to(x, 0.0);
            pb.line_to(x, height as f32);
        }
        for row in 0..=self.rows {
            let y = (f64::from(row) * self.cell_size) as f32;
            pb.move_to(0.0, y);
            pb.line_to(width as f32, y);
        }
        if let Some(path) = pb.finish() {
            ctx.stroke_path(&path, &solid(GRID_LINE, 255), &stroke(1.0));
        }
    }

    /// Fills and outlines every zone. Returns label placements for named zones.
    pub fn paint_zones(
        &self,
        ctx: &mut LayerContext<'_>,
        zones: &[Zone],
        geometry: &mut ZoneGeometryCache,
        selected: Option<Uuid>,
    ) -> Vec<LabelPlacement> {
        let mut labels = Vec::new();
        for zone in zones {
            if zone.coverage.is_empty() {
                continue;
            }
            let shape = geometry.get_or_build(zone);
            let color = Rgb::parse_or_fallback(&zone.color);
            let outline_color = color.darken(OUTLINE_DARKEN);
            let is_selected = selected == Some(zone.id);

            match smooth_polygon(shape.border_path()).filter(|_| !shape.is_fallback()) {
                Some(path) => {
                    ctx.fill_path(&path, &solid(color, 200));
                    if is_selected {
                        let mut dashed = stroke(5.0);
                        dashed.dash = StrokeDash::new(vec![10.0, 4.0], 0.0);
                        ctx.stroke_path(&path, &solid(SELECTION, 255), &dashed);
                    } else {
                        ctx.stroke_path(&path, &solid(outline_color, 255), &stroke(2.0));
                    }
                }
                None => self.paint_cell_rects(ctx, zone, color, is_selected),
            }

            if let (Some(name), Some(anchor)) = (&zone.display_name, shape.label_anchor()) {
                labels.push(LabelPlacement {
                    zone: zone.id,
                    text: name.clone(),
                    anchor,
                    color: outline_color.to_string(),
                });
            }
        }
        labels
    }

    fn paint_cell_rects(&self, ctx: &mut LayerContext<'_>, zone: &Zone, color: Rgb, selected: bool) {
        let fill = solid(color, 200);
        for cell in zone.coverage.iter() {
            let (x, y, w, h) = cell.world_rect(self.cell_size);
            ctx.fill_rect(x, y, w, h, &fill);
        }
        if selected {
            if let Some(bounds) = zone.coverage.bounds() {
                let x = f64::from(bounds.min_col) * self.cell_size;
                let y = f64::from(bounds.min_row) * self.cell_size;
                let w = bounds.cols() as f64 * self.cell_size;
                let h = bounds.rows() as f64 * self.cell_size;
                if let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, w as f32, h as f32) {
                    let path = PathBuilder::from_rect(rect);
                    ctx.stroke_path(&path, &solid(SELECTION, 255), &stroke(3.0));
                }
            }
        }
    }

    /// Fills every painted cell.
    pub fn paint_cells(&self, ctx: &mut LayerContext<'_>, cells: &BTreeMap<CellKey, CellPaint>) {
        for (key, paint) in cells {
            let (x, y, w, h) = key.cell().world_rect(self.cell_size);
            ctx.fill_rect(x, y, w, h, &solid(Rgb::parse_or_fallback(&paint.color), 255));
        }
    }

    /// Draws every item as a rotated rectangle, or its icon once loaded.
    pub fn paint_items(
        &self,
        ctx: &mut LayerContext<'_>,
        items: &[Item],
        images: &mut ImageCache,
        selected: Option<Uuid>,
    ) {
        for item in items {
            let Some(rect) = tiny_skia::Rect::from_xywh(
                item.x as f32,
                item.y as f32,
                item.width as f32,
                item.height as f32,
            ) else {
                continue;
            };
            let (cx, cy) = item.center();
            let rotation = Transform::from_rotate_at(item.rotation as f32, cx as f32, cy as f32);
            let body = PathBuilder::from_rect(rect);

            let icon = item
                .icon
                .as_deref()
                .map(|key| images.get_or_load(key));
            match icon {
                Some(ImageHandle::Ready(pixmap)) => {
                    let placement = rotation
                        .pre_translate(item.x as f32, item.y as f32)
                        .pre_scale(
                            (item.width / f64::from(pixmap.width())) as f32,
                            (item.height / f64::from(pixmap.height())) as f32,
                        );
                    ctx.draw_pixmap(&pixmap, placement);
                }
                _ => {
                    ctx.fill_path_with(&body, &solid(ITEM_FILL, 220), rotation);
                    ctx.stroke_path_with(
                        &body,
                        &solid(ITEM_FILL.darken(OUTLINE_DARKEN), 255),
                        &stroke(1.0),
                        rotation,
                    );
                }
            }

            if selected == Some(item.id) {
                let mut dashed = stroke(2.0);
                dashed.dash = StrokeDash::new(vec![6.0, 3.0], 0.0);
                ctx.stroke_path_with(&body, &solid(SELECTION, 255), &dashed, rotation);
            }
        }
    }
}
