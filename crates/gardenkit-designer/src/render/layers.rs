//! Raster layer store.
//!
//! One offscreen [`Pixmap`] per named layer, each covering the whole world
//! at `device_pixel_ratio * render_factor` pixels per world unit. Callers
//! draw through a [`LayerContext`] whose base transform is pre-scaled, so
//! all geometry is given in world units. [`LayerStore::composite_to`] stacks
//! the layers onto a visible surface in the requested order.

use gardenkit_core::LayerError;
use tiny_skia::{
    Color, FillRule, FilterQuality, Paint, Path, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

/// A named offscreen surface.
#[derive(Debug)]
struct Layer {
    name: String,
    pixmap: Pixmap,
}

/// Owns the offscreen surfaces of an editor session.
#[derive(Debug)]
pub struct LayerStore {
    names: Vec<String>,
    layers: Vec<Layer>,
    world_width: f64,
    world_height: f64,
    device_pixel_ratio: f64,
    render_factor: f64,
    released: bool,
}

impl LayerStore {
    /// Allocates one surface per name.
    pub fn new<S: AsRef<str>>(
        world_width: f64,
        world_height: f64,
        names: &[S],
        device_pixel_ratio: f64,
        render_factor: f64,
    ) -> Result<Self, LayerError> {
        let mut store = Self {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            layers: Vec::new(),
            world_width,
            world_height,
            device_pixel_ratio,
            render_factor,
            released: false,
        };
        store.layers = store.allocate()?;
        tracing::debug!(
            "Allocated {} layers at {}x{} px",
            store.layers.len(),
            store.backing_size().0,
            store.backing_size().1
        );
        Ok(store)
    }

    /// Layer names in creation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when `name` is a known layer.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// World extent as `(width, height)`.
    pub fn world_size(&self) -> (f64, f64) {
        (self.world_width, self.world_height)
    }

    /// Current render factor.
    pub fn render_factor(&self) -> f64 {
        self.render_factor
    }

    /// Device pixels per world unit.
    pub fn pixel_factor(&self) -> f64 {
        self.device_pixel_ratio * self.render_factor
    }

    /// Backing-store size of every layer in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        backing_dimension(self.world_width, self.world_height, self.pixel_factor())
    }

    /// True once [`release`](Self::release) has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Drawing context for a named layer.
    pub fn get_context(&mut self, name: &str) -> Result<LayerContext<'_>, LayerError> {
        let factor = self.pixel_factor() as f32;
        let layer = self.layer_mut(name)?;
        Ok(LayerContext {
            pixmap: &mut layer.pixmap,
            base: Transform::from_scale(factor, factor),
        })
    }

    /// Read access to a layer's pixels.
    pub fn pixmap(&self, name: &str) -> Result<&Pixmap, LayerError> {
        self.layer(name).map(|layer| &layer.pixmap)
    }

    /// Clears a layer to transparent.
    pub fn clear_layer(&mut self, name: &str) -> Result<(), LayerError> {
        self.layer_mut(name)?.pixmap.fill(Color::TRANSPARENT);
        Ok(())
    }

    /// Clears every layer to transparent.
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.pixmap.fill(Color::TRANSPARENT);
        }
    }

    /// Draws the named layers onto `target` in order, later layers on top.
    ///
    /// `view` maps world units to target pixels. All names are checked
    /// before anything is drawn.
    pub fn composite_to<S: AsRef<str>>(
        &self,
        target: &mut Pixmap,
        order: &[S],
        view: Transform,
    ) -> Result<(), LayerError> {
        let layers = order
            .iter()
            .map(|name| self.layer(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let inverse = (1.0 / self.pixel_factor()) as f32;
        let placement = view.pre_scale(inverse, inverse);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        for layer in layers {
            target.draw_pixmap(0, 0, layer.pixmap.as_ref(), &paint, placement, None);
        }
        Ok(())
    }

    /// Reallocates every surface for a new world extent. Content is lost.
    pub fn resize(&mut self, world_width: f64, world_height: f64) -> Result<(), LayerError> {
        let (old_width, old_height) = (self.world_width, self.world_height);
        self.world_width = world_width;
        self.world_height = world_height;
        match self.reallocate() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.world_width = old_width;
                self.world_height = old_height;
                Err(e)
            }
        }
    }

    /// Changes the render factor. Returns true when the surfaces were
    /// reallocated (their content is lost).
    pub fn set_render_factor(&mut self, render_factor: f64) -> Result<bool, LayerError> {
        if (render_factor - self.render_factor).abs() < 1e-9 {
            return Ok(false);
        }
        let old = self.render_factor;
        self.render_factor = render_factor;
        if let Err(e) = self.reallocate() {
            self.render_factor = old;
            return Err(e);
        }
        Ok(true)
    }

    /// Drops every surface. Later lookups fail with [`LayerError::Released`].
    pub fn release(&mut self) {
        if !self.released {
            tracing::debug!("Releasing {} layers", self.layers.len());
        }
        self.layers.clear();
        self.released = true;
    }

    fn reallocate(&mut self) -> Result<(), LayerError> {
        if self.released {
            return Err(LayerError::Released);
        }
        self.layers = self.allocate()?;
        Ok(())
    }

    fn allocate(&self) -> Result<Vec<Layer>, LayerError> {
        let factor = self.pixel_factor();
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !(valid(self.world_width) && valid(self.world_height) && valid(factor)) {
            return Err(LayerError::DegenerateExtent {
                width: self.world_width,
                height: self.world_height,
                factor,
            });
        }

        let (width, height) = self.backing_size();
        self.names
            .iter()
            .map(|name| {
                Pixmap::new(width, height)
                    .map(|pixmap| Layer {
                        name: name.clone(),
                        pixmap,
                    })
                    .ok_or_else(|| LayerError::SurfaceAllocation {
                        name: name.clone(),
                        width,
                        height,
                    })
            })
            .collect()
    }

    fn layer(&self, name: &str) -> Result<&Layer, LayerError> {
        if self.released {
            return Err(LayerError::Released);
        }
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .ok_or_else(|| LayerError::UnknownLayer {
                name: name.to_string(),
            })
    }

    fn layer_mut(&mut self, name: &str) -> Result<&mut Layer, LayerError> {
        if self.released {
            return Err(LayerError::Released);
        }
        self.layers
            .iter_mut()
            .find(|layer| layer.name == name)
            .ok_or_else(|| LayerError::UnknownLayer {
                name: name.to_string(),
            })
    }
}

fn backing_dimension(width: f64, height: f64, factor: f64) -> (u32, u32) {
    let scale = |v: f64| (v * factor).ceil().clamp(1.0, u32::MAX as f64) as u32;
    (scale(width), scale(height))
}

/// Drawing context for one layer. Geometry is in world units.
pub struct LayerContext<'a> {
    pixmap: &'a mut Pixmap,
    base: Transform,
}

impl<'a> LayerContext<'a> {
    /// World-to-pixel transform of this layer.
    pub fn transform(&self) -> Transform {
        self.base
    }

    /// Clears the layer to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Fills the whole layer with a color.
    pub fn fill(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Fills a world-space rectangle. Empty rectangles are skipped.
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: &Paint) {
        if let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) {
            self.pixmap.fill_rect(rect, paint, self.base, None);
        }
    }

    /// Fills a world-space path.
    pub fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.fill_path_with(path, paint, Transform::identity());
    }

    /// Fills a path placed by an extra local transform.
    pub fn fill_path_with(&mut self, path: &Path, paint: &Paint, local: Transform) {
        self.pixmap
            .fill_path(path, paint, FillRule::Winding, self.base.pre_concat(local), None);
    }

    /// Strokes a world-space path.
    pub fn stroke_path(&mut self, path: &Path, paint: &Paint, stroke: &Stroke) {
        self.stroke_path_with(path, paint, stroke, Transform::identity());
    }

    /// Strokes a path placed by an extra local transform.
    pub fn stroke_path_with(&mut self, path: &Path, paint: &Paint, stroke: &Stroke, local: Transform) {
        self.pixmap
            .stroke_path(path, paint, stroke, self.base.pre_concat(local), None);
    }

    /// Draws an image. `local` maps image pixels to world units.
    pub fn draw_pixmap(&mut self, image: &Pixmap, local: Transform) {
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, self.base.pre_concat(local), None);
    }

    /// Size of the backing surface in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }
}
