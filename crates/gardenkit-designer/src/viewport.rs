//! Viewport store: owns the pan/zoom transform.
//!
//! Converts between screen pixels (0,0 at the top-left of the visible area)
//! and world units (0,0 at the top-left of the map, y grows downwards).
//! Every change goes through [`Viewport::set_transform`], which clamps the
//! translation so the map always covers the visible area and then notifies
//! listeners on the event bus.

use std::fmt;
use std::sync::Arc;

use gardenkit_core::{EditorEvent, EventBus, ViewportEvent};
use gardenkit_settings::Config;

use crate::geometry::{Point, Size};
use crate::transform::{self, AffineTransform};

/// Pan/zoom state of the visible canvas.
#[derive(Debug, Clone)]
pub struct Viewport {
    transform: AffineTransform,
    viewport: Size,
    content: Size,
    min_zoom: f64,
    max_zoom: f64,
    wheel_factor: f64,
    bus: Option<Arc<EventBus>>,
}

impl Viewport {
    /// Default lower zoom limit.
    pub const MIN_ZOOM: f64 = 0.5;
    /// Default upper zoom limit.
    pub const MAX_ZOOM: f64 = 2.0;
    /// Default zoom multiplier per wheel notch.
    pub const WHEEL_FACTOR: f64 = 1.05;

    /// Creates a viewport at 100% zoom showing the top-left of the content.
    pub fn new(viewport: Size, content: Size) -> Self {
        Self {
            transform: AffineTransform::IDENTITY,
            viewport,
            content,
            min_zoom: Self::MIN_ZOOM,
            max_zoom: Self::MAX_ZOOM,
            wheel_factor: Self::WHEEL_FACTOR,
            bus: None,
        }
    }

    /// Creates a viewport from the editor configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut viewport = Self::new(
            Size::new(config.viewport.width, config.viewport.height),
            Size::new(config.world.width(), config.world.height()),
        );
        viewport.min_zoom = config.viewport.min_zoom;
        viewport.max_zoom = config.viewport.max_zoom;
        viewport.wheel_factor = config.viewport.wheel_factor;
        viewport
    }

    /// Attaches an event bus for change notifications.
    pub fn with_event_bus(mut self, bus: Arc<EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Sets the zoom limits.
    pub fn with_zoom_limits(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    /// Current transform.
    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// Current zoom scale (1.0 = 100%).
    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    /// Visible area in screen pixels.
    pub fn size(&self) -> Size {
        self.viewport
    }

    /// World extent in world units.
    pub fn content_size(&self) -> Size {
        self.content
    }

    /// Zoom limits as `(min, max)`.
    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Replaces the transform. The translation is clamped to the content
    /// bounds; returns true when the stored transform changed.
    pub fn set_transform(&mut self, transform: AffineTransform) -> bool {
        if !transform.is_invertible() {
            tracing::warn!("Ignoring degenerate viewport transform {}", transform);
            return false;
        }

        let clamped = transform::clamp_to_bounds(&transform, self.content, self.viewport);
        if clamped == self.transform {
            return false;
        }

        self.transform = clamped;
        self.notify(ViewportEvent::TransformChanged {
            scale: clamped.a,
            translate_x: clamped.e,
            translate_y: clamped.f,
        });
        true
    }

    /// Zooms to `scale` (clamped to the zoom limits) about `center`, or the
    /// middle of the visible area when no center is given.
    pub fn set_scale(&mut self, scale: f64, center: Option<Point>) -> bool {
        let target = scale.clamp(self.min_zoom, self.max_zoom);
        let current = self.scale();
        if !(current > 0.0) || (target - current).abs() < f64::EPSILON {
            return false;
        }
        let center = center.unwrap_or_else(|| self.viewport.center());
        self.set_transform(transform::zoom_about(&self.transform, target / current, center))
    }

    /// Applies one mouse-wheel step, keeping the world point under `pointer`
    /// fixed. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f64, pointer: Point) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return false;
        }
        let factor = if delta_y < 0.0 {
            self.wheel_factor
        } else {
            1.0 / self.wheel_factor
        };
        self.set_scale(self.scale() * factor, Some(pointer))
    }

    /// Zooms in by one wheel step about the viewport center.
    pub fn zoom_in(&mut self) -> bool {
        self.set_scale(self.scale() * self.wheel_factor, None)
    }

    /// Zooms out by one wheel step about the viewport center.
    pub fn zoom_out(&mut self) -> bool {
        self.set_scale(self.scale() / self.wheel_factor, None)
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        self.set_transform(transform::pan(&self.transform, dx, dy))
    }

    /// Returns to 100% zoom at the map origin.
    pub fn reset(&mut self) -> bool {
        self.set_transform(AffineTransform::IDENTITY)
    }

    /// Updates the visible area (window resize) and re-clamps.
    pub fn resize(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        if !size.is_valid() || size == self.viewport {
            return;
        }
        self.viewport = size;
        self.notify(ViewportEvent::Resized { width, height });
        self.set_transform(self.transform);
    }

    /// Updates the world extent and re-clamps.
    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
        self.set_transform(self.transform);
    }

    /// Converts a screen point to world coordinates.
    pub fn screen_to_world(&self, x: f64, y: f64) -> Point {
        transform::screen_to_world(x, y, &self.transform)
    }

    /// Converts a world point to screen coordinates.
    pub fn world_to_screen(&self, x: f64, y: f64) -> Point {
        transform::world_to_screen(x, y, &self.transform)
    }

    fn notify(&self, event: ViewportEvent) {
        if let Some(bus) = &self.bus {
            bus.notify(EditorEvent::Viewport(event));
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Viewport {{ zoom: {:.2}x, pan: ({:.1}, {:.1}), size: {}x{} }}",
            self.transform.a, self.transform.e, self.transform.f, self.viewport.width, self.viewport.height
        )
    }
}
