//! Screen/world coordinate transforms.
//!
//! An [`AffineTransform`] maps world units to screen pixels:
//!
//! ```text
//! screen_x = a * x + c * y + e
//! screen_y = b * x + d * y + f
//! ```
//!
//! The editor only produces uniform zoom plus translation (`a == d`,
//! `b == c == 0`), but every function here works on the general form.
//! All functions are pure and return a new transform.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{Point, Size};

/// A 2D affine map from world space to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Scale x.
    pub a: f64,
    /// Skew y.
    pub b: f64,
    /// Skew x.
    pub c: f64,
    /// Scale y.
    pub d: f64,
    /// Translate x.
    pub e: f64,
    /// Translate y.
    pub f: f64,
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: AffineTransform = AffineTransform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a transform from its six coefficients.
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Uniform scale followed by a translation.
    pub const fn scale_translate(scale: f64, tx: f64, ty: f64) -> Self {
        Self::new(scale, 0.0, 0.0, scale, tx, ty)
    }

    /// Pure translation.
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::scale_translate(1.0, tx, ty)
    }

    /// Uniform zoom scale (the x scale coefficient).
    pub fn scale(&self) -> f64 {
        self.a
    }

    /// Translation part as `(e, f)`.
    pub fn offset(&self) -> (f64, f64) {
        (self.e, self.f)
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// True when the transform can be inverted.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        det.is_finite() && det.abs() > f64::EPSILON
    }

    /// Composition `self * other`: applies `other` first, then `self`.
    pub fn multiply(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform::new(
            self.a * other.a + self.c * other.b,
            self.b * other.a + self.d * other.b,
            self.a * other.c + self.c * other.d,
            self.b * other.c + self.d * other.d,
            self.a * other.e + self.c * other.f + self.e,
            self.b * other.e + self.d * other.f + self.f,
        )
    }

    /// Inverse transform, `None` for a zero-scale transform.
    pub fn inverse(&self) -> Option<AffineTransform> {
        if !self.is_invertible() {
            return None;
        }
        let det = self.determinant();
        Some(AffineTransform::new(
            self.d / det,
            -self.b / det,
            -self.c / det,
            self.a / det,
            (self.c * self.f - self.d * self.e) / det,
            (self.b * self.e - self.a * self.f) / det,
        ))
    }

    /// Applies the transform to a point.
    pub fn apply(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Coefficient-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &AffineTransform, epsilon: f64) -> bool {
        [
            self.a - other.a,
            self.b - other.b,
            self.c - other.c,
            self.d - other.d,
            self.e - other.e,
            self.f - other.f,
        ]
        .iter()
        .all(|delta| delta.abs() <= epsilon)
    }

    /// Converts to a rasterizer transform.
    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_row(
            self.a as f32,
            self.b as f32,
            self.c as f32,
            self.d as f32,
            self.e as f32,
            self.f as f32,
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3} {:.3} {:.3} {:.3} {:.1} {:.1}]",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}

/// Maps a screen point to world space through the inverse of `transform`.
///
/// A non-invertible transform leaves the point unchanged.
pub fn screen_to_world(x: f64, y: f64, transform: &AffineTransform) -> Point {
    match transform.inverse() {
        Some(inverse) => inverse.apply(x, y),
        None => Point::new(x, y),
    }
}

/// Maps a world point to screen space.
pub fn world_to_screen(x: f64, y: f64, transform: &AffineTransform) -> Point {
    transform.apply(x, y)
}

/// Scales by `factor` about the screen point `center`, which stays fixed.
pub fn zoom_about(transform: &AffineTransform, factor: f64, center: Point) -> AffineTransform {
    AffineTransform::translation(center.x, center.y)
        .multiply(&AffineTransform::scale_translate(factor, 0.0, 0.0))
        .multiply(&AffineTransform::translation(-center.x, -center.y))
        .multiply(transform)
}

/// Translates by `(dx, dy)` screen pixels.
pub fn pan(transform: &AffineTransform, dx: f64, dy: f64) -> AffineTransform {
    AffineTransform::translation(dx, dy).multiply(transform)
}

/// Clamps the translation so scaled content never reveals area past its edges.
///
/// With `s = transform.a`, the translation is kept in
/// `[viewport - content * s, 0]` on each axis. When the content is smaller
/// than the viewport that range is empty and the axis pins to 0.
pub fn clamp_to_bounds(transform: &AffineTransform, content: Size, viewport: Size) -> AffineTransform {
    let s = transform.scale();
    let clamp_axis = |offset: f64, content: f64, viewport: f64| {
        let min = viewport - content * s;
        if min > 0.0 {
            0.0
        } else {
            offset.clamp(min, 0.0)
        }
    };

    AffineTransform {
        e: clamp_axis(transform.e, content.width, viewport.width),
        f: clamp_axis(transform.f, content.height, viewport.height),
        ..*transform
    }
}
