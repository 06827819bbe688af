//! Zoom-dependent render factor.
//!
//! Layers are allocated at `world size * device pixel ratio * render factor`.
//! The factor follows a piecewise-linear curve over the zoom scale: flat
//! below the first breakpoint, interpolated between breakpoints, flat above
//! the last one.

use gardenkit_settings::{RenderSettings, ResolutionBreakpoint};

/// Piecewise-linear map from zoom scale to render factor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCurve {
    breakpoints: Vec<ResolutionBreakpoint>,
}

impl RenderCurve {
    /// Builds a curve. Breakpoints are sorted by scale; an empty list yields
    /// a constant factor of 1.
    pub fn new(mut breakpoints: Vec<ResolutionBreakpoint>) -> Self {
        breakpoints.retain(|bp| bp.scale.is_finite() && bp.factor.is_finite() && bp.factor > 0.0);
        breakpoints.sort_by(|a, b| a.scale.total_cmp(&b.scale));
        if breakpoints.is_empty() {
            breakpoints.push(ResolutionBreakpoint::new(1.0, 1.0));
        }
        Self { breakpoints }
    }

    /// Builds the curve configured for rendering.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self::new(settings.resolution_curve.clone())
    }

    /// Breakpoints in ascending scale order.
    pub fn breakpoints(&self) -> &[ResolutionBreakpoint] {
        &self.breakpoints
    }

    /// Render factor for a zoom scale.
    pub fn factor(&self, scale: f64) -> f64 {
        let first = self.breakpoints[0];
        if !(scale > first.scale) {
            return first.factor;
        }
        for pair in self.breakpoints.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if scale <= hi.scale {
                let t = (scale - lo.scale) / (hi.scale - lo.scale);
                return lo.factor + (hi.factor - lo.factor) * t;
            }
        }
        self.breakpoints[self.breakpoints.len() - 1].factor
    }
}

impl Default for RenderCurve {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default())
    }
}
