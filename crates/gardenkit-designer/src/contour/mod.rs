//! Zone contour pipeline.
//!
//! ```text
//! coverage ─▶ mask (+1 cell padding) ─▶ outline trace ─▶ RDP (large outlines)
//!          ─▶ Chaikin smoothing ─▶ world mapping ─▶ label anchor
//! coverage ─▶ cell hit test
//! ```
//!
//! Results are cached per zone by [`ZoneGeometryCache`] and rebuilt only
//! when the coverage changes.

pub mod hit;
pub mod label;
pub mod mask;
pub mod pipeline;
pub mod simplify;
pub mod smooth;
pub mod trace;

pub use hit::CellHitTest;
pub use label::pole_of_inaccessibility;
pub use mask::CellMask;
pub use pipeline::{build_zone_geometry, ContourOptions, ZoneGeometry, ZoneGeometryCache};
pub use simplify::{douglas_peucker, simplify_ring};
pub use smooth::{chaikin_pass, chaikin_pass_preserving_right_angles, smooth_ring};
pub use trace::trace_outline;
