//! Rendering: offscreen layers, the zoom-dependent render factor and redraw
//! coalescing.

pub mod layers;
pub mod resolution;
pub mod scheduler;

pub use layers::{LayerContext, LayerStore};
pub use resolution::RenderCurve;
pub use scheduler::{FrameClock, FrameId, ManualClock, RedrawScheduler};
