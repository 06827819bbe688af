//! # GardenKit Designer
//!
//! The editing core of a garden map: a fixed grid of square cells on which
//! items (plants, structures) are placed, zones are drawn as sets of cells
//! and individual cells are painted.
//!
//! ## Core Components
//!
//! - **Transform / Viewport**: pan and uniform zoom between screen pixels
//!   and world units, clamped so the map always covers the visible area
//! - **Render**: one offscreen surface per named layer, a zoom-dependent
//!   render factor and a redraw scheduler that coalesces requests per frame
//! - **Store**: domain state with `{past, present, future}` history; only
//!   allowlisted actions that really change the state are undoable
//! - **Contour**: cell coverage to smoothed zone outline, label anchor and
//!   hit test, cached per zone
//! - **Persistence**: optimistic helpers over an async backend contract
//!
//! ## Architecture
//!
//! ```text
//! Editor (one per open map)
//!   ├── DomainStore ── reduce(DomainAction)
//!   ├── Viewport ───── AffineTransform
//!   ├── LayerStore ─── background / zones / cells / items
//!   ├── RedrawScheduler<FrameClock>
//!   ├── ZoneGeometryCache ── contour pipeline
//!   └── ImageCache (tokio blocking pool)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gardenkit_designer::{DomainAction, Editor};
//! use gardenkit_core::{Coverage, Zone};
//! use gardenkit_settings::Config;
//!
//! let mut editor = Editor::new(Config::default())?;
//! editor.dispatch(DomainAction::CreateZone(
//!     Zone::new("#4caf50", Coverage::rect(2, 2, 4, 3)).with_name("Beds"),
//! ));
//! editor.tick()?;
//! # Ok::<(), gardenkit_core::Error>(())
//! ```

pub mod color;
pub mod contour;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod image_cache;
pub mod painter;
pub mod persistence;
pub mod reducer;
pub mod render;
pub mod selection;
pub mod store;
pub mod transform;
pub mod viewport;

pub use color::{ParseColorError, Rgb};
pub use contour::{build_zone_geometry, CellHitTest, ContourOptions, ZoneGeometry, ZoneGeometryCache};
pub use editor::{Editor, BACKGROUND_LAYER, CELLS_LAYER, ITEMS_LAYER, ZONES_LAYER};
pub use geometry::{Point, Size};
pub use history::HistoryState;
pub use image_cache::{FileImageSource, ImageCache, ImageHandle, ImageSource};
pub use painter::{LabelPlacement, ScenePainter};
pub use persistence::{GardenBackend, InMemoryBackend};
pub use reducer::{reduce, DomainAction};
pub use render::{
    FrameClock, FrameId, LayerContext, LayerStore, ManualClock, RedrawScheduler, RenderCurve,
};
pub use selection::{selected_objects, Hit, SelectedObject, SelectionState};
pub use store::{ActionSink, DispatchOutcome, DomainStore};
pub use transform::{clamp_to_bounds, pan, screen_to_world, world_to_screen, zoom_about, AffineTransform};
pub use viewport::Viewport;
