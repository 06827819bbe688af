//! # GardenKit
//!
//! Editing core of a 2D garden map: a fixed grid of square cells on which
//! plants and structures are placed, zones are drawn as sets of cells and
//! individual cells are painted.
//!
//! ## Architecture
//!
//! GardenKit is organized as a workspace with multiple crates:
//!
//! 1. **gardenkit-core** - Domain model, error taxonomy, event bus
//! 2. **gardenkit-settings** - Configuration (world, viewport, rendering, contours, history)
//! 3. **gardenkit-designer** - Viewport, raster layers, redraw scheduling, undo
//!    history, zone contours, persistence helpers and the editor session
//! 4. **gardenkit** - This crate: logging setup, re-exports and a headless renderer
//!
//! ## Features
//!
//! - **Pan/Zoom**: affine viewport clamped to the map, wheel zoom about the pointer
//! - **Layered Rendering**: background, zones, cells and items on separate
//!   offscreen surfaces, composited once per frame
//! - **Undo/Redo**: snapshot history that ignores no-op and non-undoable actions
//! - **Zone Contours**: smoothed outlines, label anchors and hit testing from cell coverage
//! - **Optimistic Persistence**: local first, backend second, failures logged

pub use gardenkit_core::{
    Cell, CellKey, CellPaint, ChangeSet, Coverage, DomainEvent, DomainState, EditorEvent, Error,
    EventBus, EventFilter, Item, ItemPatch, RenderEvent, Result, ViewportEvent, Zone, ZonePatch,
};

pub use gardenkit_settings::Config;

pub use gardenkit_designer::{
    persistence, ActionSink, AffineTransform, DomainAction, DomainStore, Editor, GardenBackend,
    Hit, ImageCache, InMemoryBackend, LabelPlacement, ManualClock, Point, RedrawScheduler, Size,
    Viewport, ZoneGeometryCache,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

/// Initialize logging as one JSON object per line on stderr
///
/// For hosts that collect logs from the headless renderer.
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .json();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}
