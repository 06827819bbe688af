//! Editor session.
//!
//! Composes the stores of one open garden map: the domain history store,
//! the viewport, the raster layers, the redraw scheduler, the zone geometry
//! cache and the image cache. The session is created once per opened map
//! and torn down when the map is closed.
//!
//! Mutations go through [`Editor::dispatch`], [`Editor::undo`] and
//! [`Editor::redo`]. Each marks only the layers whose source data changed
//! and requests a redraw; the frame callback repaints those layers and
//! composites every layer onto the visible surface.

use std::collections::BTreeSet;
use std::sync::Arc;

use tiny_skia::{Color, Pixmap, Transform};
use uuid::Uuid;

use gardenkit_core::{
    ChangeSet, DomainState, EditorEvent, EventBus, Item, LayerError, PersistenceError, RenderEvent,
    Result, Zone,
};
use gardenkit_settings::Config;

use crate::contour::{ContourOptions, ZoneGeometryCache};
use crate::geometry::{Point, Size};
use crate::image_cache::{FileImageSource, ImageCache, ImageSource};
use crate::painter::{LabelPlacement, ScenePainter};
use crate::reducer::DomainAction;
use crate::render::{FrameClock, FrameId, LayerStore, ManualClock, RedrawScheduler, RenderCurve};
use crate::selection::{selected_objects, Hit, SelectedObject, SelectionState};
use crate::store::{ActionSink, DispatchOutcome, DomainStore};
use crate::transform::AffineTransform;
use crate::viewport::Viewport;

/// Layer painted with the background grid and image.
pub const BACKGROUND_LAYER: &str = "background";
/// Layer painted with zone polygons.
pub const ZONES_LAYER: &str = "zones";
/// Layer painted with the colored-cell buffer.
pub const CELLS_LAYER: &str = "cells";
/// Layer painted with items.
pub const ITEMS_LAYER: &str = "items";

/// One open garden map.
pub struct Editor<C: FrameClock = ManualClock> {
    config: Config,
    bus: Arc<EventBus>,
    store: DomainStore,
    viewport: Viewport,
    layers: LayerStore,
    curve: RenderCurve,
    scheduler: RedrawScheduler<C>,
    geometry: ZoneGeometryCache,
    images: ImageCache,
    painter: ScenePainter,
    selection: SelectionState,
    dirty: BTreeSet<String>,
    surface: Option<Pixmap>,
    labels: Vec<LabelPlacement>,
    frames: u64,
}

impl Editor<ManualClock> {
    /// Creates a session driven by a [`ManualClock`].
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, ManualClock::new())
    }

    /// Runs every frame callback that is due on the manual clock.
    /// Returns the number of frames drawn.
    pub fn tick(&mut self) -> Result<usize> {
        let due = self.scheduler.clock_mut().take_due();
        let mut drawn = 0;
        for id in due {
            if self.run_frame(id)? {
                drawn += 1;
            }
        }
        Ok(drawn)
    }
}

impl<C: FrameClock> Editor<C> {
    /// Creates a session on a custom frame clock, loading images from files.
    pub fn with_clock(config: Config, clock: C) -> Result<Self> {
        Self::with_parts(
            config,
            clock,
            Arc::new(EventBus::new()),
            Arc::new(FileImageSource::new()),
        )
    }

    /// Creates a session from explicit collaborators.
    pub fn with_parts(
        config: Config,
        clock: C,
        bus: Arc<EventBus>,
        images: Arc<dyn ImageSource>,
    ) -> Result<Self> {
        config.validate()?;

        let curve = RenderCurve::from_settings(&config.render);
        let viewport = Viewport::from_config(&config).with_event_bus(bus.clone());
        let layers = LayerStore::new(
            config.world.width(),
            config.world.height(),
            &config.render.layers,
            config.render.device_pixel_ratio,
            curve.factor(viewport.scale()),
        )?;
        let store = DomainStore::with_limit(DomainState::default(), config.history.max_depth)
            .with_event_bus(bus.clone());
        let geometry = ZoneGeometryCache::new(
            ContourOptions::from_settings(&config.contour, config.world.cell_size)
                .with_world_extent(config.world.cols, config.world.rows),
        );
        let painter = ScenePainter::new(config.world.cell_size, config.world.cols, config.world.rows);
        let surface = Some(allocate_surface(viewport.size(), config.render.device_pixel_ratio)?);

        tracing::info!(
            "Editor session opened: {}x{} cells, {} layers",
            config.world.cols,
            config.world.rows,
            layers.names().len()
        );

        let mut editor = Self {
            dirty: layers.names().iter().cloned().collect(),
            config,
            bus,
            store,
            viewport,
            layers,
            curve,
            scheduler: RedrawScheduler::new(clock),
            geometry,
            images: ImageCache::new(images),
            painter,
            selection: SelectionState::new(),
            surface,
            labels: Vec::new(),
            frames: 0,
        };
        editor.request_redraw();
        Ok(editor)
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Event bus shared by the session's stores.
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    /// Current domain state.
    pub fn state(&self) -> &DomainState {
        self.store.state()
    }

    /// The domain history store.
    pub fn store(&self) -> &DomainStore {
        &self.store
    }

    /// The viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The raster layers.
    pub fn layers(&self) -> &LayerStore {
        &self.layers
    }

    /// The redraw scheduler.
    pub fn scheduler(&self) -> &RedrawScheduler<C> {
        &self.scheduler
    }

    /// The zone geometry cache.
    pub fn geometry(&self) -> &ZoneGeometryCache {
        &self.geometry
    }

    /// The image cache.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Visible surface from the last frame, `None` after teardown.
    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    /// Zone labels placed by the last zones repaint, in world units.
    pub fn labels(&self) -> &[LabelPlacement] {
        &self.labels
    }

    /// Number of frames composited.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Layers waiting to be repainted.
    pub fn dirty_layers(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// True when editing is locked.
    pub fn is_map_locked(&self) -> bool {
        self.store.state().map_locked
    }

    // ─── domain ─────────────────────────────────────────────────────────

    /// Applies an action and invalidates the layers it touched.
    pub fn dispatch(&mut self, action: DomainAction) -> DispatchOutcome {
        let outcome = self.store.dispatch(action);
        self.apply_changes(outcome.changes);
        outcome
    }

    /// Steps the domain state back. Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.store.undo() {
            Some(changes) => {
                self.apply_changes(changes);
                true
            }
            None => false,
        }
    }

    /// Steps the domain state forward. Returns false when there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.store.redo() {
            Some(changes) => {
                self.apply_changes(changes);
                true
            }
            None => false,
        }
    }

    /// True when [`undo`](Self::undo) would do something.
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    /// True when [`redo`](Self::redo) would do something.
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Replaces items and zones without history.
    pub fn seed(&mut self, items: Vec<Item>, zones: Vec<Zone>) -> ChangeSet {
        let changes = self.store.seed(items, zones);
        self.apply_changes(changes);
        changes
    }

    fn apply_changes(&mut self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }
        if changes.items {
            self.mark_dirty(ITEMS_LAYER);
        }
        if changes.zones {
            self.mark_dirty(ZONES_LAYER);
        }
        if changes.cells {
            self.mark_dirty(CELLS_LAYER);
        }
        self.selection.retain_existing(self.store.state());
        self.request_redraw();
    }

    // ─── selection ──────────────────────────────────────────────────────

    /// Current selection ids.
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Selected objects resolved against the current domain state.
    pub fn selected_objects(&self) -> Vec<SelectedObject<'_>> {
        selected_objects(self.store.state(), &self.selection)
    }

    /// Finds the object at a world point: items first (topmost last), then zones.
    pub fn hit_test(&self, world_x: f64, world_y: f64) -> Option<Hit> {
        let state = self.store.state();
        if let Some(item) = state
            .items
            .iter()
            .rev()
            .find(|item| item.contains(world_x, world_y))
        {
            return Some(Hit::Item(item.id));
        }
        self.geometry
            .hit_test(&state.zones, world_x, world_y)
            .map(Hit::Zone)
    }

    /// Handles a click at a world point: selects what was hit, or clears the
    /// selection on a miss.
    pub fn on_canvas_click(&mut self, world_x: f64, world_y: f64) -> Option<Hit> {
        let hit = self.hit_test(world_x, world_y);
        self.select(hit);
        hit
    }

    /// Finds the object under a screen point without changing the selection.
    pub fn hit_at_screen(&self, screen_x: f64, screen_y: f64) -> Option<Hit> {
        let world = self.viewport.screen_to_world(screen_x, screen_y);
        self.hit_test(world.x, world.y)
    }

    /// Handles a click at a screen point.
    pub fn click_at_screen(&mut self, screen_x: f64, screen_y: f64) -> Option<Hit> {
        let world = self.viewport.screen_to_world(screen_x, screen_y);
        self.on_canvas_click(world.x, world.y)
    }

    /// Replaces the selection.
    pub fn select(&mut self, hit: Option<Hit>) {
        let before = self.selection;
        self.selection.select(hit);
        if self.selection == before {
            return;
        }
        if before.item != self.selection.item {
            self.mark_dirty(ITEMS_LAYER);
        }
        if before.zone != self.selection.zone {
            self.mark_dirty(ZONES_LAYER);
        }
        self.request_redraw();
    }

    // ─── viewport ───────────────────────────────────────────────────────

    /// Replaces the pan/zoom transform (clamped).
    pub fn set_transform(&mut self, transform: AffineTransform) -> bool {
        let changed = self.viewport.set_transform(transform);
        self.redraw_if(changed)
    }

    /// Zooms to `scale` about `center` (screen pixels).
    pub fn set_scale(&mut self, scale: f64, center: Option<Point>) -> bool {
        let changed = self.viewport.set_scale(scale, center);
        self.redraw_if(changed)
    }

    /// One mouse-wheel step at `pointer` (screen pixels).
    pub fn wheel(&mut self, delta_y: f64, pointer: Point) -> bool {
        let changed = self.viewport.wheel(delta_y, pointer);
        self.redraw_if(changed)
    }

    /// Pans by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        let changed = self.viewport.pan_by(dx, dy);
        self.redraw_if(changed)
    }

    /// Back to 100% zoom at the world origin.
    pub fn reset_view(&mut self) -> bool {
        let changed = self.viewport.reset();
        self.redraw_if(changed)
    }

    /// Resizes the visible area and its surface.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        let surface = allocate_surface(Size::new(width, height), self.config.render.device_pixel_ratio)?;
        self.viewport.resize(width, height);
        self.surface = Some(surface);
        self.request_redraw();
        Ok(())
    }

    /// Changes the world grid. Every layer is reallocated and repainted.
    pub fn resize_world(&mut self, cols: u32, rows: u32) -> Result<()> {
        let cell_size = self.config.world.cell_size;
        let (width, height) = (f64::from(cols) * cell_size, f64::from(rows) * cell_size);
        self.layers.resize(width, height)?;
        self.config.world.cols = cols;
        self.config.world.rows = rows;
        self.painter = ScenePainter::new(cell_size, cols, rows);
        self.geometry.set_options(
            ContourOptions::from_settings(&self.config.contour, cell_size)
                .with_world_extent(cols, rows),
        );
        self.viewport.set_content_size(Size::new(width, height));
        self.mark_all_dirty();
        self.request_redraw();
        Ok(())
    }

    fn redraw_if(&mut self, changed: bool) -> bool {
        if changed {
            self.request_redraw();
        }
        changed
    }

    // ─── rendering ──────────────────────────────────────────────────────

    /// Requests a composite pass on the next frame.
    pub fn request_redraw(&mut self) -> bool {
        self.scheduler.request_redraw()
    }

    /// Marks a layer for repainting. Unknown names are ignored.
    pub fn mark_dirty(&mut self, name: &str) {
        if self.layers.contains(name) {
            self.dirty.insert(name.to_string());
        }
    }

    fn mark_all_dirty(&mut self) {
        self.dirty.extend(self.layers.names().iter().cloned());
    }

    /// Stores finished image loads and repaints the layers that draw
    /// images. Returns the number of images that finished.
    pub fn poll_images(&mut self) -> usize {
        let finished = self.images.poll_completed();
        if finished.is_empty() {
            return 0;
        }
        for key in &finished {
            self.bus.notify(EditorEvent::Render(RenderEvent::ImageLoaded { key: key.clone() }));
        }
        self.mark_dirty(BACKGROUND_LAYER);
        self.mark_dirty(ITEMS_LAYER);
        self.request_redraw();
        finished.len()
    }

    /// Frame callback. Returns false when the callback was stale or the
    /// session is torn down; nothing is drawn then.
    pub fn run_frame(&mut self, id: FrameId) -> Result<bool> {
        if !self.scheduler.begin_frame(id) {
            return Ok(false);
        }
        let drawn = self.draw_frame();
        self.scheduler.end_frame();
        drawn
    }

    fn draw_frame(&mut self) -> Result<bool> {
        if self.layers.is_released() || self.surface.is_none() {
            return Ok(false);
        }

        let factor = self.curve.factor(self.viewport.scale());
        if self.layers.set_render_factor(factor)? {
            tracing::debug!("Render factor now {:.3}", factor);
            self.mark_all_dirty();
        }
        self.geometry.sync(&self.store.state().zones);

        let repainted = self.repaint_dirty()?;
        self.composite()?;

        self.frames += 1;
        self.bus.notify(EditorEvent::Render(RenderEvent::FrameRendered {
            frame: self.frames,
            layers_repainted: repainted,
            render_factor: factor,
        }));
        Ok(true)
    }

    fn repaint_dirty(&mut self) -> std::result::Result<usize, LayerError> {
        let dirty = std::mem::take(&mut self.dirty);
        let background = self.background_image();
        let state = self.store.state();
        let mut repainted = 0;

        for name in self.layers.names().to_vec() {
            if !dirty.contains(&name) {
                continue;
            }
            let mut ctx = self.layers.get_context(&name)?;
            ctx.clear();
            match name.as_str() {
                BACKGROUND_LAYER => self.painter.paint_background(&mut ctx, background.as_deref()),
                ZONES_LAYER => {
                    self.labels = self.painter.paint_zones(
                        &mut ctx,
                        &state.zones,
                        &mut self.geometry,
                        self.selection.zone,
                    );
                }
                CELLS_LAYER => self.painter.paint_cells(&mut ctx, &state.colored_cells),
                ITEMS_LAYER => self.painter.paint_items(
                    &mut ctx,
                    &state.items,
                    &mut self.images,
                    self.selection.item,
                ),
                other => tracing::trace!("Layer {} left to the host", other),
            }
            repainted += 1;
        }
        Ok(repainted)
    }

    fn background_image(&mut self) -> Option<Arc<Pixmap>> {
        let path = self.config.render.background_image.as_ref()?;
        let key = path.to_string_lossy();
        self.images.get_or_load(&key).ready().cloned()
    }

    fn composite(&mut self) -> std::result::Result<(), LayerError> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let dpr = self.config.render.device_pixel_ratio as f32;
        let view = Transform::from_scale(dpr, dpr).pre_concat(self.viewport.transform().to_skia());
        surface.fill(Color::TRANSPARENT);
        self.layers.composite_to(surface, self.layers.names(), view)
    }

    /// Ends the session: cancels the scheduled frame, releases every
    /// surface and drops event subscriptions.
    pub fn teardown(&mut self) {
        if self.scheduler.is_torn_down() {
            return;
        }
        self.scheduler.teardown();
        self.layers.release();
        self.surface = None;
        self.images.clear();
        self.geometry.clear();
        self.dirty.clear();
        self.bus.clear();
        tracing::info!("Editor session closed after {} frames", self.frames);
    }
}

impl<C: FrameClock> ActionSink for Editor<C> {
    fn dispatch(&mut self, action: DomainAction) -> DispatchOutcome {
        Editor::dispatch(self, action)
    }

    fn seed(&mut self, items: Vec<Item>, zones: Vec<Zone>) -> ChangeSet {
        Editor::seed(self, items, zones)
    }

    fn persistence_failed(&mut self, operation: &str, id: Option<Uuid>, error: &PersistenceError) {
        self.store.report_persistence_failure(operation, id, error);
    }
}

impl<C: FrameClock> Drop for Editor<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<C: FrameClock> std::fmt::Debug for Editor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("items", &self.store.state().items.len())
            .field("zones", &self.store.state().zones.len())
            .field("scale", &self.viewport.scale())
            .field("frames", &self.frames)
            .field("torn_down", &self.scheduler.is_torn_down())
            .finish()
    }
}

fn allocate_surface(size: Size, device_pixel_ratio: f64) -> std::result::Result<Pixmap, LayerError> {
    let width = (size.width * device_pixel_ratio).ceil();
    let height = (size.height * device_pixel_ratio).ceil();
    if !(width >= 1.0 && height >= 1.0) || !width.is_finite() || !height.is_finite() {
        return Err(LayerError::DegenerateExtent {
            width: size.width,
            height: size.height,
            factor: device_pixel_ratio,
        });
    }
    let (width, height) = (width as u32, height as u32);
    Pixmap::new(width, height).ok_or_else(|| LayerError::SurfaceAllocation {
        name: "visible".to_string(),
        width,
        height,
    })
}
