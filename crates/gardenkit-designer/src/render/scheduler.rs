//! Redraw coalescing.
//!
//! [`RedrawScheduler`] turns any number of redraw requests into at most one
//! composite pass per display refresh. A request that arrives while a frame
//! is already scheduled only sets `redraw_pending`; when the frame runs it
//! clears `frame_requested` and, if a redraw is pending, schedules exactly
//! one more frame. No request is dropped, none is duplicated.
//!
//! The refresh source is abstracted by [`FrameClock`]. Hosts with a real
//! display loop implement it; [`ManualClock`] drives frames explicitly for
//! headless rendering and tests.

use std::fmt;

/// Identifier of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

impl FrameId {
    /// Wraps a raw callback id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw callback id.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Source of display refresh callbacks.
pub trait FrameClock {
    /// Asks for one callback at the next refresh.
    fn request_frame(&mut self) -> FrameId;

    /// Cancels a callback that has not fired yet.
    fn cancel_frame(&mut self, id: FrameId);
}

/// A frame clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    next_id: u64,
    scheduled: Vec<FrameId>,
    cancelled: usize,
}

impl ManualClock {
    /// Creates a clock with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks waiting for the next refresh.
    pub fn scheduled(&self) -> &[FrameId] {
        &self.scheduled
    }

    /// Number of callbacks cancelled so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Simulates a refresh: hands out every callback due now. Callbacks
    /// requested while these run are due at the following refresh.
    pub fn take_due(&mut self) -> Vec<FrameId> {
        std::mem::take(&mut self.scheduled)
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.scheduled.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let before = self.scheduled.len();
        self.scheduled.retain(|scheduled| *scheduled != id);
        self.cancelled += before - self.scheduled.len();
    }
}

/// Coalesces redraw requests into one frame per refresh.
#[derive(Debug)]
pub struct RedrawScheduler<C: FrameClock = ManualClock> {
    clock: C,
    frame_requested: bool,
    redraw_pending: bool,
    pending: Option<FrameId>,
    in_frame: Option<FrameId>,
    frames_run: u64,
    torn_down: bool,
}

impl<C: FrameClock> RedrawScheduler<C> {
    /// Creates a scheduler on top of a frame clock.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            frame_requested: false,
            redraw_pending: false,
            pending: None,
            in_frame: None,
            frames_run: 0,
            torn_down: false,
        }
    }

    /// Requests a redraw. Returns true when a new frame was scheduled,
    /// false when the request was folded into an already scheduled one.
    pub fn request_redraw(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        if self.frame_requested {
            self.redraw_pending = true;
            return false;
        }
        self.frame_requested = true;
        self.pending = Some(self.clock.request_frame());
        true
    }

    /// Starts the frame callback `id`. Returns false for a stale or
    /// cancelled callback, in which case nothing must be drawn.
    pub fn begin_frame(&mut self, id: FrameId) -> bool {
        if self.torn_down || self.pending != Some(id) {
            tracing::trace!("Ignoring stale {}", id);
            return false;
        }
        self.pending = None;
        self.in_frame = Some(id);
        true
    }

    /// Finishes the frame started by [`begin_frame`](Self::begin_frame) and
    /// schedules a follow-up frame if a redraw was requested meanwhile.
    pub fn end_frame(&mut self) {
        if self.in_frame.take().is_none() {
            return;
        }
        self.frames_run += 1;
        self.frame_requested = false;
        if self.redraw_pending {
            self.redraw_pending = false;
            self.request_redraw();
        }
    }

    /// Runs the frame callback `id` with `draw` as the composite pass.
    /// Returns true when `draw` ran.
    pub fn run_frame<F: FnOnce()>(&mut self, id: FrameId, draw: F) -> bool {
        if !self.begin_frame(id) {
            return false;
        }
        draw();
        self.end_frame();
        true
    }

    /// Cancels the scheduled callback and refuses further requests.
    pub fn teardown(&mut self) {
        if let Some(id) = self.pending.take() {
            self.clock.cancel_frame(id);
            tracing::debug!("Cancelled {} on teardown", id);
        }
        self.frame_requested = false;
        self.redraw_pending = false;
        self.in_frame = None;
        self.torn_down = true;
    }

    /// True while a frame callback is scheduled or running.
    pub fn is_frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// True when another frame will follow the current one.
    pub fn is_redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// The callback waiting to fire, if any.
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    /// Number of frames completed.
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// True after [`teardown`](Self::teardown).
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The underlying clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable access to the underlying clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}

impl Default for RedrawScheduler<ManualClock> {
    fn default() -> Self {
        Self::new(ManualClock::new())
    }
}
