//! Event type definitions for the event bus.
//!
//! Events are cloneable and serializable so a surrounding application can
//! log or forward them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ChangeSet;

/// Root event enum for all editor events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Domain store mutations
    Domain(DomainEvent),
    /// Pan/zoom changes
    Viewport(ViewportEvent),
    /// Compositing and asset events
    Render(RenderEvent),
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::Domain(_) => EventCategory::Domain,
            EditorEvent::Viewport(_) => EventCategory::Viewport,
            EditorEvent::Render(_) => EventCategory::Render,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::Domain(e) => e.description(),
            EditorEvent::Viewport(e) => e.description(),
            EditorEvent::Render(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Domain store events.
    Domain,
    /// Viewport events.
    Viewport,
    /// Rendering events.
    Render,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Domain => write!(f, "Domain"),
            EventCategory::Viewport => write!(f, "Viewport"),
            EventCategory::Render => write!(f, "Render"),
        }
    }
}

/// Direction of a history move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryMove {
    Undo,
    Redo,
}

/// Domain store events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomainEvent {
    /// An action was dispatched and changed the present state
    Changed {
        /// Action name, e.g. `UPDATE_ITEM`.
        action: String,
        /// Whether the previous state was pushed onto the undo stack.
        recorded: bool,
        /// What changed.
        changes: ChangeSet,
    },
    /// Undo or redo moved the present state
    HistoryMoved {
        /// Undo or redo.
        direction: HistoryMove,
        /// What changed.
        changes: ChangeSet,
    },
    /// A backend call failed; the optimistic local state was kept
    PersistenceFailed {
        /// Operation name, e.g. `update_item`.
        operation: String,
        /// Record the call was about.
        id: Option<Uuid>,
        /// Failure reason.
        reason: String,
    },
}

impl DomainEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            DomainEvent::Changed {
                action, recorded, ..
            } => {
                if *recorded {
                    format!("{} (undoable)", action)
                } else {
                    action.clone()
                }
            }
            DomainEvent::HistoryMoved { direction, .. } => format!("{:?}", direction),
            DomainEvent::PersistenceFailed {
                operation, reason, ..
            } => format!("{} failed: {}", operation, reason),
        }
    }
}

/// Viewport events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewportEvent {
    /// The pan/zoom transform was replaced
    TransformChanged {
        /// Uniform zoom scale.
        scale: f64,
        /// Horizontal translation in screen pixels.
        translate_x: f64,
        /// Vertical translation in screen pixels.
        translate_y: f64,
    },
    /// The visible viewport was resized
    Resized {
        /// Width in screen pixels.
        width: f64,
        /// Height in screen pixels.
        height: f64,
    },
}

impl ViewportEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            ViewportEvent::TransformChanged { scale, .. } => format!("Zoom {:.2}x", scale),
            ViewportEvent::Resized { width, height } => format!("Viewport {}x{}", width, height),
        }
    }
}

/// Rendering events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderEvent {
    /// A composite pass finished
    FrameRendered {
        /// Sequence number of the pass.
        frame: u64,
        /// Number of layers repainted before compositing.
        layers_repainted: usize,
        /// Render factor used for the visible surface.
        render_factor: f64,
    },
    /// A pending image finished loading
    ImageLoaded {
        /// Cache key.
        key: String,
    },
}

impl RenderEvent {
    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            RenderEvent::FrameRendered {
                frame,
                layers_repainted,
                ..
            } => format!("Frame {} ({} layers)", frame, layers_repainted),
            RenderEvent::ImageLoaded { key } => format!("Image loaded: {}", key),
        }
    }
}
