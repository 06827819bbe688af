//! # GardenKit Core
//!
//! Core types shared by every GardenKit crate: the domain data model
//! (items, zones, painted cells), the error taxonomy and the event bus
//! used by stores to notify their dependents.

pub mod error;
pub mod event_bus;
pub mod model;

pub use error::{Error, ImageError, LayerError, PersistenceError, Result};

pub use event_bus::{
    DomainEvent, EditorEvent, EventBus, EventBusError, EventCategory, EventFilter, HistoryMove,
    RenderEvent, SubscriptionId, ViewportEvent,
};

pub use model::{
    Cell, CellBounds, CellKey, CellKeyParseError, CellPaint, ChangeSet, Coverage, DomainState,
    Item, ItemPatch, Metadata, Zone, ZonePatch,
};
