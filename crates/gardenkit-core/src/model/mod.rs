//! Domain data model: items, zones, painted cells and the state snapshot.

mod cell;
mod item;
mod state;
mod zone;

pub use cell::{Cell, CellBounds, CellKey, CellKeyParseError, CellPaint};
pub use item::{Item, ItemPatch};
pub use state::{ChangeSet, DomainState};
pub use zone::{Coverage, Zone, ZonePatch};

/// Opaque, domain-specific attributes (species, soil metrics, dates...).
pub type Metadata = std::collections::BTreeMap<String, serde_json::Value>;
