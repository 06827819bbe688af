//! # Event Bus Module
//!
//! Publish/subscribe between the editor's stores and their dependents:
//! - The domain store publishes after every dispatch, undo and redo
//! - The viewport publishes when the transform is replaced
//! - The renderer publishes after each composite pass
//!
//! ## Usage
//!
//! ```rust
//! use gardenkit_core::event_bus::{EditorEvent, EventBus, EventCategory, EventFilter};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Domain]),
//!     |event| {
//!         if let EditorEvent::Domain(domain) = event {
//!             println!("Domain event: {:?}", domain);
//!         }
//!     },
//! );
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
