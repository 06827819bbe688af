//! Error handling for GardenKit
//!
//! Provides error types for the layers of the editor core:
//! - Layer errors (offscreen surface lookup and allocation)
//! - Persistence errors (the external item/zone backend)
//! - Image errors (background and icon loading)
//!
//! Geometry degeneracy and malformed domain actions are deliberately absent:
//! those are handled by fallback branches and never surface as errors.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;
use uuid::Uuid;

/// Raster layer error type
///
/// Represents failures looking up or allocating the offscreen surfaces
/// owned by the layer store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    /// No layer was registered under this name
    #[error("Unknown layer: {name}")]
    UnknownLayer {
        /// The requested layer name.
        name: String,
    },

    /// The backing surface could not be allocated
    #[error("Failed to allocate {width}x{height} surface for layer {name}")]
    SurfaceAllocation {
        /// The layer being allocated.
        name: String,
        /// Backing width in device pixels.
        width: u32,
        /// Backing height in device pixels.
        height: u32,
    },

    /// World extent or scale factors are zero, negative or not finite
    #[error("Degenerate layer extent {width}x{height} at factor {factor}")]
    DegenerateExtent {
        /// Requested world width.
        width: f64,
        /// Requested world height.
        height: f64,
        /// Combined device pixel ratio and render factor.
        factor: f64,
    },

    /// The layer store has been released
    #[error("Layer store has been released")]
    Released,
}

/// Persistence error type
///
/// Represents failures reported by the external backend that stores items
/// and zones. These are logged by the caller; local state is never rolled back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    /// The record does not exist on the backend
    #[error("{kind} {id} not found")]
    NotFound {
        /// Record kind ("item" or "zone").
        kind: &'static str,
        /// Record identifier.
        id: Uuid,
    },

    /// A record with this id already exists on the backend
    #[error("{kind} {id} already exists")]
    Conflict {
        /// Record kind ("item" or "zone").
        kind: &'static str,
        /// Record identifier.
        id: Uuid,
    },

    /// The backend rejected or failed the call
    #[error("Backend failure: {reason}")]
    Backend {
        /// The reason reported by the backend.
        reason: String,
    },
}

/// Image loading error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// The image source could not be read
    #[error("Failed to read image {key}: {reason}")]
    Read {
        /// Cache key of the image.
        key: String,
        /// The underlying failure.
        reason: String,
    },

    /// The image bytes could not be decoded
    #[error("Failed to decode image {key}: {reason}")]
    Decode {
        /// Cache key of the image.
        key: String,
        /// The underlying failure.
        reason: String,
    },
}

/// Main error type for GardenKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Layer error
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Image error
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a layer error
    pub fn is_layer_error(&self) -> bool {
        matches!(self, Error::Layer(_))
    }

    /// Check if this is a persistence error
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
