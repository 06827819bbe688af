//! Configuration for a GardenKit editor session
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - World extent (grid size, cell size)
//! - Viewport limits (zoom range, wheel step)
//! - Rendering (device pixel ratio, layer order, resolution curve)
//! - Zone contour tuning (simplification, smoothing, label precision)
//! - History depth

use gardenkit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// World extent: a fixed grid of square cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Number of grid columns
    pub cols: u32,
    /// Number of grid rows
    pub rows: u32,
    /// Edge length of one cell in world units
    pub cell_size: f64,
}

impl WorldSettings {
    /// World width in world units
    pub fn width(&self) -> f64 {
        f64::from(self.cols) * self.cell_size
    }

    /// World height in world units
    pub fn height(&self) -> f64 {
        f64::from(self.rows) * self.cell_size
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            cols: 270,
            rows: 270,
            cell_size: 20.0,
        }
    }
}

/// Viewport limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Visible width in screen pixels
    pub width: f64,
    /// Visible height in screen pixels
    pub height: f64,
    /// Smallest zoom scale
    pub min_zoom: f64,
    /// Largest zoom scale
    pub max_zoom: f64,
    /// Zoom multiplier applied per wheel notch
    pub wheel_factor: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            min_zoom: 0.5,
            max_zoom: 2.0,
            wheel_factor: 1.05,
        }
    }
}

/// One point of the zoom-to-render-factor curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionBreakpoint {
    /// Zoom scale
    pub scale: f64,
    /// Backing-store multiplier at that scale
    pub factor: f64,
}

impl ResolutionBreakpoint {
    /// Creates a breakpoint
    pub const fn new(scale: f64, factor: f64) -> Self {
        Self { scale, factor }
    }
}

/// Rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Device pixel ratio of the output surface
    pub device_pixel_ratio: f64,
    /// Layer names, bottom to top
    pub layers: Vec<String>,
    /// Render factor breakpoints, sorted by scale
    pub resolution_curve: Vec<ResolutionBreakpoint>,
    /// Optional image drawn under the background grid
    pub background_image: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            layers: ["background", "zones", "cells", "items"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            resolution_curve: vec![
                ResolutionBreakpoint::new(0.8, 0.75),
                ResolutionBreakpoint::new(1.0, 0.85),
                ResolutionBreakpoint::new(1.5, 2.0),
            ],
            background_image: None,
        }
    }
}

/// Zone contour tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourSettings {
    /// Contours with more vertices than this are simplified
    pub simplify_threshold: usize,
    /// Ramer-Douglas-Peucker tolerance in mask units
    pub simplify_epsilon: f64,
    /// Number of Chaikin passes
    pub smoothing_passes: usize,
    /// Pole-of-inaccessibility precision in world units
    pub label_precision: f64,
    /// Keep axis-aligned right-angle corners sharp while smoothing
    pub preserve_right_angles: bool,
}

impl Default for ContourSettings {
    fn default() -> Self {
        Self {
            simplify_threshold: 50,
            simplify_epsilon: 0.5,
            smoothing_passes: 2,
            label_precision: 1.0,
            preserve_right_angles: false,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo steps kept; unlimited when absent
    pub max_depth: Option<usize>,
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// World extent
    pub world: WorldSettings,
    /// Viewport limits
    pub viewport: ViewportSettings,
    /// Rendering
    pub render: RenderSettings,
    /// Zone contours
    pub contour: ContourSettings,
    /// Undo history
    pub history: HistorySettings,
}

impl Config {
    /// File name used inside the config directory
    pub const FILE_NAME: &'static str = "gardenkit.toml";

    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location (`<config_dir>/gardenkit/gardenkit.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gardenkit").join(Self::FILE_NAME))
    }

    /// Load from the platform location, falling back to defaults when the
    /// file is missing or invalid
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::config(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::config("Config file must be .json or .toml"));
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.world.cols == 0 || self.world.rows == 0 {
            return Err(Error::config("World grid must have at least one cell"));
        }
        if !(self.world.cell_size > 0.0) {
            return Err(Error::config("Cell size must be > 0"));
        }

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            return Err(Error::config("Viewport dimensions must be > 0"));
        }
        if !(self.viewport.min_zoom > 0.0) || self.viewport.min_zoom > self.viewport.max_zoom {
            return Err(Error::config(format!(
                "Invalid zoom range {}..{}",
                self.viewport.min_zoom, self.viewport.max_zoom
            )));
        }
        if !(self.viewport.wheel_factor > 1.0) {
            return Err(Error::config("Wheel factor must be > 1"));
        }

        if !(self.render.device_pixel_ratio > 0.0) {
            return Err(Error::config("Device pixel ratio must be > 0"));
        }
        if self.render.layers.is_empty() {
            return Err(Error::config("At least one layer is required"));
        }
        for (i, name) in self.render.layers.iter().enumerate() {
            if self.render.layers[..i].contains(name) {
                return Err(Error::config(format!("Duplicate layer name: {}", name)));
            }
        }
        if self.render.resolution_curve.is_empty() {
            return Err(Error::config("Resolution curve needs at least one breakpoint"));
        }
        for pair in self.render.resolution_curve.windows(2) {
            if pair[1].scale <= pair[0].scale {
                return Err(Error::config(
                    "Resolution curve breakpoints must have increasing scales",
                ));
            }
        }
        if self
            .render
            .resolution_curve
            .iter()
            .any(|bp| !(bp.factor > 0.0))
        {
            return Err(Error::config("Render factors must be > 0"));
        }

        if !(self.contour.simplify_epsilon >= 0.0) {
            return Err(Error::config("Simplify epsilon must be >= 0"));
        }
        if !(self.contour.label_precision > 0.0) {
            return Err(Error::config("Label precision must be > 0"));
        }

        if self.history.max_depth == Some(0) {
            return Err(Error::config("History depth must be > 0 when set"));
        }

        Ok(())
    }
}
