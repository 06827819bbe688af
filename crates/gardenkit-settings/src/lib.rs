//! GardenKit Settings Crate
//!
//! Handles editor configuration: world extent, viewport limits, rendering
//! and contour tuning, with JSON/TOML persistence.

pub mod config;

pub use config::{
    Config, ContourSettings, HistorySettings, RenderSettings, ResolutionBreakpoint,
    ViewportSettings, WorldSettings,
};
