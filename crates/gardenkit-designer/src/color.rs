//! Hex colors used by zones, painted cells and items.

use std::fmt;
use std::str::FromStr;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Neutral gray used when a stored color cannot be parsed.
    pub const FALLBACK: Rgb = Rgb::new(0x88, 0x88, 0x88);

    /// Creates a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb` or `#rgb`, falling back to gray.
    pub fn parse_or_fallback(hex: &str) -> Self {
        hex.parse().unwrap_or_else(|_| {
            tracing::debug!("Unparseable color {:?}", hex);
            Self::FALLBACK
        })
    }

    /// Scales every channel by `amount` (0.6 keeps 60% brightness).
    pub fn darken(&self, amount: f64) -> Self {
        let scale = |c: u8| (f64::from(c) * amount).floor().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Converts to a rasterizer color with the given alpha.
    pub fn to_skia(&self, alpha: u8) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

/// Error returned for a malformed hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color {0:?}")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        let err = || ParseColorError(s.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| err())?;
        match digits.len() {
            6 => Ok(Rgb::new(
                ((value >> 16) & 0xff) as u8,
                ((value >> 8) & 0xff) as u8,
                (value & 0xff) as u8,
            )),
            3 => {
                let expand = |n: u32| ((n & 0xf) * 0x11) as u8;
                Ok(Rgb::new(expand(value >> 8), expand(value >> 4), expand(value)))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
