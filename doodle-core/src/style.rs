//! Stroke styling: color, width and pen/eraser mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{DoodleError, DoodleResult};

/// Thinnest stroke the engine will paint.
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Thickest stroke the engine will paint.
pub const MAX_STROKE_WIDTH: f32 = 200.0;

/// Width used when nothing else has been chosen.
pub const DEFAULT_STROKE_WIDTH: f32 = 4.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black, the default pen color.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
    ///
    /// # Errors
    ///
    /// Returns [`DoodleError::InvalidColor`] if the string is not a hex color.
    pub fn from_hex(input: &str) -> DoodleResult<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || DoodleError::InvalidColor(input.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..=i], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Rgb {
    type Err = DoodleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// What a stroke does to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Adds color.
    #[default]
    Pen,
    /// Removes pixels (destination-out), whatever is underneath.
    Eraser,
}

impl ToolMode {
    /// Label for the toggle control: what pressing it would switch to.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Pen => "Eraser",
            Self::Eraser => "Back to pen",
        }
    }
}

/// The user-controlled style applied to strokes started after it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    color: Rgb,
    width: f32,
    mode: ToolMode,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            width: DEFAULT_STROKE_WIDTH,
            mode: ToolMode::Pen,
        }
    }
}

impl StrokeStyle {
    /// Create a style, clamping the width.
    #[must_use]
    pub fn new(color: Rgb, width: f32, mode: ToolMode) -> Self {
        Self {
            color,
            width: clamp_width(width),
            mode,
        }
    }

    /// Current color.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Current width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Pick a color. Choosing a color means drawing, so this leaves eraser mode.
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
        self.mode = ToolMode::Pen;
    }

    /// Pick a width. The mode is untouched.
    pub fn set_width(&mut self, width: f32) {
        self.width = clamp_width(width);
    }

    /// Set the mode explicitly.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.mode = mode;
    }

    /// Flip between pen and eraser, returning the new mode.
    pub fn toggle_eraser(&mut self) -> ToolMode {
        self.mode = match self.mode {
            ToolMode::Pen => ToolMode::Eraser,
            ToolMode::Eraser => ToolMode::Pen,
        };
        self.mode
    }
}

/// Clamp a requested width into the paintable range.
#[must_use]
pub fn clamp_width(width: f32) -> f32 {
    if width.is_finite() {
        width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
    } else {
        MIN_STROKE_WIDTH
    }
}
