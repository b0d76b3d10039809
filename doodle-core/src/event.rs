//! Input events delivered to the session by the presentation surface.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// A position in surface coordinates (pixels from the top-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X position in pixels.
    pub x: f32,
    /// Y position in pixels.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Pointer activity over the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Button pressed (or pen/finger down) at a point.
    Down(Point),
    /// Pointer moved to a point.
    Move(Point),
    /// Button released.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// All discrete events the session reacts to without a confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer activity.
    Pointer(PointerEvent),
    /// Color picker changed.
    SetColor(Rgb),
    /// Width control changed.
    SetWidth(f32),
    /// Eraser button pressed.
    ToggleEraser,
    /// Drawing area changed size.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}
