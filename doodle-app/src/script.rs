//! JSON-lines command scripts.
//!
//! Each non-blank line is one [`Command`] tagged by `cmd`:
//!
//! ```text
//! {"cmd":"new_round"}
//! {"cmd":"settle"}
//! {"cmd":"down","x":10,"y":10}
//! {"cmd":"move","x":80,"y":40}
//! {"cmd":"up"}
//! {"cmd":"reveal","confirm":true}
//! ```
//!
//! Lines starting with `#` are comments.

use doodle_core::{DoodleResult, InputEvent, Point, PointerEvent, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// A line is not a valid command.
    #[error("script line {line}: {source}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// One scripted player action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Start a round for a random id.
    NewRound,
    /// Start a round for a specific id.
    LoadId {
        /// Catalog id.
        id: u32,
    },
    /// Pointer pressed.
    Down {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer moved.
    Move {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Pointer released.
    Up,
    /// Pointer left the surface.
    Leave,
    /// Pick a pen color as `#rrggbb` or `#rgb`.
    Color {
        /// Hex color.
        value: String,
    },
    /// Pick a stroke width.
    Width {
        /// Width in pixels.
        value: f32,
    },
    /// Toggle the eraser.
    Eraser,
    /// Resize the surface.
    Resize {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// Clear the surface.
    Clear {
        /// Scripted answer; falls back to the configured policy when absent.
        #[serde(default)]
        confirm: Option<bool>,
    },
    /// Reveal the answer.
    Reveal {
        /// Scripted answer; falls back to the configured policy when absent.
        #[serde(default)]
        confirm: Option<bool>,
    },
    /// Wait for every outstanding fetch.
    Settle,
}

impl Command {
    /// The surface input this command stands for.
    ///
    /// Round, clear, reveal and settle commands are not plain input and
    /// map to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`doodle_core::DoodleError::InvalidColor`] for an unparsable color.
    pub fn input_event(&self) -> DoodleResult<Option<InputEvent>> {
        let event: InputEvent = match self {
            Self::Down { x, y } => PointerEvent::Down(Point::new(*x, *y)).into(),
            Self::Move { x, y } => PointerEvent::Move(Point::new(*x, *y)).into(),
            Self::Up => PointerEvent::Up.into(),
            Self::Leave => PointerEvent::Leave.into(),
            Self::Color { value } => InputEvent::SetColor(Rgb::from_hex(value)?),
            Self::Width { value } => InputEvent::SetWidth(*value),
            Self::Eraser => InputEvent::ToggleEraser,
            Self::Resize { width, height } => InputEvent::Resize {
                width: *width,
                height: *height,
            },
            Self::NewRound
            | Self::LoadId { .. }
            | Self::Clear { .. }
            | Self::Reveal { .. }
            | Self::Settle => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first line that fails to parse.
pub fn parse_script(input: &str) -> Result<Vec<Command>, ScriptError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| ScriptError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}
