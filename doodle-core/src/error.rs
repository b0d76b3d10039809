//! Error types for game operations.

use thiserror::Error;

/// Result type for game operations.
pub type DoodleResult<T> = Result<T, DoodleError>;

/// Errors that can occur in game operations.
///
/// None of these are fatal: every failure degrades to a visible state change
/// on the session rather than aborting the round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DoodleError {
    /// A surface was requested with a zero-sized dimension.
    #[error("Invalid surface dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// The catalog collaborator failed or returned incomplete data.
    #[error("Catalog fetch failed: {0}")]
    FetchFailure(String),

    /// Encoding the surface into an image blob failed.
    #[error("Snapshot encoding failed: {0}")]
    Snapshot(String),

    /// A color string could not be parsed.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl DoodleError {
    /// Human-readable reason shown on the error placeholder.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::FetchFailure(reason) => reason.clone(),
            other => other.to_string(),
        }
    }
}
