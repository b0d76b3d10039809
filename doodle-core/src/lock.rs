//! The per-round drawing gate.

use serde::{Deserialize, Serialize};

/// Whether the round still accepts drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    /// Drawing allowed.
    #[default]
    Open,
    /// Answer revealed; no stroke may touch the surface.
    Closed,
}

/// Gate that freezes the stroke engine once the answer is revealed.
///
/// The lock only ever closes through a reveal and only reopens when a new
/// round starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionLock {
    state: LockState,
}

impl SessionLock {
    /// A lock for a fresh round.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LockState::Open,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LockState {
        self.state
    }

    /// True while drawing is allowed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, LockState::Open)
    }

    pub(crate) fn close(&mut self) {
        if self.is_open() {
            tracing::debug!("Session lock closed");
        }
        self.state = LockState::Closed;
    }

    pub(crate) fn reopen(&mut self) {
        self.state = LockState::Open;
    }
}
