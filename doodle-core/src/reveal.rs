//! Revealing the answer.
//!
//! A reveal is the one irreversible step of a round: the guess is archived,
//! drawing is locked and the reference image becomes visible. It can run at
//! most once per loaded record.

use serde::{Deserialize, Serialize};

use crate::confirm::{Confirm, Prompt};
use crate::gallery::{Gallery, GalleryEntry};
use crate::lock::SessionLock;
use crate::panel::EntityPanel;
use crate::surface::Surface;
use crate::DoodleResult;

/// Whether the reveal control is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealState {
    /// No record loaded (initial, loading or failed).
    #[default]
    Unavailable,
    /// A record is loaded and its answer is hidden.
    Ready,
    /// The answer is showing; wait for the next round.
    Revealed,
}

/// Result of a reveal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The guess was archived and the answer shown.
    Revealed,
    /// The player backed out; nothing changed.
    Declined,
    /// Not available right now; nothing was asked and nothing changed.
    Refused,
}

/// State machine behind the reveal control.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevealFlow {
    state: RevealState,
}

impl RevealFlow {
    /// A flow with nothing to reveal yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: RevealState::Unavailable,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> RevealState {
        self.state
    }

    /// True when a request would be considered.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self.state, RevealState::Ready)
    }

    /// Re-arm for a new round based on what the panel holds.
    pub(crate) fn rearm(&mut self, panel: &EntityPanel) {
        self.state = if panel.record().is_some() {
            RevealState::Ready
        } else {
            RevealState::Unavailable
        };
    }

    /// Ask to reveal and, on yes, archive the guess and lock the round.
    ///
    /// The snapshot is taken before anything else changes, so a failure to
    /// encode it leaves the round exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be snapshotted.
    pub fn request(
        &mut self,
        confirm: &mut dyn Confirm,
        surface: &Surface,
        panel: &mut EntityPanel,
        gallery: &mut Gallery,
        lock: &mut SessionLock,
    ) -> DoodleResult<RevealOutcome> {
        let Some(record) = panel.record().filter(|_| self.is_enabled()) else {
            tracing::debug!("Reveal refused in state {:?}", self.state);
            return Ok(RevealOutcome::Refused);
        };

        if !confirm.confirm(&Prompt::RevealAnswer) {
            tracing::debug!("Reveal declined");
            return Ok(RevealOutcome::Declined);
        }

        let snapshot = surface.snapshot()?;
        let entry = GalleryEntry::new(record, snapshot);
        tracing::info!(
            "Revealed {} (No.{})",
            entry.subject_label(),
            entry.entity_number()
        );

        gallery.archive(entry);
        lock.close();
        panel.show_reference();
        self.state = RevealState::Revealed;
        Ok(RevealOutcome::Revealed)
    }
}
