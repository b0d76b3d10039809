//! The entity panel: which record is on screen, and what to show while one
//! is being fetched.
//!
//! Fetches are asynchronous and may overlap. Every fetch is started with
//! [`EntityPanel::begin_load`], which hands out a [`FetchTicket`]; only the
//! most recently issued ticket may complete. Anything older is a stale
//! result and is dropped.

use serde::{Deserialize, Serialize};

use crate::{DoodleResult, EntityRecord};

/// Identifies one fetch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    /// Monotonically increasing request sequence number.
    pub seq: u64,
    /// Catalog id requested.
    pub id: u32,
}

/// What the panel is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    /// Nothing requested yet.
    Initial,
    /// A fetch is in flight.
    Loading {
        /// Catalog id being fetched.
        requested_id: u32,
    },
    /// A record is on screen.
    Loaded(EntityRecord),
    /// The last fetch failed.
    Failed {
        /// Catalog id that failed.
        requested_id: u32,
        /// Human-readable reason shown to the player.
        reason: String,
    },
}

/// The text fields rendered by the presentation surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelFields {
    /// Number line, e.g. `No.25`.
    pub number: String,
    /// Name line.
    pub name: String,
    /// Description paragraph.
    pub description: String,
}

impl PanelView {
    /// Project into displayable text.
    #[must_use]
    pub fn fields(&self) -> PanelFields {
        match self {
            Self::Initial => PanelFields {
                number: "No.???".to_string(),
                name: "Who's that?".to_string(),
                description: "The entry's description will appear here.".to_string(),
            },
            Self::Loading { requested_id } => PanelFields {
                number: format!("No.{requested_id}"),
                name: "Loading…".to_string(),
                description: "Fetching entry details.".to_string(),
            },
            Self::Loaded(record) => PanelFields {
                number: format!("No.{}", record.number()),
                name: record.display_name().to_string(),
                description: record.description().to_string(),
            },
            Self::Failed { reason, .. } => PanelFields {
                number: "No.??".to_string(),
                name: "Error".to_string(),
                description: reason.clone(),
            },
        }
    }
}

/// How a fetch completion was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The record is now on screen.
    Loaded,
    /// The error placeholder is on screen.
    Failed,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Holds the current entity record and its placeholders.
#[derive(Debug, Clone)]
pub struct EntityPanel {
    view: PanelView,
    reference_visible: bool,
    outstanding: Option<FetchTicket>,
    next_seq: u64,
}

impl Default for EntityPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPanel {
    /// A panel showing the initial placeholder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view: PanelView::Initial,
            reference_visible: false,
            outstanding: None,
            next_seq: 1,
        }
    }

    /// Current view.
    #[must_use]
    pub const fn view(&self) -> &PanelView {
        &self.view
    }

    /// The record on screen, if one loaded.
    #[must_use]
    pub fn record(&self) -> Option<&EntityRecord> {
        match &self.view {
            PanelView::Loaded(record) => Some(record),
            _ => None,
        }
    }

    /// The fetch whose result will be accepted, if any.
    #[must_use]
    pub const fn outstanding(&self) -> Option<FetchTicket> {
        self.outstanding
    }

    /// The answer image, only once revealed.
    #[must_use]
    pub fn visible_reference(&self) -> Option<&str> {
        if self.reference_visible {
            self.record().map(EntityRecord::reference_image_ref)
        } else {
            None
        }
    }

    /// Replace the record directly, superseding any fetch in flight.
    pub fn load(&mut self, record: EntityRecord) {
        tracing::debug!("Panel loaded id {} directly", record.id());
        self.outstanding = None;
        self.view = PanelView::Loaded(record);
        self.reference_visible = false;
    }

    /// Show the loading placeholder for `id` and issue the ticket for its fetch.
    pub fn begin_load(&mut self, id: u32) -> FetchTicket {
        let ticket = FetchTicket {
            seq: self.next_seq,
            id,
        };
        self.next_seq += 1;

        if let Some(previous) = self.outstanding.replace(ticket) {
            tracing::debug!(
                "Fetch for id {} (seq {}) superseded by id {}",
                previous.id,
                previous.seq,
                id
            );
        }
        self.view = PanelView::Loading { requested_id: id };
        self.reference_visible = false;
        ticket
    }

    /// Apply a fetch result if `ticket` is still the latest request.
    pub fn complete_load(
        &mut self,
        ticket: FetchTicket,
        result: DoodleResult<EntityRecord>,
    ) -> LoadOutcome {
        if self.outstanding != Some(ticket) {
            tracing::debug!(
                "Discarding stale fetch result for id {} (seq {})",
                ticket.id,
                ticket.seq
            );
            return LoadOutcome::Stale;
        }
        self.outstanding = None;
        self.reference_visible = false;

        match result {
            Ok(record) => {
                self.view = PanelView::Loaded(record);
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::warn!("Fetch for id {} failed: {}", ticket.id, e);
                self.view = PanelView::Failed {
                    requested_id: ticket.id,
                    reason: e.reason(),
                };
                LoadOutcome::Failed
            }
        }
    }

    pub(crate) fn show_reference(&mut self) {
        self.reference_visible = self.record().is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DoodleError;

    fn record(id: u32, name: &str) -> EntityRecord {
        EntityRecord::new(id, name, format!("{name} description"), format!("ref{id}.png"))
    }

    #[test]
    fn test_initial_placeholder() {
        let panel = EntityPanel::new();
        assert_eq!(panel.view(), &PanelView::Initial);
        assert_eq!(panel.view().fields().number, "No.???");
        assert!(panel.record().is_none());
    }

    #[test]
    fn test_loading_placeholder_is_distinct() {
        let mut panel = EntityPanel::new();
        let initial = panel.view().fields();
        panel.begin_load(42);
        let loading = panel.view().fields();

        assert_eq!(loading.number, "No.42");
        assert_eq!(loading.name, "Loading…");
        assert_ne!(loading, initial);
    }

    #[test]
    fn test_complete_load_shows_record() {
        let mut panel = EntityPanel::new();
        let ticket = panel.begin_load(1);
        assert_eq!(
            panel.complete_load(ticket, Ok(record(1, "Bulbasaur"))),
            LoadOutcome::Loaded
        );
        assert_eq!(panel.view().fields().name, "Bulbasaur");
        assert!(panel.outstanding().is_none());
    }

    #[test]
    fn test_failure_shows_reason() {
        let mut panel = EntityPanel::new();
        let ticket = panel.begin_load(3);
        let outcome = panel.complete_load(
            ticket,
            Err(DoodleError::FetchFailure("connection refused".into())),
        );

        assert_eq!(outcome, LoadOutcome::Failed);
        let fields = panel.view().fields();
        assert_eq!(fields.number, "No.??");
        assert_eq!(fields.name, "Error");
        assert_eq!(fields.description, "connection refused");
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut panel = EntityPanel::new();
        let five = panel.begin_load(5);
        let seven = panel.begin_load(7);

        assert_eq!(
            panel.complete_load(seven, Ok(record(7, "Squirtle"))),
            LoadOutcome::Loaded
        );
        assert_eq!(
            panel.complete_load(five, Ok(record(5, "Charmeleon"))),
            LoadOutcome::Stale
        );
        assert_eq!(panel.record().map(EntityRecord::id), Some(7));
    }

    #[test]
    fn test_stale_completion_cannot_replace_newer_placeholder() {
        let mut panel = EntityPanel::new();
        let five = panel.begin_load(5);
        panel.begin_load(7);

        assert_eq!(
            panel.complete_load(five, Ok(record(5, "Charmeleon"))),
            LoadOutcome::Stale
        );
        assert_eq!(panel.view(), &PanelView::Loading { requested_id: 7 });
    }

    #[test]
    fn test_same_id_requested_twice_only_latest_applies() {
        let mut panel = EntityPanel::new();
        let first = panel.begin_load(9);
        let second = panel.begin_load(9);
        assert_ne!(first, second);
        assert_eq!(
            panel.complete_load(first, Ok(record(9, "Blastoise"))),
            LoadOutcome::Stale
        );
    }

    #[test]
    fn test_direct_load_supersedes_fetch() {
        let mut panel = EntityPanel::new();
        let ticket = panel.begin_load(5);
        panel.load(record(1, "Bulbasaur"));

        assert_eq!(
            panel.complete_load(ticket, Ok(record(5, "Charmeleon"))),
            LoadOutcome::Stale
        );
        assert_eq!(panel.record().map(EntityRecord::id), Some(1));
    }

    #[test]
    fn test_reference_hidden_until_shown_and_after_reload() {
        let mut panel = EntityPanel::new();
        panel.load(record(1, "Bulbasaur"));
        assert!(panel.visible_reference().is_none());

        panel.show_reference();
        assert_eq!(panel.visible_reference(), Some("ref1.png"));

        panel.begin_load(2);
        assert!(panel.visible_reference().is_none());
    }
}
