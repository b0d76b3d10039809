//! Append-only archive of finished rounds.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::EntityRecord;

/// One archived round: the guess next to the answer.
///
/// Built once at reveal time and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    entity_id: u32,
    entity_number: u32,
    subject_label: String,
    reference_image_ref: String,
    guess: Snapshot,
}

impl GalleryEntry {
    /// Pair a guess with the record it was drawn for.
    #[must_use]
    pub fn new(record: &EntityRecord, guess: Snapshot) -> Self {
        Self {
            entity_id: record.id(),
            entity_number: record.number(),
            subject_label: record.display_name().to_string(),
            reference_image_ref: record.reference_image_ref().to_string(),
            guess,
        }
    }

    /// Catalog id of the subject.
    #[must_use]
    pub const fn entity_id(&self) -> u32 {
        self.entity_id
    }

    /// Display number of the subject.
    #[must_use]
    pub const fn entity_number(&self) -> u32 {
        self.entity_number
    }

    /// Name of the subject.
    #[must_use]
    pub fn subject_label(&self) -> &str {
        &self.subject_label
    }

    /// URI of the answer image.
    #[must_use]
    pub fn reference_image_ref(&self) -> &str {
        &self.reference_image_ref
    }

    /// The player's drawing.
    #[must_use]
    pub const fn guess(&self) -> &Snapshot {
        &self.guess
    }
}

/// One visual block of the rendered gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryBlock {
    /// Display number of the subject.
    pub number: u32,
    /// Name heading.
    pub subject_label: String,
    /// Answer image URI.
    pub reference_image_ref: String,
    /// The guess as an embeddable data URI.
    pub guess_data_uri: String,
}

/// Past rounds, newest first.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    entries: VecDeque<GalleryEntry>,
}

impl Gallery {
    /// An empty gallery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry in front of all older ones.
    pub fn archive(&mut self, entry: GalleryEntry) {
        tracing::debug!(
            "Archiving guess for {} ({} entries)",
            entry.subject_label,
            self.entries.len() + 1
        );
        self.entries.push_front(entry);
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been archived.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&GalleryEntry> {
        self.entries.front()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GalleryEntry> {
        self.entries.iter()
    }

    /// Project every entry into a displayable block, newest first.
    #[must_use]
    pub fn render(&self) -> Vec<GalleryBlock> {
        self.entries
            .iter()
            .map(|entry| GalleryBlock {
                number: entry.entity_number,
                subject_label: entry.subject_label.clone(),
                reference_image_ref: entry.reference_image_ref.clone(),
                guess_data_uri: entry.guess.to_data_uri(),
            })
            .collect()
    }
}
