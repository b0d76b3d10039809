//! Catalog entries the player is asked to draw.

use serde::{Deserialize, Serialize};

use crate::DoodleError;

/// Description used when the catalog has none for the entry.
pub const MISSING_DESCRIPTION: &str = "No description is available for this entry.";

/// One catalog entry: who to draw, and the answer image.
///
/// Immutable once built; a new round replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    id: u32,
    number: u32,
    display_name: String,
    description: String,
    reference_image_ref: String,
}

impl EntityRecord {
    /// Build a record whose display number equals its id.
    #[must_use]
    pub fn new(
        id: u32,
        display_name: impl Into<String>,
        description: impl Into<String>,
        reference_image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id,
            number: id,
            display_name: display_name.into(),
            description: description.into(),
            reference_image_ref: reference_image_ref.into(),
        }
    }

    /// Override the number shown to the player.
    #[must_use]
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = number;
        self
    }

    /// Catalog id the record was fetched with.
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Number shown to the player.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Name shown to the player.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Description shown to the player.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// URI of the answer image.
    #[must_use]
    pub fn reference_image_ref(&self) -> &str {
        &self.reference_image_ref
    }
}

/// Entity data as a catalog hands it over, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPayload {
    /// Catalog id.
    pub id: Option<u32>,
    /// Display number, if different from the id.
    #[serde(default)]
    pub number: Option<u32>,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Description text.
    #[serde(default)]
    pub description: Option<String>,
    /// Answer image URI.
    #[serde(default)]
    pub reference_image_ref: Option<String>,
}

impl TryFrom<EntityPayload> for EntityRecord {
    type Error = DoodleError;

    fn try_from(payload: EntityPayload) -> Result<Self, Self::Error> {
        let id = payload.id.ok_or_else(|| incomplete("id"))?;
        let display_name = non_blank(payload.display_name).ok_or_else(|| incomplete("name"))?;
        let reference_image_ref =
            non_blank(payload.reference_image_ref).ok_or_else(|| incomplete("reference image"))?;
        let description =
            non_blank(payload.description).unwrap_or_else(|| MISSING_DESCRIPTION.to_string());

        Ok(Self {
            id,
            number: payload.number.unwrap_or(id),
            display_name,
            description,
            reference_image_ref,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn incomplete(field: &str) -> DoodleError {
    DoodleError::FetchFailure(format!("Catalog entry is missing its {field}"))
}
