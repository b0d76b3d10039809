//! Catalog collaborator: where round records come from.
//!
//! [`HttpCatalog`] speaks the `PokeAPI` layout. Each record takes two GETs,
//! one for the entry and one for its species, issued concurrently and
//! retried with exponential backoff on transient failures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use doodle_core::{DoodleError, EntityPayload, EntityRecord};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Public `PokeAPI` endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://pokeapi.co/api/v2";

/// Language used for names and descriptions unless configured otherwise.
pub const DEFAULT_LANGUAGE: &str = "ja";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog base URL provided is invalid.
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, etc.).
    #[error("catalog HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("catalog returned HTTP {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code returned.
        status: u16,
    },
    /// JSON parsing failed.
    #[error("failed to parse catalog payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload parsed but lacks a required field.
    #[error("{0}")]
    Incomplete(String),
}

impl CatalogError {
    /// Whether another attempt might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidUrl(_) | Self::Json(_) | Self::Incomplete(_) => false,
        }
    }
}

impl From<CatalogError> for DoodleError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Incomplete(reason) => Self::FetchFailure(reason),
            other => Self::FetchFailure(other.to_string()),
        }
    }
}

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 200,
            max_delay_ms: 5_000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration with custom values.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        initial_delay_ms: u64,
        max_delay_ms: u64,
        multiplier: f64,
    ) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
            multiplier,
        }
    }

    /// Calculate delay for a given retry number (0-indexed).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let base_delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        base_delay.min(self.max_delay_ms as f64) as u64
    }
}

/// Source of entity records for new rounds.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch the record for `id`.
    async fn fetch(&self, id: u32) -> Result<EntityRecord, CatalogError>;
}

/// `PokeAPI`-shaped HTTP catalog.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<InnerCatalog>,
}

struct InnerCatalog {
    http: Client,
    base: Url,
    language: String,
    retry: RetryConfig,
}

impl HttpCatalog {
    /// Catalog at `base_url` with the default language and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the URL is malformed.
    /// Returns [`CatalogError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        Self::with_options(base_url, DEFAULT_LANGUAGE, RetryConfig::default())
    }

    /// Catalog with an explicit language code and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the URL is malformed or cannot
    /// be a base. Returns [`CatalogError::Http`] if the HTTP client fails to
    /// build.
    pub fn with_options(
        base_url: &str,
        language: impl Into<String>,
        retry: RetryConfig,
    ) -> Result<Self, CatalogError> {
        let mut base =
            Url::parse(base_url).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        // Url::join replaces the last segment unless the path ends in a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(concat!("dex-doodle/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerCatalog {
                http,
                base,
                language: language.into(),
                retry,
            }),
        })
    }

    /// Base URL every request is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    /// Language code used for names and descriptions.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.inner.language
    }

    fn endpoint(&self, resource: &str, id: u32) -> Result<Url, CatalogError> {
        self.inner
            .base
            .join(&format!("{resource}/{id}"))
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let retry = &self.inner.retry;
        let mut attempt = 0;
        loop {
            match self.get_once(&url).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt + 1 < retry.max_attempts => {
                    let delay = retry.delay_for_attempt(attempt);
                    tracing::warn!(
                        "Catalog request to {} failed ({}), retrying in {}ms",
                        url,
                        err,
                        delay
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> Result<T, CatalogError> {
        tracing::debug!("GET {}", url);
        let response = self.inner.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn fetch(&self, id: u32) -> Result<EntityRecord, CatalogError> {
        let pokemon_url = self.endpoint("pokemon", id)?;
        let species_url = self.endpoint("pokemon-species", id)?;

        let (pokemon, species) = futures::try_join!(
            self.get_json::<PokemonResponse>(pokemon_url),
            self.get_json::<SpeciesResponse>(species_url),
        )?;

        let payload = entity_payload(id, pokemon, &species, &self.inner.language);
        EntityRecord::try_from(payload).map_err(|e| CatalogError::Incomplete(e.reason()))
    }
}

// ---------------------------------------------------------------------------
// PokeAPI wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    name: Option<String>,
    sprites: Option<Sprites>,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Option<Artwork>,
}

#[derive(Debug, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeciesResponse {
    #[serde(default)]
    names: Vec<LocalizedName>,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorText>,
    #[serde(default)]
    pokedex_numbers: Vec<DexNumber>,
}

#[derive(Debug, Deserialize)]
struct LocalizedName {
    name: String,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct FlavorText {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DexNumber {
    entry_number: u32,
}

fn entity_payload(
    id: u32,
    pokemon: PokemonResponse,
    species: &SpeciesResponse,
    language: &str,
) -> EntityPayload {
    let localized_name = species
        .names
        .iter()
        .find(|n| n.language.name == language)
        .map(|n| n.name.clone());

    let description = species
        .flavor_text_entries
        .iter()
        .find(|f| f.language.name == language)
        .map(|f| f.flavor_text.replace(['\n', '\u{c}'], " "));

    let artwork = pokemon
        .sprites
        .and_then(|s| s.other)
        .and_then(|o| o.official_artwork)
        .and_then(|a| a.front_default);

    EntityPayload {
        id: Some(id),
        number: species.pokedex_numbers.first().map(|d| d.entry_number),
        display_name: localized_name.or(pokemon.name),
        description,
        reference_image_ref: artwork,
    }
}
