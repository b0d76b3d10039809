//! # Dex Doodle App
//!
//! Host for the Dex Doodle game core. Records come from a `PokeAPI`-shaped
//! HTTP catalog, player input comes from a JSON-lines script, and the
//! gallery is exported as HTML plus PNG files.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p doodle-app -- --script round.jsonl --out ./gallery
//! ```
//!
//! ## Against a local catalog mirror:
//!
//! ```bash
//! DOODLE_CATALOG_URL=http://localhost:8000/api/v2 cargo run -p doodle-app -- --assume-yes
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `AppConfig` - Canvas size, catalog, script and output settings
//! - `RoundDriver` - Owns the session and applies async fetch results
//! - `HttpCatalog` - Fetches records with retry and backoff

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod confirm;
pub mod driver;
pub mod export;
pub mod script;

pub use catalog::{Catalog, CatalogError, HttpCatalog, RetryConfig};
pub use confirm::{ConfirmPolicy, TerminalConfirm};
pub use driver::RoundDriver;
pub use export::{export_session, ExportError, ExportSummary};
pub use script::{parse_script, Command, ScriptError};

use std::path::PathBuf;

use clap::Parser;
use doodle_core::session::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use doodle_core::DEFAULT_CATALOG_SIZE;

/// Command-line arguments for dex-doodle.
#[derive(Debug, Clone, Parser)]
#[command(name = "dex-doodle")]
#[command(about = "Draw an entry from its description, then reveal the answer")]
#[command(version)]
pub struct CliArgs {
    /// Catalog base URL (e.g., <https://pokeapi.co/api/v2>)
    #[arg(long, env = "DOODLE_CATALOG_URL", default_value = catalog::DEFAULT_CATALOG_URL)]
    pub catalog_url: String,

    /// Language code for names and descriptions
    #[arg(long, env = "DOODLE_LANGUAGE", default_value = catalog::DEFAULT_LANGUAGE)]
    pub language: String,

    /// Number of entries in the catalog; round ids are drawn from 1..=N
    #[arg(long, default_value_t = DEFAULT_CATALOG_SIZE)]
    pub catalog_size: u32,

    /// JSON-lines command script (reads stdin when omitted)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Output directory for gallery.html and guess images
    #[arg(long, env = "DOODLE_OUT_DIR", default_value = "doodle-out")]
    pub out: PathBuf,

    /// Canvas width in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Answer yes to every prompt the script leaves open
    #[arg(long, conflicts_with = "assume_no")]
    pub assume_yes: bool,

    /// Answer no to every prompt the script leaves open
    #[arg(long)]
    pub assume_no: bool,

    /// Attempts per catalog request, including the first
    #[arg(long, default_value_t = 3)]
    pub retry_attempts: u32,

    /// Seed for reproducible round ids
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Catalog base URL.
    pub catalog_url: String,
    /// Language code for names and descriptions.
    pub language: String,
    /// Largest round id.
    pub catalog_size: u32,
    /// Script file; `None` reads stdin.
    pub script: Option<PathBuf>,
    /// Output directory.
    pub out_dir: PathBuf,
    /// How unanswered prompts are resolved.
    pub confirm: ConfirmPolicy,
    /// Retry policy for catalog requests.
    pub retry: RetryConfig,
    /// Seed for round ids.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            catalog_url: catalog::DEFAULT_CATALOG_URL.to_string(),
            language: catalog::DEFAULT_LANGUAGE.to_string(),
            catalog_size: DEFAULT_CATALOG_SIZE,
            script: None,
            out_dir: PathBuf::from("doodle-out"),
            confirm: ConfirmPolicy::Ask,
            retry: RetryConfig::default(),
            seed: None,
        }
    }
}

impl From<CliArgs> for AppConfig {
    fn from(args: CliArgs) -> Self {
        let confirm = if args.assume_yes {
            ConfirmPolicy::AssumeYes
        } else if args.assume_no {
            ConfirmPolicy::AssumeNo
        } else {
            ConfirmPolicy::Ask
        };

        Self {
            width: args.width,
            height: args.height,
            catalog_url: args.catalog_url,
            language: args.language,
            catalog_size: args.catalog_size,
            script: args.script,
            out_dir: args.out,
            confirm,
            retry: RetryConfig {
                max_attempts: args.retry_attempts.max(1),
                ..RetryConfig::default()
            },
            seed: args.seed,
        }
    }
}
