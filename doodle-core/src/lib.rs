//! # Dex Doodle Core
//!
//! Game logic for a draw-and-guess round: the player reads an entry's
//! number, name and description, sketches a guess, then reveals the answer
//! image. The guess and the answer are archived side by side.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   GameSession                    │
//! ├──────────────────────────────────────────────────┤
//! │  Stroke Engine  ──▶  Surface Buffer              │
//! │  - Idle/Drawing      - RGBA pixmap               │
//! │  - Pen/Eraser        - Resize keeps pixels       │
//! │        ▲                                         │
//! │  Session Lock   ◀──  Reveal Flow  ──▶  Gallery   │
//! │  - Open/Closed       - Snapshot        - Newest  │
//! │                           ▲              first   │
//! │                      Entity Panel                │
//! │                      - Fetch tickets             │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is synchronous. Fetching records is left to the caller,
//! which pairs [`GameSession::begin_load`] with
//! [`GameSession::complete_load`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod confirm;
pub mod entity;
pub mod error;
pub mod event;
pub mod gallery;
pub mod ids;
pub mod lock;
pub mod panel;
pub mod reveal;
pub mod session;
pub mod snapshot;
pub mod stroke;
pub mod style;
pub mod surface;

pub use confirm::{AlwaysConfirm, AlwaysDecline, Confirm, Decision, Prompt, ScriptedConfirm};
pub use entity::{EntityPayload, EntityRecord};
pub use error::{DoodleError, DoodleResult};
pub use event::{InputEvent, Point, PointerEvent};
pub use gallery::{Gallery, GalleryBlock, GalleryEntry};
pub use ids::{FixedIds, IdSource, UniformIds, DEFAULT_CATALOG_SIZE};
pub use lock::{LockState, SessionLock};
pub use panel::{EntityPanel, FetchTicket, LoadOutcome, PanelFields, PanelView};
pub use reveal::{RevealFlow, RevealOutcome, RevealState};
pub use session::{GameSession, SessionView};
pub use snapshot::Snapshot;
pub use stroke::{Stroke, StrokeEngine, StrokeOutcome, StrokeState};
pub use style::{Rgb, StrokeStyle, ToolMode};
pub use surface::{Pixel, Surface};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
