//! The game session: every piece of round state in one context object.

use serde::Serialize;

use crate::confirm::{Confirm, Decision};
use crate::gallery::Gallery;
use crate::lock::{LockState, SessionLock};
use crate::panel::{EntityPanel, FetchTicket, LoadOutcome, PanelFields};
use crate::reveal::{RevealFlow, RevealOutcome, RevealState};
use crate::stroke::{StrokeEngine, StrokeOutcome};
use crate::surface::Surface;
use crate::{
    DoodleResult, EntityRecord, InputEvent, Point, PointerEvent, Rgb, StrokeStyle, ToolMode,
};

/// Default surface width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default surface height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;

/// What the presentation surface needs to draw everything except the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Entity panel text.
    pub fields: PanelFields,
    /// Answer image, once revealed.
    pub reference: Option<String>,
    /// Whether the reveal button is enabled.
    pub reveal_enabled: bool,
    /// Label for the eraser toggle.
    pub tool_label: &'static str,
    /// Current drawing gate.
    pub lock: LockState,
    /// Number of archived rounds.
    pub gallery_len: usize,
}

/// One player's game: surface, drawing tools, round gate, panel and gallery.
#[derive(Debug, Clone)]
pub struct GameSession {
    surface: Surface,
    style: StrokeStyle,
    engine: StrokeEngine,
    lock: SessionLock,
    panel: EntityPanel,
    reveal: RevealFlow,
    gallery: Gallery,
}

impl GameSession {
    /// Create a session with a blank surface of the given size.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero.
    pub fn new(width: u32, height: u32) -> DoodleResult<Self> {
        Ok(Self {
            surface: Surface::new(width, height)?,
            style: StrokeStyle::default(),
            engine: StrokeEngine::new(),
            lock: SessionLock::new(),
            panel: EntityPanel::new(),
            reveal: RevealFlow::new(),
            gallery: Gallery::new(),
        })
    }

    /// The drawing surface.
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Current stroke style.
    #[must_use]
    pub const fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// The stroke engine.
    #[must_use]
    pub const fn engine(&self) -> &StrokeEngine {
        &self.engine
    }

    /// The round gate.
    #[must_use]
    pub const fn lock(&self) -> &SessionLock {
        &self.lock
    }

    /// The entity panel.
    #[must_use]
    pub const fn panel(&self) -> &EntityPanel {
        &self.panel
    }

    /// Reveal control state.
    #[must_use]
    pub const fn reveal_state(&self) -> RevealState {
        self.reveal.state()
    }

    /// Archived rounds.
    #[must_use]
    pub const fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Route an input event.
    ///
    /// # Errors
    ///
    /// Only a resize to a zero dimension fails.
    pub fn process_event(&mut self, event: &InputEvent) -> DoodleResult<()> {
        match *event {
            InputEvent::Pointer(pointer) => {
                self.pointer(pointer);
            }
            InputEvent::SetColor(color) => self.set_color(color),
            InputEvent::SetWidth(width) => self.set_width(width),
            InputEvent::ToggleEraser => {
                self.toggle_eraser();
            }
            InputEvent::Resize { width, height } => {
                self.resize(width, height)?;
            }
        }
        Ok(())
    }

    /// Route a pointer event to the stroke engine.
    pub fn pointer(&mut self, event: PointerEvent) -> StrokeOutcome {
        match event {
            PointerEvent::Down(point) => self.pointer_down(point),
            PointerEvent::Move(point) => self.pointer_move(point),
            PointerEvent::Up => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Pointer pressed.
    pub fn pointer_down(&mut self, point: Point) -> StrokeOutcome {
        self.engine.pointer_down(point, &self.style, &self.lock)
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, point: Point) -> StrokeOutcome {
        self.engine.pointer_move(point, &mut self.surface, &self.lock)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> StrokeOutcome {
        self.engine.pointer_up()
    }

    /// Pointer left the surface.
    pub fn pointer_leave(&mut self) -> StrokeOutcome {
        self.engine.pointer_leave()
    }

    /// Pick a pen color (leaves eraser mode).
    pub fn set_color(&mut self, color: Rgb) {
        self.style.set_color(color);
    }

    /// Pick a stroke width (clamped).
    pub fn set_width(&mut self, width: f32) {
        self.style.set_width(width);
    }

    /// Flip pen/eraser.
    pub fn toggle_eraser(&mut self) -> ToolMode {
        self.style.toggle_eraser()
    }

    /// Resize the surface, keeping its content at the origin.
    ///
    /// A stroke in progress carries on from its last point afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero dimension; the surface is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> DoodleResult<bool> {
        self.surface.resize(width, height)
    }

    /// Clear the surface after confirmation, regardless of the lock.
    pub fn clear(&mut self, confirm: &mut dyn Confirm) -> Decision {
        self.surface.clear(confirm)
    }

    /// Put a record on the panel directly and start a fresh round.
    pub fn load(&mut self, record: EntityRecord) {
        tracing::info!("New round: {} (id {})", record.display_name(), record.id());
        self.panel.load(record);
        self.start_round();
    }

    /// Start a fresh round for `id`, showing the loading placeholder.
    ///
    /// The returned ticket must accompany the fetch result into
    /// [`Self::complete_load`].
    pub fn begin_load(&mut self, id: u32) -> FetchTicket {
        tracing::info!("New round: fetching id {id}");
        let ticket = self.panel.begin_load(id);
        self.start_round();
        ticket
    }

    /// Apply a fetch result. Stale results change nothing.
    ///
    /// The round already started in [`Self::begin_load`], so a stroke in
    /// progress keeps drawing across the completion.
    pub fn complete_load(
        &mut self,
        ticket: FetchTicket,
        result: DoodleResult<EntityRecord>,
    ) -> LoadOutcome {
        let outcome = self.panel.complete_load(ticket, result);
        if outcome != LoadOutcome::Stale {
            self.lock.reopen();
            self.reveal.rearm(&self.panel);
        }
        outcome
    }

    /// Ask to reveal the answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be snapshotted.
    pub fn request_reveal(&mut self, confirm: &mut dyn Confirm) -> DoodleResult<RevealOutcome> {
        let outcome = self.reveal.request(
            confirm,
            &self.surface,
            &mut self.panel,
            &mut self.gallery,
            &mut self.lock,
        )?;
        if outcome == RevealOutcome::Revealed {
            self.engine.finish();
        }
        Ok(outcome)
    }

    /// Presentation projection of everything but the canvas.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            fields: self.panel.view().fields(),
            reference: self.panel.visible_reference().map(str::to_string),
            reveal_enabled: self.reveal.is_enabled(),
            tool_label: self.style.mode().toggle_label(),
            lock: self.lock.state(),
            gallery_len: self.gallery.len(),
        }
    }

    fn start_round(&mut self) {
        self.lock.reopen();
        self.engine.reset();
        self.reveal.rearm(&self.panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, AlwaysDecline};
    use crate::DoodleError;

    fn scribble(session: &mut GameSession, from: (f32, f32), to: (f32, f32)) {
        session.pointer_down(from.into());
        session.pointer_move(to.into());
        session.pointer_up();
    }

    #[test]
    fn test_fresh_session_view() {
        let session = GameSession::new(64, 48).expect("session");
        let view = session.view();
        assert_eq!(view.fields.number, "No.???");
        assert!(!view.reveal_enabled);
        assert_eq!(view.lock, LockState::Open);
        assert_eq!(view.tool_label, "Eraser");
        assert!(view.reference.is_none());
    }

    #[test]
    fn test_drawing_allowed_before_any_record() {
        let mut session = GameSession::new(64, 48).expect("session");
        scribble(&mut session, (2.0, 2.0), (30.0, 30.0));
        assert!(!session.surface().is_blank());
    }

    #[test]
    fn test_fetch_failure_keeps_round_open_but_reveal_disabled() {
        let mut session = GameSession::new(64, 48).expect("session");
        let ticket = session.begin_load(12);
        let outcome = session.complete_load(
            ticket,
            Err(DoodleError::FetchFailure("timed out".into())),
        );

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(session.lock().is_open());
        assert!(!session.view().reveal_enabled);
        assert_eq!(session.view().fields.description, "timed out");

        scribble(&mut session, (2.0, 2.0), (30.0, 30.0));
        assert!(!session.surface().is_blank());
        assert_eq!(
            session.request_reveal(&mut AlwaysConfirm).expect("reveal"),
            RevealOutcome::Refused
        );
        assert!(session.gallery().is_empty());
    }

    #[test]
    fn test_new_round_reopens_lock() {
        let mut session = GameSession::new(64, 48).expect("session");
        session.load(EntityRecord::new(1, "Bulbasaur", "...", "ref1.png"));
        session.request_reveal(&mut AlwaysConfirm).expect("reveal");
        assert!(!session.lock().is_open());

        session.begin_load(2);
        assert!(session.lock().is_open());
        assert!(session.view().reference.is_none());
        assert!(!session.view().reveal_enabled);
    }

    #[test]
    fn test_stale_completion_does_not_reset_round() {
        let mut session = GameSession::new(64, 48).expect("session");
        let old = session.begin_load(5);
        let new = session.begin_load(7);
        session.complete_load(new, Ok(EntityRecord::new(7, "Squirtle", "", "ref7.png")));
        session.request_reveal(&mut AlwaysConfirm).expect("reveal");

        let outcome =
            session.complete_load(old, Ok(EntityRecord::new(5, "Charmeleon", "", "ref5.png")));
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(!session.lock().is_open());
        assert_eq!(session.view().fields.name, "Squirtle");
    }

    #[test]
    fn test_completion_keeps_active_stroke() {
        let mut session = GameSession::new(100, 100).expect("session");
        let ticket = session.begin_load(3);
        session.pointer_down(Point::new(5.0, 50.0));
        session.pointer_move(Point::new(20.0, 50.0));

        let outcome =
            session.complete_load(ticket, Ok(EntityRecord::new(3, "Venusaur", "", "ref3.png")));
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(
            session.pointer_move(Point::new(90.0, 50.0)),
            StrokeOutcome::Painted
        );
        session.pointer_up();

        assert_eq!(session.surface().pixel(70, 50).map(|p| p.a), Some(255));
        assert_eq!(session.engine().strokes()[0].segments, 2);
        assert!(session.view().reveal_enabled);
    }

    #[test]
    fn test_clear_works_while_locked() {
        let mut session = GameSession::new(64, 48).expect("session");
        session.load(EntityRecord::new(1, "Bulbasaur", "...", "ref1.png"));
        scribble(&mut session, (2.0, 2.0), (30.0, 30.0));
        session.request_reveal(&mut AlwaysConfirm).expect("reveal");

        assert_eq!(session.clear(&mut AlwaysDecline), Decision::Declined);
        assert!(!session.surface().is_blank());
        assert_eq!(session.clear(&mut AlwaysConfirm), Decision::Accepted);
        assert!(session.surface().is_blank());
        let archived = session.gallery().latest().expect("entry").guess();
        assert!(!archived.decode().expect("decode").is_blank());
    }

    #[test]
    fn test_process_event_routes_controls() {
        let mut session = GameSession::new(64, 48).expect("session");
        session
            .process_event(&InputEvent::ToggleEraser)
            .expect("event");
        assert_eq!(session.style().mode(), ToolMode::Eraser);
        assert_eq!(session.view().tool_label, "Back to pen");

        session
            .process_event(&InputEvent::SetColor(Rgb::new(0, 128, 0)))
            .expect("event");
        assert_eq!(session.style().mode(), ToolMode::Pen);

        session
            .process_event(&InputEvent::Resize {
                width: 100,
                height: 80,
            })
            .expect("event");
        assert_eq!(session.surface().width(), 100);

        assert!(session
            .process_event(&InputEvent::Resize {
                width: 0,
                height: 80,
            })
            .is_err());
    }

    #[test]
    fn test_stroke_survives_resize_mid_stroke() {
        let mut session = GameSession::new(40, 40).expect("session");
        session.pointer_down(Point::new(5.0, 5.0));
        session.pointer_move(Point::new(20.0, 5.0));
        session.resize(80, 80).expect("resize");
        assert_eq!(
            session.pointer_move(Point::new(60.0, 5.0)),
            StrokeOutcome::Painted
        );
        session.pointer_up();

        assert_eq!(session.engine().strokes()[0].segments, 2);
        assert_eq!(session.surface().pixel(50, 5).map(|p| p.a), Some(255));
    }
}
