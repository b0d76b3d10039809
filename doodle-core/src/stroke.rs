//! Pointer-driven freehand strokes.
//!
//! ```text
//!            pointer_down (lock open)
//!   ┌──────┐ ─────────────────────────▶ ┌─────────┐
//!   │ Idle │                            │ Drawing │ ◀─┐ pointer_move
//!   └──────┘ ◀───────────────────────── └─────────┘ ──┘ (paints a segment)
//!            pointer_up / pointer_leave
//! ```

use serde::{Deserialize, Serialize};

use crate::lock::SessionLock;
use crate::surface::Surface;
use crate::{Point, StrokeStyle};

/// A stroke in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveStroke {
    /// Where the pointer went down.
    pub origin: Point,
    /// The most recent point painted to.
    pub last: Point,
    /// Style captured when the stroke started.
    pub style: StrokeStyle,
    /// Segments painted so far.
    pub segments: usize,
}

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    /// Not drawing.
    #[default]
    Idle,
    /// Between pointer-down and pointer-up.
    Drawing(ActiveStroke),
}

/// A finished stroke, kept for the rest of the round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Style the stroke was painted with.
    pub style: StrokeStyle,
    /// First point.
    pub origin: Point,
    /// Last point.
    pub end: Point,
    /// Number of segments painted.
    pub segments: usize,
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// A stroke began.
    Started,
    /// A segment was painted.
    Painted,
    /// A stroke ended; `committed` is false when it painted nothing.
    Ended {
        /// Whether the stroke was added to the round's log.
        committed: bool,
    },
    /// Nothing to do in the current state.
    Ignored,
    /// The session lock is closed.
    Refused,
}

/// Converts pointer events into painted strokes.
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    state: StrokeState,
    strokes: Vec<Stroke>,
    segments_painted: usize,
}

impl StrokeEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &StrokeState {
        &self.state
    }

    /// True between pointer-down and pointer-up.
    #[must_use]
    pub const fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing(_))
    }

    /// Strokes committed this round, oldest first.
    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Segments painted this round, including any stroke still in progress.
    #[must_use]
    pub const fn segments_painted(&self) -> usize {
        self.segments_painted
    }

    /// Start a stroke at `point` with a copy of `style`.
    ///
    /// Refused silently while the lock is closed. A stroke that was somehow
    /// still open is finished first.
    pub fn pointer_down(
        &mut self,
        point: Point,
        style: &StrokeStyle,
        lock: &SessionLock,
    ) -> StrokeOutcome {
        if !lock.is_open() {
            tracing::debug!("Pointer down refused: session locked");
            return StrokeOutcome::Refused;
        }

        self.finish();
        self.state = StrokeState::Drawing(ActiveStroke {
            origin: point,
            last: point,
            style: *style,
            segments: 0,
        });
        StrokeOutcome::Started
    }

    /// Extend the active stroke to `point`, painting the new segment.
    pub fn pointer_move(
        &mut self,
        point: Point,
        surface: &mut Surface,
        lock: &SessionLock,
    ) -> StrokeOutcome {
        let StrokeState::Drawing(active) = &mut self.state else {
            return StrokeOutcome::Ignored;
        };

        if !lock.is_open() {
            self.finish();
            return StrokeOutcome::Refused;
        }

        surface.paint_segment(active.last, point, &active.style);
        active.last = point;
        active.segments += 1;
        self.segments_painted += 1;
        StrokeOutcome::Painted
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> StrokeOutcome {
        if self.is_drawing() {
            StrokeOutcome::Ended {
                committed: self.finish(),
            }
        } else {
            StrokeOutcome::Ignored
        }
    }

    /// Pointer left the surface; same as releasing it.
    pub fn pointer_leave(&mut self) -> StrokeOutcome {
        self.pointer_up()
    }

    /// Return to idle, committing the active stroke if it painted anything.
    pub(crate) fn finish(&mut self) -> bool {
        let StrokeState::Drawing(active) = std::mem::take(&mut self.state) else {
            return false;
        };
        if active.segments == 0 {
            return false;
        }
        self.strokes.push(Stroke {
            style: active.style,
            origin: active.origin,
            end: active.last,
            segments: active.segments,
        });
        tracing::debug!(
            "Stroke committed: {} segments, {:?} {}px",
            active.segments,
            active.style.mode(),
            active.style.width()
        );
        true
    }

    /// Forget everything for a new round.
    pub(crate) fn reset(&mut self) {
        self.state = StrokeState::Idle;
        self.strokes.clear();
        self.segments_painted = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rgb, ToolMode};

    fn setup() -> (StrokeEngine, Surface, SessionLock) {
        (
            StrokeEngine::new(),
            Surface::new(64, 64).expect("surface"),
            SessionLock::new(),
        )
    }

    #[test]
    fn test_down_move_up_commits_stroke() {
        let (mut engine, mut surface, lock) = setup();
        let style = StrokeStyle::default();

        assert_eq!(
            engine.pointer_down(Point::new(5.0, 5.0), &style, &lock),
            StrokeOutcome::Started
        );
        assert!(engine.is_drawing());
        assert_eq!(
            engine.pointer_move(Point::new(20.0, 5.0), &mut surface, &lock),
            StrokeOutcome::Painted
        );
        assert_eq!(
            engine.pointer_move(Point::new(20.0, 20.0), &mut surface, &lock),
            StrokeOutcome::Painted
        );
        assert_eq!(
            engine.pointer_up(),
            StrokeOutcome::Ended { committed: true }
        );

        assert!(!engine.is_drawing());
        assert_eq!(engine.strokes().len(), 1);
        assert_eq!(engine.strokes()[0].segments, 2);
        assert_eq!(engine.strokes()[0].end, Point::new(20.0, 20.0));
        assert_eq!(engine.segments_painted(), 2);
        assert!(!surface.is_blank());
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let (mut engine, mut surface, lock) = setup();
        assert_eq!(
            engine.pointer_move(Point::new(1.0, 1.0), &mut surface, &lock),
            StrokeOutcome::Ignored
        );
        assert!(surface.is_blank());
        assert_eq!(engine.segments_painted(), 0);
    }

    #[test]
    fn test_tap_without_moves_is_not_committed() {
        let (mut engine, surface, lock) = setup();
        engine.pointer_down(Point::new(3.0, 3.0), &StrokeStyle::default(), &lock);
        assert_eq!(
            engine.pointer_leave(),
            StrokeOutcome::Ended { committed: false }
        );
        assert!(engine.strokes().is_empty());
        assert!(surface.is_blank());
    }

    #[test]
    fn test_locked_down_is_refused() {
        let (mut engine, mut surface, mut lock) = setup();
        lock.close();

        assert_eq!(
            engine.pointer_down(Point::new(3.0, 3.0), &StrokeStyle::default(), &lock),
            StrokeOutcome::Refused
        );
        assert!(!engine.is_drawing());
        assert_eq!(
            engine.pointer_move(Point::new(30.0, 30.0), &mut surface, &lock),
            StrokeOutcome::Ignored
        );
        assert!(surface.is_blank());
    }

    #[test]
    fn test_lock_closing_mid_stroke_stops_painting() {
        let (mut engine, mut surface, mut lock) = setup();
        engine.pointer_down(Point::new(3.0, 3.0), &StrokeStyle::default(), &lock);
        engine.pointer_move(Point::new(10.0, 3.0), &mut surface, &lock);
        let before = surface.clone();

        lock.close();
        assert_eq!(
            engine.pointer_move(Point::new(40.0, 40.0), &mut surface, &lock),
            StrokeOutcome::Refused
        );
        assert_eq!(surface, before);
        assert!(!engine.is_drawing());
        assert_eq!(engine.strokes().len(), 1);
    }

    #[test]
    fn test_style_is_captured_at_pointer_down() {
        let (mut engine, mut surface, lock) = setup();
        let mut style = StrokeStyle::new(Rgb::new(255, 0, 0), 4.0, ToolMode::Pen);

        engine.pointer_down(Point::new(0.0, 10.0), &style, &lock);
        style.set_color(Rgb::new(0, 0, 255));
        engine.pointer_move(Point::new(30.0, 10.0), &mut surface, &lock);
        engine.pointer_up();

        let px = surface.pixel(15, 10).expect("pixel");
        assert_eq!((px.r, px.b), (255, 0));
        assert_eq!(engine.strokes()[0].style.color(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_second_down_finishes_open_stroke() {
        let (mut engine, mut surface, lock) = setup();
        let style = StrokeStyle::default();
        engine.pointer_down(Point::new(0.0, 0.0), &style, &lock);
        engine.pointer_move(Point::new(5.0, 5.0), &mut surface, &lock);
        engine.pointer_down(Point::new(10.0, 10.0), &style, &lock);

        assert_eq!(engine.strokes().len(), 1);
        assert!(engine.is_drawing());
    }

    #[test]
    fn test_reset_clears_round_state() {
        let (mut engine, mut surface, lock) = setup();
        engine.pointer_down(Point::new(0.0, 0.0), &StrokeStyle::default(), &lock);
        engine.pointer_move(Point::new(5.0, 5.0), &mut surface, &lock);
        engine.reset();

        assert!(!engine.is_drawing());
        assert!(engine.strokes().is_empty());
        assert_eq!(engine.segments_painted(), 0);
    }
}
