//! The raster drawing surface.
//!
//! A [`Surface`] owns an RGBA pixel buffer and its logical dimensions. It
//! starts fully transparent, which is what "blank" means everywhere in the
//! game.

use tiny_skia::{
    BlendMode, Color, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform,
};

use crate::confirm::{Confirm, Decision, Prompt};
use crate::snapshot::Snapshot;
use crate::{DoodleError, DoodleResult, Point, StrokeStyle, ToolMode};

/// Bytes per RGBA pixel.
const BYTES_PER_PIXEL: usize = 4;

/// An RGBA pixel as stored (premultiplied alpha).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Pixel {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };
}

/// A resizable pixel buffer that strokes are painted onto.
#[derive(Clone)]
pub struct Surface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.data() == other.data()
    }
}

impl Surface {
    /// Create a blank surface.
    ///
    /// # Errors
    ///
    /// Returns [`DoodleError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> DoodleResult<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(DoodleError::InvalidDimensions { width, height })?;
        Ok(Self { pixmap })
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA bytes, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Read one pixel, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        // Pixmap::pixel only checks the flat index, so x == width wraps to the next row
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixmap.pixel(x, y).map(|p| Pixel {
            r: p.red(),
            g: p.green(),
            b: p.blue(),
            a: p.alpha(),
        })
    }

    /// True when every pixel is transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.data().iter().all(|&byte| byte == 0)
    }

    /// Resize the buffer, keeping the visible content anchored at the origin.
    ///
    /// The current raster is captured, a new buffer is allocated, and the
    /// capture is written back at (0, 0) before this returns. Growing keeps
    /// every pixel; shrinking crops whatever falls outside the new bounds.
    /// Returns `Ok(false)` when the dimensions did not change.
    ///
    /// # Errors
    ///
    /// Returns [`DoodleError::InvalidDimensions`] for a zero dimension. The
    /// surface is left untouched in that case.
    pub fn resize(&mut self, width: u32, height: u32) -> DoodleResult<bool> {
        if width == self.width() && height == self.height() {
            return Ok(false);
        }

        let mut resized =
            Pixmap::new(width, height).ok_or(DoodleError::InvalidDimensions { width, height })?;

        let captured = &self.pixmap;
        let copy_rows = captured.height().min(height) as usize;
        let copy_bytes = captured.width().min(width) as usize * BYTES_PER_PIXEL;
        let src_stride = captured.width() as usize * BYTES_PER_PIXEL;
        let dst_stride = width as usize * BYTES_PER_PIXEL;

        let src = captured.data();
        let dst = resized.data_mut();
        for row in 0..copy_rows {
            let s = row * src_stride;
            let d = row * dst_stride;
            dst[d..d + copy_bytes].copy_from_slice(&src[s..s + copy_bytes]);
        }

        tracing::debug!(
            "Surface resized {}x{} -> {}x{}",
            captured.width(),
            captured.height(),
            width,
            height
        );
        self.pixmap = resized;
        Ok(true)
    }

    /// Erase everything after the user confirms.
    ///
    /// Declining leaves the surface untouched. Accepting clears it whether or
    /// not the round is locked.
    pub fn clear(&mut self, confirm: &mut dyn Confirm) -> Decision {
        if !confirm.confirm(&Prompt::ClearCanvas) {
            tracing::debug!("Clear declined");
            return Decision::Declined;
        }
        self.erase_all();
        tracing::debug!("Surface cleared");
        Decision::Accepted
    }

    /// Erase everything without asking.
    pub(crate) fn erase_all(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Paint one round-capped segment with the given style.
    ///
    /// Pen strokes composite source-over. Eraser strokes composite
    /// destination-out, removing alpha from whatever is already there.
    pub fn paint_segment(&mut self, from: Point, to: Point, style: &StrokeStyle) {
        let paint = paint_for(style);

        // A zero-length segment still leaves a round dot, as the line cap would.
        if (from.x - to.x).abs() < f32::EPSILON && (from.y - to.y).abs() < f32::EPSILON {
            if let Some(dot) = PathBuilder::from_circle(to.x, to.y, style.width() / 2.0) {
                self.pixmap
                    .fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
            return;
        }

        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let stroke = Stroke {
            width: style.width(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    /// Deep-copy the current raster into an encoded image blob.
    ///
    /// # Errors
    ///
    /// Returns [`DoodleError::Snapshot`] if PNG encoding fails.
    pub fn snapshot(&self) -> DoodleResult<Snapshot> {
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| DoodleError::Snapshot(e.to_string()))?;
        Ok(Snapshot::new(self.width(), self.height(), png))
    }
}

fn paint_for(style: &StrokeStyle) -> Paint<'static> {
    let color = style.color();
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint.blend_mode = match style.mode() {
        ToolMode::Pen => BlendMode::SourceOver,
        ToolMode::Eraser => BlendMode::DestinationOut,
    };
    paint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, AlwaysDecline};
    use crate::Rgb;

    fn red_pen(width: f32) -> StrokeStyle {
        StrokeStyle::new(Rgb::new(255, 0, 0), width, ToolMode::Pen)
    }

    fn scribbled(width: u32, height: u32) -> Surface {
        let mut surface = Surface::new(width, height).expect("surface");
        surface.paint_segment(Point::new(2.0, 2.0), Point::new(18.0, 12.0), &red_pen(3.0));
        surface
    }

    #[test]
    fn test_new_surface_is_blank() {
        let surface = Surface::new(16, 8).expect("surface");
        assert!(surface.is_blank());
        assert_eq!(surface.width(), 16);
        assert_eq!(surface.height(), 8);
        assert_eq!(surface.pixel(0, 0), Some(Pixel::TRANSPARENT));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn test_pixel_past_right_edge_does_not_wrap() {
        let mut surface = Surface::new(16, 8).expect("surface");
        // A dot at the start of row 3, which row 2 would wrap onto
        surface.paint_segment(Point::new(1.0, 3.5), Point::new(1.0, 3.5), &red_pen(2.0));
        assert!(surface.pixel(0, 3).is_some_and(|p| p.a > 0));
        assert_eq!(surface.pixel(16, 2), None);
        assert_eq!(surface.pixel(0, 8), None);
        assert_eq!(surface.pixel(u32::MAX, 0), None);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Surface::new(0, 10),
            Err(DoodleError::InvalidDimensions {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_pen_segment_paints_color() {
        let mut surface = Surface::new(20, 20).expect("surface");
        surface.paint_segment(Point::new(2.0, 10.0), Point::new(18.0, 10.0), &red_pen(4.0));

        let px = surface.pixel(10, 10).expect("pixel");
        assert_eq!(px.a, 255);
        assert_eq!(px.r, 255);
        assert_eq!(px.g, 0);
        assert!(!surface.is_blank());
    }

    #[test]
    fn test_zero_length_segment_leaves_a_dot() {
        let mut surface = Surface::new(20, 20).expect("surface");
        let p = Point::new(10.0, 10.0);
        surface.paint_segment(p, p, &red_pen(6.0));
        assert_eq!(surface.pixel(10, 10).map(|px| px.a), Some(255));
    }

    #[test]
    fn test_eraser_removes_pixels_instead_of_painting_white() {
        let mut surface = Surface::new(20, 20).expect("surface");
        surface.paint_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), &red_pen(8.0));
        assert_eq!(surface.pixel(10, 10).map(|px| px.a), Some(255));

        let eraser = StrokeStyle::new(Rgb::new(255, 255, 255), 8.0, ToolMode::Eraser);
        surface.paint_segment(Point::new(0.0, 10.0), Point::new(20.0, 10.0), &eraser);

        assert_eq!(surface.pixel(10, 10), Some(Pixel::TRANSPARENT));
    }

    #[test]
    fn test_resize_larger_preserves_content_at_origin() {
        let mut surface = scribbled(20, 16);
        let before = surface.clone();

        assert!(surface.resize(40, 30).expect("resize"));
        assert_eq!(surface.width(), 40);
        assert_eq!(surface.height(), 30);

        for y in 0..before.height() {
            for x in 0..before.width() {
                assert_eq!(surface.pixel(x, y), before.pixel(x, y), "pixel ({x}, {y})");
            }
        }
        for y in 0..30 {
            for x in 20..40 {
                assert_eq!(surface.pixel(x, y), Some(Pixel::TRANSPARENT));
            }
        }
    }

    #[test]
    fn test_resize_smaller_crops() {
        let mut surface = scribbled(20, 16);
        let before = surface.clone();

        surface.resize(10, 8).expect("resize");
        for y in 0..8 {
            for x in 0..10 {
                assert_eq!(surface.pixel(x, y), before.pixel(x, y));
            }
        }
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let mut surface = scribbled(20, 16);
        let before = surface.clone();
        assert!(!surface.resize(20, 16).expect("resize"));
        assert_eq!(surface, before);
    }

    #[test]
    fn test_resize_to_zero_keeps_surface() {
        let mut surface = scribbled(20, 16);
        let before = surface.clone();
        assert!(surface.resize(0, 16).is_err());
        assert_eq!(surface, before);
    }

    #[test]
    fn test_clear_declined_is_pixel_identical() {
        let mut surface = scribbled(20, 16);
        let before = surface.clone();

        assert_eq!(surface.clear(&mut AlwaysDecline), Decision::Declined);
        assert_eq!(surface.data(), before.data());
    }

    #[test]
    fn test_clear_accepted_is_blank() {
        let mut surface = scribbled(20, 16);
        assert_eq!(surface.clear(&mut AlwaysConfirm), Decision::Accepted);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_clear_asks_about_the_canvas() {
        let mut surface = scribbled(20, 16);
        let mut asked = Vec::new();
        let mut confirm = |prompt: &Prompt| {
            asked.push(*prompt);
            false
        };
        surface.clear(&mut confirm);
        assert_eq!(asked, vec![Prompt::ClearCanvas]);
    }
}
