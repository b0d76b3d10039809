//! Encoded copies of the drawing surface.

use std::fmt;

use base64::Engine;
use tiny_skia::Pixmap;

use crate::surface::Surface;
use crate::{DoodleError, DoodleResult};

/// An immutable PNG-encoded copy of a surface.
///
/// Snapshots own their bytes, so later drawing on the surface they were
/// taken from can never alter them.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl Snapshot {
    pub(crate) fn new(width: u32, height: u32, png: Vec<u8>) -> Self {
        Self { width, height, png }
    }

    /// Width of the captured surface.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the captured surface.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The encoded PNG bytes.
    #[must_use]
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Encode as a `data:image/png;base64,...` URI for embedding.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.png);
        format!("data:image/png;base64,{encoded}")
    }

    /// Decode back into a surface for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`DoodleError::Snapshot`] if the bytes are not a valid PNG.
    pub fn decode(&self) -> DoodleResult<Surface> {
        Pixmap::decode_png(&self.png)
            .map(Surface::from_pixmap)
            .map_err(|e| DoodleError::Snapshot(format!("Failed to decode snapshot: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Rgb, StrokeStyle, ToolMode};

    #[test]
    fn test_snapshot_decodes_to_same_pixels() {
        let mut surface = Surface::new(12, 12).expect("surface");
        let style = StrokeStyle::new(Rgb::new(0, 0, 255), 2.0, ToolMode::Pen);
        surface.paint_segment(Point::new(1.0, 6.0), Point::new(11.0, 6.0), &style);

        let snapshot = surface.snapshot().expect("snapshot");
        assert_eq!(snapshot.width(), 12);
        assert_eq!(snapshot.height(), 12);

        let decoded = snapshot.decode().expect("decode");
        assert_eq!(decoded.pixel(6, 6), surface.pixel(6, 6));
        assert_eq!(decoded.pixel(0, 0), surface.pixel(0, 0));
    }

    #[test]
    fn test_snapshot_is_independent_of_later_drawing() {
        let mut surface = Surface::new(12, 12).expect("surface");
        let snapshot = surface.snapshot().expect("snapshot");

        let style = StrokeStyle::default();
        surface.paint_segment(Point::new(0.0, 0.0), Point::new(12.0, 12.0), &style);

        assert!(snapshot.decode().expect("decode").is_blank());
    }

    #[test]
    fn test_data_uri_prefix() {
        let surface = Surface::new(4, 4).expect("surface");
        let uri = surface.snapshot().expect("snapshot").to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let bogus = Snapshot::new(1, 1, vec![1, 2, 3]);
        assert!(matches!(bogus.decode(), Err(DoodleError::Snapshot(_))));
    }
}
