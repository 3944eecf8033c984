// ============================================================
// Layer 3 — GlyphCandidate Domain Type
// ============================================================
// One bounding-box region that the segmenter believes holds a
// single character, already normalised to the classifier's
// square input size.
//
// Only the horizontal geometry matters to reconstruction;
// the vertical geometry is kept for the debug overlay.

use image::GrayImage;

#[derive(Debug, Clone)]
pub struct GlyphCandidate {
    /// Left edge of the bounding box in page pixels
    pub x_offset: u32,

    /// Top edge of the bounding box in page pixels
    pub y_offset: u32,

    /// Bounding-box width in page pixels
    pub width: u32,

    /// Bounding-box height in page pixels
    pub height: u32,

    /// Dark-on-white glyph resized to `out_size × out_size`
    pub image: GrayImage,
}

impl GlyphCandidate {
    pub fn new(x_offset: u32, y_offset: u32, width: u32, height: u32, image: GrayImage) -> Self {
        Self { x_offset, y_offset, width, height, image }
    }

    /// First column to the right of the box
    pub fn right_edge(&self) -> u32 {
        self.x_offset + self.width
    }

    /// Horizontal distance from this glyph's right edge to the next
    /// glyph's left edge. Negative when the boxes overlap.
    pub fn gap_to(&self, next: &GlyphCandidate) -> i64 {
        i64::from(next.x_offset) - i64::from(self.right_edge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(x: u32, w: u32) -> GlyphCandidate {
        GlyphCandidate::new(x, 0, w, 10, GrayImage::new(28, 28))
    }

    #[test]
    fn test_gap_between_separated_glyphs() {
        assert_eq!(glyph(10, 5).gap_to(&glyph(20, 5)), 5);
    }

    #[test]
    fn test_gap_is_negative_on_overlap() {
        assert_eq!(glyph(10, 8).gap_to(&glyph(15, 5)), -3);
    }
}
