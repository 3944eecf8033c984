//! Bounding-box overlay for eyeballing segmentation results.
//!
//! Purely diagnostic: failures are logged and swallowed, and nothing
//! here feeds back into the returned glyphs.

use std::path::Path;

use image::{DynamicImage, Rgb};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::domain::glyph::GlyphCandidate;

const BOX_COLOR: Rgb<u8> = Rgb([0, 0, 70]);

/// Draw one rectangle per glyph on a copy of `page` and save it to `out`.
pub fn render_boxes(page: &DynamicImage, glyphs: &[GlyphCandidate], out: &Path) {
    let mut canvas = page.to_rgb8();
    for g in glyphs {
        let rect = Rect::at(g.x_offset as i32, g.y_offset as i32).of_size(g.width, g.height);
        draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
    }

    match canvas.save(out) {
        Ok(()) => tracing::info!("Wrote {} glyph boxes to '{}'", glyphs.len(), out.display()),
        Err(e) => tracing::warn!("Skipping debug overlay '{}': {}", out.display(), e),
    }
}
