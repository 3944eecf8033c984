//! Input canonicalization.
//!
//! EMNIST stores every glyph transposed and as light ink on a dark
//! background. Segmented glyphs are dark ink on white paper in page
//! orientation. Before a segmented glyph reaches the network it must be:
//!
//! 1. rotated 90° clockwise,
//! 2. flipped left-right (1 + 2 together are a transpose),
//! 3. inverted and scaled, `v ↦ 1 - v / 255`.
//!
//! The result is a row-major `f32` buffer of the glyph's pixel count,
//! ready to reshape into a `[1, 1, side, side]` tensor. Training data
//! is only scaled (see `data::preprocessor::normalize`), never
//! canonicalized, because it is already in this orientation.

use image::{imageops, GrayImage};

/// Map a dark-on-white page glyph into the classifier's input space.
pub fn canonicalize(glyph: &GrayImage) -> Vec<f32> {
    let oriented = imageops::flip_horizontal(&imageops::rotate90(glyph));
    oriented
        .pixels()
        .map(|p| 1.0 - f32::from(p.0[0]) / 255.0)
        .collect()
}
