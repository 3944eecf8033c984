//! Glyph canvas normalisation.
//!
//! `image::imageops::resize` offers no area filter, so the area
//! resample used for shrinking is written out here as a
//! fractional-coverage box average. Enlarging along either axis goes
//! through `imageops::resize` with a bilinear (triangle) filter, since
//! box coverage of a small glyph degenerates to nearest-neighbour.

use image::{imageops::{self, FilterType}, GrayImage, Luma};

/// Background value used when padding a glyph to a square
pub const CANVAS_BACKGROUND: u8 = 255;

/// Pad `crop` to a white square of side `max(width, height)`,
/// centring it along the shorter axis. A square crop is returned as-is.
#[must_use = "returns a new GrayImage; the input is not modified"]
pub fn square_canvas(crop: &GrayImage) -> GrayImage {
    let (w, h) = crop.dimensions();
    if w == h {
        return crop.clone();
    }

    let side = w.max(h);
    let mut canvas = GrayImage::from_pixel(side, side, Luma([CANVAS_BACKGROUND]));
    let (x, y) = if w > h {
        (0, side / 2 - h / 2)
    } else {
        (side / 2 - w / 2, 0)
    };
    imageops::replace(&mut canvas, crop, i64::from(x), i64::from(y));
    canvas
}

/// Resample `src` to `out_w × out_h`. Shrinking averages every source
/// pixel weighted by how much of it falls inside each destination pixel;
/// enlarging interpolates bilinearly.
#[must_use = "returns a new GrayImage; the input is not modified"]
pub fn resize_area(src: &GrayImage, out_w: u32, out_h: u32) -> GrayImage {
    let (w, h) = src.dimensions();
    if (w, h) == (out_w, out_h) {
        return src.clone();
    }
    let mut dst = GrayImage::new(out_w, out_h);
    if w == 0 || h == 0 {
        return dst;
    }
    if w < out_w || h < out_h {
        return imageops::resize(src, out_w, out_h, FilterType::Triangle);
    }

    let sx = f64::from(w) / f64::from(out_w);
    let sy = f64::from(h) / f64::from(out_h);

    for oy in 0..out_h {
        let y0 = f64::from(oy) * sy;
        let y1 = y0 + sy;
        let rows = (y0.floor() as u32)..(y1.ceil() as u32).min(h);

        for ox in 0..out_w {
            let x0 = f64::from(ox) * sx;
            let x1 = x0 + sx;
            let cols = (x0.floor() as u32)..(x1.ceil() as u32).min(w);

            let mut acc  = 0.0f64;
            let mut area = 0.0f64;
            for y in rows.clone() {
                let cy = overlap(y0, y1, y);
                if cy <= 0.0 {
                    continue;
                }
                for x in cols.clone() {
                    let cx = overlap(x0, x1, x);
                    if cx <= 0.0 {
                        continue;
                    }
                    let weight = cx * cy;
                    acc  += weight * f64::from(src.get_pixel(x, y).0[0]);
                    area += weight;
                }
            }

            let value = if area > 0.0 { acc / area } else { 0.0 };
            dst.put_pixel(ox, oy, Luma([value.round().clamp(0.0, 255.0) as u8]));
        }
    }
    dst
}

/// Length of `[lo, hi)` covered by the unit cell starting at `cell`
#[inline]
fn overlap(lo: f64, hi: f64, cell: u32) -> f64 {
    let start = f64::from(cell);
    hi.min(start + 1.0) - lo.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_crop_is_unchanged() {
        let crop = GrayImage::from_fn(5, 5, |x, y| Luma([(x * 10 + y) as u8]));
        assert_eq!(square_canvas(&crop), crop);
    }

    #[test]
    fn test_wide_crop_is_centred_vertically() {
        let crop = GrayImage::from_pixel(6, 2, Luma([0]));
        let canvas = square_canvas(&crop);
        assert_eq!(canvas.dimensions(), (6, 6));
        // y_pos = 6/2 - 2/2 = 2 → rows 2 and 3 hold the crop
        for y in 0..6 {
            let expected = if (2..4).contains(&y) { 0 } else { CANVAS_BACKGROUND };
            assert_eq!(canvas.get_pixel(3, y).0[0], expected, "row {y}");
        }
    }

    #[test]
    fn test_tall_crop_is_centred_horizontally() {
        let crop = GrayImage::from_pixel(3, 9, Luma([0]));
        let canvas = square_canvas(&crop);
        assert_eq!(canvas.dimensions(), (9, 9));
        // x_pos = 9/2 - 3/2 = 3 → columns 3..6 hold the crop
        for x in 0..9 {
            let expected = if (3..6).contains(&x) { 0 } else { CANVAS_BACKGROUND };
            assert_eq!(canvas.get_pixel(x, 4).0[0], expected, "col {x}");
        }
    }

    #[test]
    fn test_downscale_averages_blocks() {
        // 4×4 → 2×2: each output pixel is the mean of a 2×2 block
        let src = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 0 } else { 200 }]));
        let dst = resize_area(&src, 2, 2);
        assert_eq!(dst.get_pixel(0, 0).0[0], 0);
        assert_eq!(dst.get_pixel(1, 0).0[0], 200);
        assert_eq!(dst.get_pixel(1, 1).0[0], 200);
    }

    #[test]
    fn test_uniform_image_stays_uniform_at_any_scale() {
        for &(w, h) in &[(3, 3), (57, 57), (100, 40), (13, 90)] {
            let src = GrayImage::from_pixel(w, h, Luma([123]));
            let dst = resize_area(&src, 28, 28);
            assert_eq!(dst.dimensions(), (28, 28));
            assert!(dst.pixels().all(|p| p.0[0] == 123), "{w}x{h}");
        }
    }

    #[test]
    fn test_upscale_interpolates_instead_of_repeating() {
        let src = GrayImage::from_fn(2, 1, |x, _| Luma([if x == 0 { 0 } else { 200 }]));
        let dst = resize_area(&src, 8, 1);
        assert_eq!(dst.dimensions(), (8, 1));
        let between = dst.pixels().filter(|p| p.0[0] > 0 && p.0[0] < 200).count();
        assert!(between >= 2, "{:?}", dst.as_raw());
        // monotone ramp from dark to light
        assert!(dst.as_raw().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_fractional_downscale_mixes_edge_pixels() {
        // 3 → 2 columns: output column 0 covers src [0, 1.5)
        let src = GrayImage::from_fn(3, 1, |x, _| Luma([[0, 100, 200][x as usize]]));
        let dst = resize_area(&src, 2, 1);
        // (1.0 * 0 + 0.5 * 100) / 1.5 = 33.3
        assert_eq!(dst.get_pixel(0, 0).0[0], 33);
        // (0.5 * 100 + 1.0 * 200) / 1.5 = 166.7
        assert_eq!(dst.get_pixel(1, 0).0[0], 167);
    }
}
