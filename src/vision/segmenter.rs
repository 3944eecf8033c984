//! Glyph segmentation.
//!
//! Page → grayscale → fixed binary threshold → one 3×3 erosion →
//! contour hierarchy → one glyph per child of the page contour.
//!
//! After thresholding, the white paper is foreground and the ink is a
//! set of holes in it. The page therefore shows up as a single outer
//! border (the *root*), and every character outline is a hole border
//! whose parent is that root. The root is the first top-level outer
//! contour that either spans the whole image, or has holes and encloses
//! every other top-level contour (a page inside a dark scanner frame).
//! When no such root exists (for example light ink on a dark page)
//! every top-level contour is treated as a candidate instead.

use std::path::{Path, PathBuf};

use image::{imageops, GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::distance_transform::Norm;
use imageproc::morphology::erode;

use crate::domain::glyph::GlyphCandidate;
use crate::error::{OcrError, OcrResult};
use crate::vision::{debug, resize};

#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Pixels strictly brighter than this become paper (255)
    pub threshold: u8,

    /// Side length of every emitted glyph image
    pub out_size: u32,

    /// When set, a bounding-box overlay is written here
    pub debug_output: Option<PathBuf>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self { threshold: 127, out_size: 28, debug_output: None }
    }
}

/// Axis-aligned bounding box in page pixels (inclusive extent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    fn spans(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }

    fn contains(&self, other: &BoundingBox) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Decode the page at `path` and extract its glyphs, sorted left to right.
pub fn extract_glyphs(path: impl AsRef<Path>, cfg: &SegmenterConfig) -> OcrResult<Vec<GlyphCandidate>> {
    let path = path.as_ref();
    let page = image::open(path).map_err(|source| OcrError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let glyphs = segment(&page.to_luma8(), cfg);
    tracing::info!("Segmented {} glyphs from '{}'", glyphs.len(), path.display());

    if let Some(out) = &cfg.debug_output {
        debug::render_boxes(&page, &glyphs, out);
    }
    Ok(glyphs)
}

/// Segment an already-decoded grayscale page.
pub fn segment(gray: &GrayImage, cfg: &SegmenterConfig) -> Vec<GlyphCandidate> {
    let binary   = threshold_binary(gray, cfg.threshold);
    let eroded   = erode(&binary, Norm::LInf, 1);
    let contours = find_contours::<i32>(&eroded);

    let (width, height) = gray.dimensions();
    let boxes = candidate_boxes(&contours, width, height);
    tracing::debug!("{} contours, {} glyph candidates", contours.len(), boxes.len());

    let mut glyphs: Vec<GlyphCandidate> = boxes
        .into_iter()
        .map(|b| normalize_glyph(gray, b, cfg.out_size))
        .collect();

    // Stable, so glyphs sharing a column keep discovery order
    glyphs.sort_by_key(|g| g.x_offset);
    glyphs
}

/// Load a single pre-cropped glyph image and resize it straight to
/// `out_size × out_size` without padding.
pub fn load_glyph_image(path: impl AsRef<Path>, out_size: u32) -> OcrResult<GrayImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| OcrError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(resize::resize_area(&img.to_luma8(), out_size, out_size))
}

/// All pixels > `thresh` become 255, others become 0.
#[must_use = "returns a new GrayImage; the input is not modified"]
pub fn threshold_binary(gray: &GrayImage, thresh: u8) -> GrayImage {
    let mut out = gray.clone();
    for p in out.pixels_mut() {
        *p = Luma([if p.0[0] > thresh { 255 } else { 0 }]);
    }
    out
}

/// Bounding boxes of the contours that represent glyphs.
pub fn candidate_boxes(contours: &[Contour<i32>], width: u32, height: u32) -> Vec<BoundingBox> {
    let boxes: Vec<Option<BoundingBox>> = contours.iter().map(bounding_box).collect();

    let mut has_holes = vec![false; contours.len()];
    for c in contours {
        if let Some(p) = c.parent {
            has_holes[p] = true;
        }
    }

    let top_level: Vec<usize> = (0..contours.len()).filter(|&i| contours[i].parent.is_none()).collect();

    let encloses_others = |i: usize, b: &BoundingBox| {
        top_level
            .iter()
            .filter(|&&j| j != i)
            .all(|&j| matches!(&boxes[j], Some(o) if b.contains(o)))
    };

    let root = top_level.iter().copied().find(|&i| {
        matches!(contours[i].border_type, BorderType::Outer)
            && match &boxes[i] {
                Some(b) => b.spans(width, height) || (has_holes[i] && encloses_others(i, b)),
                None    => false,
            }
    });

    contours
        .iter()
        .zip(boxes)
        .filter(|(c, _)| match root {
            Some(r) => c.parent == Some(r),
            None    => c.parent.is_none(),
        })
        .filter_map(|(_, b)| b)
        .collect()
}

fn bounding_box(contour: &Contour<i32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in &contour.points[1..] {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox {
        x: min_x.max(0) as u32,
        y: min_y.max(0) as u32,
        width:  (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    })
}

/// Crop the box from the grayscale page, pad it to a white square and
/// resample it to the classifier's input size.
fn normalize_glyph(gray: &GrayImage, b: BoundingBox, out_size: u32) -> GlyphCandidate {
    let crop   = imageops::crop_imm(gray, b.x, b.y, b.width, b.height).to_image();
    let square = resize::square_canvas(&crop);
    let image  = resize::resize_area(&square, out_size, out_size);
    GlyphCandidate::new(b.x, b.y, b.width, b.height, image)
}
