// ============================================================
// Layer 4b — Vision Pipeline
// ============================================================
// Everything between a scanned page on disk and the 28×28
// glyphs the classifier consumes:
//
//   page image
//       │
//       ▼
//   segmenter   → threshold, erode, trace contours, crop boxes
//       │
//       ▼
//   resize      → square white canvas, area resample to 28×28
//       │
//       ▼
//   canonical   → invert + rotate/flip into training orientation
//
// Pixel work is delegated to the `image` and `imageproc`
// crates; only the glue that has no crate equivalent lives here.

/// Contour-based glyph extraction from a page image
pub mod segmenter;

/// Square canvas padding and area-interpolation resizing
pub mod resize;

/// Input canonicalization shared by every classifier entry point
pub mod canonical;

/// Optional bounding-box overlay for visual inspection
pub mod debug;
