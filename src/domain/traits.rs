// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The reconstructor only needs "something that turns a glyph
// into a class index". Programming against this trait keeps
// the domain layer free of Burn types and lets tests drive the
// reconstruction logic with a scripted classifier.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::path::Path;

use image::GrayImage;

use crate::error::OcrResult;

// ─── GlyphClassifier ──────────────────────────────────────────────────────────
/// Any component that can label a single segmented glyph.
///
/// Implementations:
///   - Inferencer → the trained CNN loaded from a checkpoint
pub trait GlyphClassifier {
    /// Classify a dark-on-white glyph as produced by the segmenter.
    /// Implementations apply their own input canonicalization.
    /// Returns the index into the label alphabet.
    fn classify(&self, glyph: &GrayImage) -> OcrResult<usize>;
}

// ─── TextRecognizer ───────────────────────────────────────────────────────────
/// Any component that can read a whole page image into text.
///
/// Implementations:
///   - RecognizeUseCase → segmenter + reconstructor + CNN
pub trait TextRecognizer {
    fn recognize(&self, image_path: &Path) -> anyhow::Result<String>;
}
