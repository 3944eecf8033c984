// ============================================================
// Layer 2 — Recognize Use Case
// ============================================================
// Reads handwriting from a page image:
//   1. Segment the page into glyphs, sorted left to right
//   2. Classify each glyph with the trained CNN
//   3. Join the characters, inserting spaces at wide gaps

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::{
    alphabet::LabelAlphabet,
    reconstructor::reconstruct,
    traits::{GlyphClassifier, TextRecognizer},
};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;
use crate::vision::segmenter::{extract_glyphs, SegmenterConfig};

pub struct RecognizeUseCase<C: GlyphClassifier = Inferencer> {
    classifier: C,
    segmenter:  SegmenterConfig,
    alphabet:   LabelAlphabet,
}

impl RecognizeUseCase<Inferencer> {
    /// Load the trained classifier from `checkpoint_dir`.
    pub fn new(checkpoint_dir: impl AsRef<Path>, segmenter: SegmenterConfig) -> Result<Self> {
        let ckpt = CheckpointManager::new(checkpoint_dir.as_ref());
        let inferencer = Inferencer::from_checkpoint(&ckpt, Default::default())
            .context("Loading the trained classifier")?;
        Ok(Self::with_classifier(inferencer, segmenter))
    }

    /// Classify a single pre-cropped glyph image.
    pub fn classify_file(&self, image_path: impl AsRef<Path>) -> Result<char> {
        let path  = image_path.as_ref();
        let class = self.classifier
            .classify_file(path)
            .with_context(|| format!("Classifying '{}'", path.display()))?;
        Ok(self.alphabet.char_at(class)?)
    }
}

impl<C: GlyphClassifier> RecognizeUseCase<C> {
    pub fn with_classifier(classifier: C, segmenter: SegmenterConfig) -> Self {
        Self { classifier, segmenter, alphabet: LabelAlphabet::default() }
    }
}

impl<C: GlyphClassifier> TextRecognizer for RecognizeUseCase<C> {
    fn recognize(&self, image_path: &Path) -> Result<String> {
        let glyphs = extract_glyphs(image_path, &self.segmenter)
            .with_context(|| format!("Segmenting '{}'", image_path.display()))?;
        tracing::info!("Found {} glyph candidates in '{}'", glyphs.len(), image_path.display());

        let text = reconstruct(&glyphs, &self.classifier, &self.alphabet)?;
        Ok(text)
    }
}
