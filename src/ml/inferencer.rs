// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Wraps a trained GlyphCnn for single-glyph prediction.
//
//   glyph (dark ink on white, any size)
//       → area-resize to 28×28 if needed
//       → canonicalize (transpose + invert, EMNIST orientation)
//       → softmax probabilities over the label alphabet
//       → argmax = class index
use std::path::Path;

use burn::prelude::*;
use image::GrayImage;

use crate::data::dataset::GLYPH_SIDE;
use crate::domain::traits::GlyphClassifier;
use crate::error::{OcrError, OcrResult};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::GlyphCnn;
use crate::ml::InferBackend;
use crate::vision::{canonical::canonicalize, resize::resize_area, segmenter::load_glyph_image};

const SIDE: u32 = GLYPH_SIDE as u32;

pub struct Inferencer<B: Backend = InferBackend> {
    model:       GlyphCnn<B>,
    num_classes: usize,
    device:      B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(model: GlyphCnn<B>, num_classes: usize, device: B::Device) -> Self {
        Self { model, num_classes, device }
    }

    /// Rebuild the architecture from the saved config, then load weights.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, device: B::Device) -> OcrResult<Self> {
        let cfg   = ckpt_manager.load_config()?;
        let model = cfg.model_config().init::<B>(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from '{}' ({:?})", ckpt_manager.dir().display(), cfg.variant);
        Ok(Self::new(model, cfg.num_classes, device))
    }

    /// Class probabilities for one glyph, indexed like the label alphabet.
    pub fn predict_probs(&self, glyph: &GrayImage) -> Vec<f32> {
        let resized;
        let glyph = if glyph.dimensions() == (SIDE, SIDE) {
            glyph
        } else {
            resized = resize_area(glyph, SIDE, SIDE);
            &resized
        };

        let input = canonicalize(glyph);
        let input = Tensor::<B, 1>::from_floats(input.as_slice(), &self.device)
            .reshape([1, 1, GLYPH_SIDE, GLYPH_SIDE]);

        self.model.forward_probs(input).into_data().iter::<f32>().collect()
    }

    /// Load a single pre-cropped glyph image from disk and classify it.
    pub fn classify_file(&self, path: impl AsRef<Path>) -> OcrResult<usize> {
        let glyph = load_glyph_image(path, SIDE)?;
        self.classify(&glyph)
    }
}

impl<B: Backend> GlyphClassifier for Inferencer<B> {
    fn classify(&self, glyph: &GrayImage) -> OcrResult<usize> {
        let probs = self.predict_probs(glyph);
        let (best, p) = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or(OcrError::UnknownClass(0))?;

        tracing::debug!("Glyph classified as {} (p={:.3})", best, p);
        if best >= self.num_classes {
            return Err(OcrError::UnknownClass(best));
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::ml::model::{ClassifierVariant, GlyphCnnConfig};
    use burn::backend::NdArray;
    use image::Luma;

    type TestBackend = NdArray;

    fn fresh_inferencer() -> Inferencer<TestBackend> {
        let device = Default::default();
        TestBackend::seed(3);
        let model = GlyphCnnConfig::new(62, ClassifierVariant::ThreeBlock).init(&device);
        Inferencer::new(model, 62, device)
    }

    fn bar_glyph(side: u32) -> GrayImage {
        GrayImage::from_fn(side, side, |x, _| if x > side / 3 && x < side / 2 { Luma([0]) } else { Luma([255]) })
    }

    #[test]
    fn test_probs_cover_alphabet_and_sum_to_one() {
        let inf = fresh_inferencer();
        let probs = inf.predict_probs(&bar_glyph(28));
        assert_eq!(probs.len(), 62);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_classify_is_argmax_of_probs() {
        let inf = fresh_inferencer();
        let glyph = bar_glyph(28);
        let probs = inf.predict_probs(&glyph);
        let k = inf.classify(&glyph).unwrap();
        assert!(probs.iter().all(|&p| p <= probs[k]));
    }

    #[test]
    fn test_other_sizes_are_resized() {
        let inf = fresh_inferencer();
        assert_eq!(inf.predict_probs(&bar_glyph(56)).len(), 62);
    }

    #[test]
    fn test_classify_file_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glyph.png");
        bar_glyph(28).save(&path).unwrap();

        let inf = fresh_inferencer();
        assert_eq!(inf.classify_file(&path).unwrap(), inf.classify(&bar_glyph(28)).unwrap());
    }

    #[test]
    fn test_from_checkpoint_restores_saved_model() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let cfg = TrainConfig { variant: ClassifierVariant::ThreeBlock, ..TrainConfig::default() };
        ckpt.save_config(&cfg).unwrap();

        let inf = fresh_inferencer();
        ckpt.save_model(&inf.model).unwrap();

        let loaded = Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default()).unwrap();
        let glyph = bar_glyph(28);
        assert_eq!(inf.predict_probs(&glyph), loaded.predict_probs(&glyph));
    }

    #[test]
    fn test_from_empty_dir_is_artifact_error() {
        let dir = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let result = Inferencer::<TestBackend>::from_checkpoint(&ckpt, Default::default());
        assert!(matches!(result, Err(OcrError::ArtifactLoad { .. })));
    }
}
