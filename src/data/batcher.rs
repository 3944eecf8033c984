// ============================================================
// Layer 4 — Glyph Batcher
// ============================================================
// Implements Burn's Batcher trait to stack a Vec<GlyphSample>
// into tensors the CNN can consume.
//
// How batching works here:
//   Input:  N samples, each 28·28 bytes + one label
//   Output: images  [N, 1, 28, 28]  float, scaled to [0, 1]
//           targets [N, 62]         float, one-hot
//           labels  [N]             int, for accuracy
//
// Pixels of all samples are flattened into one Vec and reshaped,
// the same trick as stacking token sequences.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::{dataset::{GlyphSample, GLYPH_SIDE}, preprocessor::Preprocessor};

// ─── GlyphBatch ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct GlyphBatch<B: Backend> {
    /// Normalised single-channel images — shape: [batch, 1, 28, 28]
    pub images: Tensor<B, 4>,

    /// One-hot class targets — shape: [batch, num_classes]
    pub targets: Tensor<B, 2>,

    /// Integer class labels — shape: [batch]
    pub labels: Tensor<B, 1, Int>,
}

// ─── GlyphBatcher ─────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right
/// GPU/CPU, plus the preprocessor that knows the class count.
#[derive(Clone, Debug)]
pub struct GlyphBatcher<B: Backend> {
    pub device:       B::Device,
    pub preprocessor: Preprocessor,
}

impl<B: Backend> GlyphBatcher<B> {
    pub fn new(device: B::Device, preprocessor: Preprocessor) -> Self {
        Self { device, preprocessor }
    }
}

impl<B: Backend> Batcher<GlyphSample, GlyphBatch<B>> for GlyphBatcher<B> {
    fn batch(&self, items: Vec<GlyphSample>) -> GlyphBatch<B> {
        let batch_size  = items.len();
        let num_classes = self.preprocessor.num_classes();

        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|s| self.preprocessor.normalize(&s.pixels))
            .collect();

        let one_hot: Vec<f32> = items
            .iter()
            .flat_map(|s| self.preprocessor.one_hot(usize::from(s.label)))
            .collect();

        let labels: Vec<i32> = items
            .iter()
            .map(|s| i32::from(s.label))
            .collect();

        let images = Tensor::<B, 1>::from_floats(pixels.as_slice(), &self.device)
            .reshape([batch_size, 1, GLYPH_SIDE, GLYPH_SIDE]);

        let targets = Tensor::<B, 1>::from_floats(one_hot.as_slice(), &self.device)
            .reshape([batch_size, num_classes]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        GlyphBatch { images, targets, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device = Default::default();
        let batcher = GlyphBatcher::<TestBackend>::new(device, Preprocessor::new(62));
        let items = vec![
            GlyphSample { pixels: vec![255; GLYPH_SIDE * GLYPH_SIDE], label: 3 },
            GlyphSample { pixels: vec![0; GLYPH_SIDE * GLYPH_SIDE], label: 61 },
        ];

        let batch = batcher.batch(items);
        assert_eq!(batch.images.dims(), [2, 1, 28, 28]);
        assert_eq!(batch.targets.dims(), [2, 62]);
        assert_eq!(batch.labels.dims(), [2]);

        let max: f32 = batch.images.clone().max().into_scalar().elem();
        let min: f32 = batch.images.min().into_scalar().elem();
        assert_eq!((min, max), (0.0, 1.0));

        let targets = batch.targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(targets[3], 1.0);
        assert_eq!(targets[62 + 61], 1.0);
        assert_eq!(targets.iter().sum::<f32>(), 2.0);

        let labels = batch.labels.into_data().to_vec::<i64>().unwrap();
        assert_eq!(labels, vec![3, 61]);
    }
}
