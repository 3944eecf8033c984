use burn::data::dataset::Dataset;

use crate::data::loader::IdxImages;

/// Side length of every training and inference glyph
pub const GLYPH_SIDE: usize = 28;

/// One raw training example: 8-bit pixels in EMNIST orientation
/// (light ink on black, transposed) and its class index.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphSample {
    pub pixels: Vec<u8>,
    pub label:  u8,
}

/// Images and labels of one split, paired by index.
#[derive(Debug)]
pub struct GlyphDataset {
    images: IdxImages,
    labels: Vec<u8>,
}

impl GlyphDataset {
    /// `images.count` must equal `labels.len()`; the loader checks this.
    pub fn new(images: IdxImages, labels: Vec<u8>) -> Self {
        debug_assert_eq!(images.count, labels.len());
        Self { images, labels }
    }

    /// Build a dataset from already-decoded samples (all the same size).
    pub fn from_samples(samples: Vec<GlyphSample>) -> Self {
        let count  = samples.len();
        let pixels = samples.iter().flat_map(|s| s.pixels.iter().copied()).collect();
        let labels = samples.iter().map(|s| s.label).collect();
        let images = IdxImages { count, rows: GLYPH_SIDE, cols: GLYPH_SIDE, pixels };
        Self { images, labels }
    }

    /// Keep only the first `len` samples.
    pub fn truncate(mut self, len: usize) -> Self {
        let len = len.min(self.labels.len());
        self.labels.truncate(len);
        self.images.pixels.truncate(len * self.images.pixels_per_image());
        self.images.count = len;
        self
    }

    pub fn sample_count(&self) -> usize { self.labels.len() }
}

impl Dataset<GlyphSample> for GlyphDataset {
    fn get(&self, index: usize) -> Option<GlyphSample> {
        let label  = *self.labels.get(index)?;
        let pixels = self.images.image(index)?.to_vec();
        Some(GlyphSample { pixels, label })
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}
