// ============================================================
// Layer 4 — EMNIST Dataset Loader
// ============================================================
// Reads the EMNIST "byclass" split from IDX files.
//
// IDX layout (all integers big-endian):
//   byte 0-1   zero
//   byte 2     element type (0x08 = unsigned byte)
//   byte 3     number of dimensions D
//   next 4·D   one u32 per dimension
//   rest       the raw elements, row-major
//
// Images use D = 3 (count, rows, cols), labels D = 1 (count).
//
// File naming convention:
//   data/mnist/
//     emnist-byclass-train-images-idx3-ubyte
//     emnist-byclass-train-labels-idx1-ubyte
//     emnist-byclass-test-images-idx3-ubyte
//     emnist-byclass-test-labels-idx1-ubyte
//
// Any problem reading or parsing a file is fatal: training must
// never start on partial data.

use std::{fs, path::{Path, PathBuf}};

use crate::data::dataset::{GlyphDataset, GLYPH_SIDE};
use crate::error::{OcrError, OcrResult};

const IDX_TYPE_UBYTE: u8 = 0x08;

/// Which half of the dataset to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test  => "test",
        }
    }
}

/// A stack of equally sized 8-bit images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxImages {
    pub count:  usize,
    pub rows:   usize,
    pub cols:   usize,
    /// `count * rows * cols` bytes, image after image
    pub pixels: Vec<u8>,
}

impl IdxImages {
    pub fn pixels_per_image(&self) -> usize {
        self.rows * self.cols
    }

    pub fn image(&self, index: usize) -> Option<&[u8]> {
        let n = self.pixels_per_image();
        self.pixels.get(index * n..(index + 1) * n)
    }
}

/// Loads the EMNIST byclass train and test splits from one directory.
pub struct EmnistLoader {
    dir:         PathBuf,
    num_classes: usize,
}

impl EmnistLoader {
    pub fn new(dir: impl Into<PathBuf>, num_classes: usize) -> Self {
        Self { dir: dir.into(), num_classes }
    }

    pub fn images_path(&self, split: Split) -> PathBuf {
        self.dir.join(format!("emnist-byclass-{}-images-idx3-ubyte", split.name()))
    }

    pub fn labels_path(&self, split: Split) -> PathBuf {
        self.dir.join(format!("emnist-byclass-{}-labels-idx1-ubyte", split.name()))
    }

    /// Load one split as a dataset, checking that every label is in range
    /// and that images and labels pair up one to one.
    pub fn load(&self, split: Split) -> OcrResult<GlyphDataset> {
        let images_path = self.images_path(split);
        let labels_path = self.labels_path(split);

        let images = read_images(&images_path)?;
        let labels = read_labels(&labels_path)?;

        if images.rows != GLYPH_SIDE || images.cols != GLYPH_SIDE {
            return Err(OcrError::dataset(
                &images_path,
                format!("images are {}x{}, expected {GLYPH_SIDE}x{GLYPH_SIDE}", images.rows, images.cols),
            ));
        }
        if images.count != labels.len() {
            return Err(OcrError::dataset(
                &labels_path,
                format!("{} labels for {} images", labels.len(), images.count),
            ));
        }
        if let Some(bad) = labels.iter().find(|&&l| usize::from(l) >= self.num_classes) {
            return Err(OcrError::dataset(
                &labels_path,
                format!("label {bad} outside {} classes", self.num_classes),
            ));
        }

        tracing::info!(
            "Loaded {} split: {} images of {}x{}",
            split.name(), images.count, images.rows, images.cols
        );
        Ok(GlyphDataset::new(images, labels))
    }
}

/// Read a 3-D unsigned-byte IDX file.
pub fn read_images(path: &Path) -> OcrResult<IdxImages> {
    let bytes = fs::read(path).map_err(|e| OcrError::dataset(path, e.to_string()))?;
    let (dims, data) = parse_idx(&bytes).map_err(|reason| OcrError::dataset(path, reason))?;
    match dims.as_slice() {
        &[count, rows, cols] => Ok(IdxImages { count, rows, cols, pixels: data.to_vec() }),
        other => Err(OcrError::dataset(
            path,
            format!("expected 3 dimensions for images, found {}", other.len()),
        )),
    }
}

/// Read a 1-D unsigned-byte IDX file.
pub fn read_labels(path: &Path) -> OcrResult<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| OcrError::dataset(path, e.to_string()))?;
    let (dims, data) = parse_idx(&bytes).map_err(|reason| OcrError::dataset(path, reason))?;
    if dims.len() != 1 {
        return Err(OcrError::dataset(
            path,
            format!("expected 1 dimension for labels, found {}", dims.len()),
        ));
    }
    Ok(data.to_vec())
}

/// Split an IDX buffer into its dimensions and element bytes.
pub fn parse_idx(bytes: &[u8]) -> Result<(Vec<usize>, &[u8]), String> {
    let header = bytes.get(..4).ok_or("file shorter than IDX header")?;
    if header[0] != 0 || header[1] != 0 {
        return Err(format!("bad magic {:02x}{:02x}", header[0], header[1]));
    }
    if header[2] != IDX_TYPE_UBYTE {
        return Err(format!("unsupported element type 0x{:02x}", header[2]));
    }

    let ndims = usize::from(header[3]);
    let dims_end = 4 + 4 * ndims;
    let dims_bytes = bytes.get(4..dims_end).ok_or("truncated dimension table")?;
    let dims: Vec<usize> = dims_bytes
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) as usize)
        .collect();

    let expected = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| format!("shape {dims:?} overflows the addressable size"))?;
    let data = &bytes[dims_end..];
    if data.len() != expected {
        return Err(format!(
            "expected {expected} data bytes for shape {dims:?}, found {}",
            data.len()
        ));
    }
    Ok((dims, data))
}

/// Encode `data` with shape `dims` as an unsigned-byte IDX buffer.
#[cfg(test)]
pub fn encode_idx(dims: &[u32], data: &[u8]) -> Vec<u8> {
    let mut out = vec![0, 0, IDX_TYPE_UBYTE, dims.len() as u8];
    for d in dims {
        out.extend_from_slice(&d.to_be_bytes());
    }
    out.extend_from_slice(data);
    out
}
