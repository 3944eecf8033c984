//! Error taxonomy for the OCR pipeline.
//!
//! Every variant is fatal to the operation that raised it: the library
//! layers return `OcrResult`, the application and CLI layers wrap it in
//! `anyhow` and abort the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    /// The input path could not be opened or decoded as a raster image
    #[error("cannot load image '{path}': {source}")]
    ImageLoad {
        path:   PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A dataset file is missing, truncated or not in IDX format
    #[error("cannot load dataset file '{path}': {reason}")]
    DatasetLoad { path: PathBuf, reason: String },

    /// The persisted classifier (weights or config) is missing or corrupt
    #[error("cannot load classifier artifact '{path}': {reason}")]
    ArtifactLoad { path: PathBuf, reason: String },

    /// The classifier produced an index outside the label alphabet
    #[error("class index {0} is outside the label alphabet")]
    UnknownClass(usize),
}

impl OcrError {
    pub fn dataset(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DatasetLoad { path: path.into(), reason: reason.into() }
    }

    pub fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ArtifactLoad { path: path.into(), reason: reason.into() }
    }
}

pub type OcrResult<T> = Result<T, OcrError>;
