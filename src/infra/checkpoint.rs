// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Persists the trained classifier artifact.
//
// What gets saved, once, after training finishes:
//   1. Model weights (.mpk.gz file) — all learned parameters
//   2. train_config.json            — hyperparameters, including
//                                     the network variant and
//                                     class count
//
// The config is needed at load time to rebuild the exact
// architecture before the weights are loaded into it.
//
// File naming convention:
//   checkpoints/
//     emnist_letters.mpk.gz   ← final weights
//     train_config.json       ← architecture + hyperparameters
//     metrics.csv             ← written by MetricsLogger
//
// Weights are stored at full precision so a reloaded model
// reproduces the in-memory model's predictions exactly.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkGzFileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::error::{OcrError, OcrResult};
use crate::ml::model::GlyphCnn;

type ArtifactRecorder = NamedMpkGzFileRecorder<FullPrecisionSettings>;

const MODEL_STEM:  &str = "emnist_letters";
const CONFIG_FILE: &str = "train_config.json";

/// Manages saving and loading of the classifier artifact.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Path without extension — the recorder appends `.mpk.gz`
    fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_STEM)
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Save the final model weights.
    pub fn save_model<B: Backend>(&self, model: &GlyphCnn<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.model_path();
        ArtifactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::info!("Saved model weights to '{}.mpk.gz'", path.display());
        Ok(())
    }

    /// Load weights into `model`, which must already have the saved
    /// architecture (see `load_config`).
    pub fn load_model<B: Backend>(
        &self,
        model:  GlyphCnn<B>,
        device: &B::Device,
    ) -> OcrResult<GlyphCnn<B>> {
        let path = self.model_path();
        let record = ArtifactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| {
                OcrError::artifact(
                    &path,
                    format!("{e:?}. Have you trained the model first?"),
                )
            })?;

        tracing::info!("Loaded model weights from '{}'", path.display());
        Ok(model.load_record(record))
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.config_path();
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration from JSON.
    pub fn load_config(&self) -> OcrResult<TrainConfig> {
        let path = self.config_path();
        let json = fs::read_to_string(&path).map_err(|e| {
            OcrError::artifact(&path, format!("{e}. Make sure you have run 'train' first."))
        })?;
        serde_json::from_str(&json).map_err(|e| OcrError::artifact(&path, e.to_string()))
    }
}
