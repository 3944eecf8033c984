// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load EMNIST train + test splits   (Layer 4 - data)
//   Step 2: Subsample both splits             (Layer 4 - data)
//   Step 3: Save config for inference         (Layer 6 - infra)
//   Step 4: Run training loop                 (Layer 5 - ml)
//   Step 5: Persist the final weights         (Layer 6 - infra)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::data::{
    loader::{EmnistLoader, Split},
    preprocessor::subsample_len,
};
use crate::domain::alphabet::LabelAlphabet;
use crate::error::OcrError;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    model::{ClassifierVariant, GlyphCnnConfig},
    scheduler::PlateauConfig,
    trainer::{run_training, TrainingReport},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run.
// Saved beside the weights so inference can rebuild the same network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:       PathBuf,
    pub checkpoint_dir: PathBuf,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    /// Keep the first len / subsample of each split (1 = everything)
    pub subsample:      usize,
    pub variant:        ClassifierVariant,
    pub plateau:        PlateauConfig,
    pub seed:           u64,
    pub num_classes:    usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:       PathBuf::from("data/mnist"),
            checkpoint_dir: PathBuf::from("checkpoints"),
            batch_size:     64,
            epochs:         30,
            lr:             1e-3,
            subsample:      10,
            variant:        ClassifierVariant::Shallow,
            plateau:        PlateauConfig::default(),
            seed:           42,
            num_classes:    LabelAlphabet::default().len(),
        }
    }
}

impl TrainConfig {
    pub fn model_config(&self) -> GlyphCnnConfig {
        GlyphCnnConfig::new(self.num_classes, self.variant)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingReport> {
        let cfg = &self.config;

        // ── Step 1: Load both splits ──────────────────────────────────────────
        tracing::info!("Loading EMNIST from '{}'", cfg.data_dir.display());
        let loader = EmnistLoader::new(&cfg.data_dir, cfg.num_classes);
        let train  = loader.load(Split::Train).context("Loading training split")?;
        let test   = loader.load(Split::Test).context("Loading test split")?;
        tracing::info!("Loaded {} training and {} test glyphs", train.sample_count(), test.sample_count());

        // ── Step 2: Subsample ─────────────────────────────────────────────────
        let train_len = subsample_len(train.sample_count(), cfg.subsample);
        let test_len  = subsample_len(test.sample_count(), cfg.subsample);
        if train_len == 0 {
            return Err(OcrError::dataset(
                loader.images_path(Split::Train),
                format!(
                    "{} training glyphs leave nothing to train on after subsampling by {}",
                    train.sample_count(),
                    cfg.subsample,
                ),
            ).into());
        }
        let train = train.truncate(train_len);
        let test  = test.truncate(test_len);
        tracing::info!("Subsampled by {}: {} train, {} test", cfg.subsample, train_len, test_len);

        // ── Step 3: Save config for inference ─────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 4: Run training loop (Layer 5) ───────────────────────────────
        let (model, report) = run_training(cfg, train, test, Some(&metrics))?;

        // ── Step 5: Persist the final weights ─────────────────────────────────
        ckpt_manager.save_model(&model)?;

        tracing::info!(
            "Finished {} epochs, final lr {:.2e}, metrics in '{}'",
            report.epochs_run,
            report.final_lr,
            metrics.csv_path().display(),
        );
        Ok(report)
    }
}
