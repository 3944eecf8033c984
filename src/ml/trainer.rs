// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and Adam.
//
// Key Burn insight:
//   - Training uses TrainBackend (Autodiff<…>) for gradients
//   - model.valid() returns the model on the inner backend
//   - Validation batcher must also use the inner backend
//   - argmax(1) returns [batch,1] so we flatten before .equal()
//
// The learning rate is not fixed: ReduceLrOnPlateau watches
// validation accuracy and halves the rate when it stalls.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use std::time::Instant;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::GlyphBatcher, dataset::GlyphDataset, preprocessor::Preprocessor};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{count_correct, GlyphCnn};
use crate::ml::scheduler::ReduceLrOnPlateau;
use crate::ml::TrainBackend;

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Training samples seen per epoch (after subsampling)
    pub samples_per_epoch: usize,
    pub epochs_run:        usize,
    pub final_lr:          f64,
    pub history:           Vec<EpochMetrics>,
}

/// Train on the default device of the configured backend.
pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: GlyphDataset,
    val_dataset:   GlyphDataset,
    metrics:       Option<&MetricsLogger>,
) -> Result<(GlyphCnn<TrainBackend>, TrainingReport)> {
    let device = <TrainBackend as Backend>::Device::default();
    tracing::info!("Using device: {:?}", device);
    train::<TrainBackend>(cfg, train_dataset, val_dataset, metrics, device)
}

pub fn train<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: GlyphDataset,
    val_dataset:   GlyphDataset,
    metrics:       Option<&MetricsLogger>,
    device:        B::Device,
) -> Result<(GlyphCnn<B>, TrainingReport)> {
    let started = Instant::now();
    B::seed(cfg.seed);

    // ── Build model ───────────────────────────────────────────────────────────
    let mut model: GlyphCnn<B> = cfg.model_config().init(&device);
    tracing::info!("Model ready: {:?} variant, {} classes", cfg.variant, cfg.num_classes);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    // m = β1*m + (1-β1)*g        (mean)
    // v = β2*v + (1-β2)*g²       (variance)
    // θ = θ - lr * m / (√v + ε)  (update)
    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();
    let mut scheduler = ReduceLrOnPlateau::new(cfg.lr, cfg.plateau);

    let preprocessor      = Preprocessor::new(cfg.num_classes);
    let samples_per_epoch = train_dataset.sample_count();
    let val_samples       = val_dataset.sample_count();

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = GlyphBatcher::<B>::new(device.clone(), preprocessor);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = GlyphBatcher::<B::InnerBackend>::new(device.clone(), preprocessor);
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    tracing::info!("Training on {} samples, validating on {}", samples_per_epoch, val_samples);

    let mut history = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let lr = scheduler.lr();

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;
        let mut train_correct  = 0usize;
        let mut train_seen     = 0usize;

        for batch in train_loader.iter() {
            train_seen += batch.labels.dims()[0];
            let (loss, logits) = model.forward_loss(batch.images, batch.targets);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            train_batches  += 1;
            train_correct  += count_correct(logits, batch.labels);

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → GlyphCnn<B::InnerBackend>, dropout disabled
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;
        let mut val_correct  = 0usize;
        let mut val_seen     = 0usize;

        for batch in val_loader.iter() {
            val_seen += batch.labels.dims()[0];
            let (loss, logits) = model_valid.forward_loss(batch.images, batch.targets);
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
            val_correct  += count_correct(logits, batch.labels);
        }

        let row = EpochMetrics {
            epoch,
            train_loss: mean(train_loss_sum, train_batches),
            train_acc:  ratio(train_correct, train_seen),
            val_loss:   mean(val_loss_sum, val_batches),
            val_acc:    ratio(val_correct, val_seen),
            lr,
        };

        println!(
            "Epoch {:>3}/{} | loss={:.4} | acc={:.1}% | val_loss={:.4} | val_acc={:.1}% | lr={:.2e}",
            epoch, cfg.epochs, row.train_loss, row.train_acc * 100.0,
            row.val_loss, row.val_acc * 100.0, lr,
        );
        tracing::debug!("Epoch {} consumed {} training samples", epoch, train_seen);

        if let Some(logger) = metrics {
            logger.log(&row)?;
        }

        scheduler.step(row.val_acc);
        history.push(row);
    }

    let elapsed = started.elapsed();
    println!("Total training time: {:.1}s", elapsed.as_secs_f64());
    tracing::info!("Training complete in {:?}", elapsed);

    let report = TrainingReport {
        samples_per_epoch,
        epochs_run: history.len(),
        final_lr:   scheduler.lr(),
        history,
    };
    Ok((model, report))
}

fn mean(sum: f64, n: usize) -> f64 {
    if n > 0 { sum / n as f64 } else { f64::NAN }
}

fn ratio(hits: usize, total: usize) -> f64 {
    if total > 0 { hits as f64 / total as f64 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{GlyphSample, GLYPH_SIDE};
    use crate::ml::model::ClassifierVariant;
    use burn::backend::{Autodiff, NdArray};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    type TestBackend = Autodiff<NdArray>;

    fn random_dataset(n: usize, seed: u64) -> GlyphDataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let samples = (0..n)
            .map(|_| GlyphSample {
                pixels: (0..GLYPH_SIDE * GLYPH_SIDE).map(|_| rng.gen()).collect(),
                label:  rng.gen_range(0..62),
            })
            .collect();
        GlyphDataset::from_samples(samples)
    }

    fn tiny_config() -> TrainConfig {
        TrainConfig {
            batch_size: 8,
            epochs:     2,
            variant:    ClassifierVariant::ThreeBlock,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_runs_every_epoch_and_reports_metrics() {
        let cfg = tiny_config();
        let (_, report) = train::<TestBackend>(
            &cfg, random_dataset(20, 1), random_dataset(10, 2), None, Default::default(),
        ).unwrap();

        assert_eq!(report.samples_per_epoch, 20);
        assert_eq!(report.epochs_run, 2);
        assert_eq!(report.history.len(), 2);
        for row in &report.history {
            assert!(row.train_loss.is_finite());
            assert!((0.0..=1.0).contains(&row.val_acc));
            assert_eq!(row.lr, cfg.lr);
        }
        assert_eq!(report.final_lr, cfg.lr);
    }

    #[test]
    fn test_metrics_rows_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let cfg = TrainConfig { epochs: 1, ..tiny_config() };
        train::<TestBackend>(
            &cfg, random_dataset(8, 3), random_dataset(8, 4), Some(&logger), Default::default(),
        ).unwrap();

        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }
}
