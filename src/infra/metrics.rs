// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean categorical cross-entropy over training batches
//   - train_acc:  fraction of training glyphs classified correctly
//   - val_loss:   mean cross-entropy on the held-out split
//   - val_acc:    fraction of held-out glyphs classified correctly
//   - lr:         learning rate used during the epoch
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,train_acc,val_loss,val_acc,lr
//   1,1.284100,0.641200,0.702300,0.781000,0.00100000
//   2,0.655000,0.792700,0.590100,0.810500,0.00100000
//
// How to read the metrics:
//   - A flat val_acc for 3 epochs is what halves lr
//   - val_loss rising while train_loss falls → overfitting
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average cross-entropy loss over all training batches.
    /// Random initialisation gives about ln(62) ≈ 4.13
    pub train_loss: f64,

    /// Fraction of training samples predicted correctly
    pub train_acc: f64,

    /// Average cross-entropy loss on the validation split
    pub val_loss: f64,

    /// Fraction of validation samples predicted correctly.
    /// This is the value the plateau scheduler watches.
    pub val_acc: f64,

    /// Learning rate the optimiser used for this epoch
    pub lr: f64,
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Appending across runs keeps earlier history
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,train_acc,val_loss,val_acc,lr")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.8}",
            m.epoch,
            m.train_loss,
            m.train_acc,
            m.val_loss,
            m.val_acc,
            m.lr,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.val_acc,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, val_acc: f64) -> EpochMetrics {
        EpochMetrics { epoch, train_loss: 2.5, train_acc: 0.3, val_loss: 2.3, val_acc, lr: 1e-3 }
    }

    #[test]
    fn test_log_appends_rows_after_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = MetricsLogger::new(dir.path()).unwrap();
        logger.log(&metrics(1, 0.4)).unwrap();
        logger.log(&metrics(2, 0.5)).unwrap();

        // Re-opening must not duplicate the header
        let logger = MetricsLogger::new(dir.path()).unwrap();
        let csv = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "epoch,train_loss,train_acc,val_loss,val_acc,lr");
        assert!(lines[2].starts_with("2,2.500000,0.300000,2.300000,0.500000,"));
    }
}
