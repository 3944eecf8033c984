// ============================================================
// Layer 5 — Reduce-on-Plateau Learning Rate
// ============================================================
// Burn's LrScheduler steps per iteration and knows nothing about
// validation metrics, so the plateau policy is driven by hand
// from the epoch loop:
//
//   metric improved by more than min_delta → remember it, wait = 0
//   otherwise                              → wait += 1
//   wait reached patience and lr > min_lr  → lr = max(lr·factor, min_lr),
//                                            wait = 0
//
// The monitored metric is validation accuracy (higher is better).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateauConfig {
    /// Epochs without improvement before the rate is cut
    pub patience:  usize,
    /// Multiplier applied on each cut
    pub factor:    f64,
    /// The rate never drops below this
    pub min_lr:    f64,
    /// Improvements at or below this size do not count
    pub min_delta: f64,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self { patience: 3, factor: 0.5, min_lr: 1e-5, min_delta: 1e-4 }
    }
}

#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    cfg:  PlateauConfig,
    lr:   f64,
    best: Option<f64>,
    wait: usize,
}

impl ReduceLrOnPlateau {
    pub fn new(initial_lr: f64, cfg: PlateauConfig) -> Self {
        Self { cfg, lr: initial_lr, best: None, wait: 0 }
    }

    /// Learning rate for the next epoch
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Feed one epoch's validation accuracy and return the learning rate
    /// to use for the next epoch.
    pub fn step(&mut self, metric: f64) -> f64 {
        let improved = match self.best {
            None       => true,
            Some(best) => metric - self.cfg.min_delta > best,
        };

        if improved {
            self.best = Some(metric);
            self.wait = 0;
            return self.lr;
        }

        self.wait += 1;
        if self.wait >= self.cfg.patience && self.lr > self.cfg.min_lr {
            let reduced = (self.lr * self.cfg.factor).max(self.cfg.min_lr);
            tracing::info!(
                "Validation accuracy plateaued for {} epochs: lr {:.2e} → {:.2e}",
                self.wait, self.lr, reduced
            );
            self.lr   = reduced;
            self.wait = 0;
        }
        self.lr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improving_metric_keeps_lr() {
        let mut s = ReduceLrOnPlateau::new(1e-3, PlateauConfig::default());
        for acc in [0.1, 0.2, 0.3, 0.4, 0.5] {
            assert_eq!(s.step(acc), 1e-3);
        }
    }

    #[test]
    fn test_halves_after_patience_epochs() {
        let mut s = ReduceLrOnPlateau::new(1e-3, PlateauConfig::default());
        assert_eq!(s.step(0.5), 1e-3); // best
        assert_eq!(s.step(0.5), 1e-3); // wait 1
        assert_eq!(s.step(0.4), 1e-3); // wait 2
        assert_eq!(s.step(0.5), 5e-4); // wait 3 → cut
        assert_eq!(s.step(0.5), 5e-4); // wait restarts
    }

    #[test]
    fn test_tiny_improvement_does_not_count() {
        let mut s = ReduceLrOnPlateau::new(1.0, PlateauConfig::default());
        s.step(0.5);
        s.step(0.50005);
        s.step(0.50009);
        assert_eq!(s.step(0.5), 0.5);
    }

    #[test]
    fn test_lr_floors_at_min_lr() {
        let cfg = PlateauConfig { patience: 1, ..PlateauConfig::default() };
        let mut s = ReduceLrOnPlateau::new(4e-5, cfg);
        s.step(0.9);
        assert_eq!(s.step(0.9), 2e-5);
        assert_eq!(s.step(0.9), 1e-5);
        assert_eq!(s.step(0.9), 1e-5);
        assert_eq!(s.step(0.9), 1e-5);
    }
}
