// ============================================================
// Layer 4 — Sample Preprocessor
// ============================================================
// Turns raw dataset bytes into what the network trains on:
//
//   1. Subsample  — keep the first len / divisor samples of a
//                   split for faster iteration (divisor 1 = all)
//   2. Normalise  — u8 pixel 0..=255  →  f32 0.0..=1.0
//   3. One-hot    — class index k     →  [0, …, 1 (at k), …, 0]
//
// Orientation is NOT touched here: EMNIST images are already in
// the orientation the network learns. Segmented page glyphs go
// through vision::canonical instead.
//
// Reference: Rust Book §13 (Iterators)

/// Stateless helper bound to the size of the label alphabet.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    num_classes: usize,
}

impl Preprocessor {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Scale 8-bit pixels into `[0, 1]`.
    pub fn normalize(&self, pixels: &[u8]) -> Vec<f32> {
        pixels.iter().map(|&p| f32::from(p) / 255.0).collect()
    }

    /// One-hot vector of length `num_classes` with a 1 at `label`.
    /// Out-of-range labels yield an all-zero vector.
    pub fn one_hot(&self, label: usize) -> Vec<f32> {
        let mut v = vec![0.0; self.num_classes];
        if let Some(slot) = v.get_mut(label) {
            *slot = 1.0;
        }
        v
    }
}

/// Number of samples kept when a split of `len` is cut down by `divisor`.
pub fn subsample_len(len: usize, divisor: usize) -> usize {
    if divisor <= 1 {
        len
    } else {
        len / divisor
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let p = Preprocessor::new(62);
        assert_eq!(p.normalize(&[0, 255, 51]), vec![0.0, 1.0, 0.2]);
    }

    #[test]
    fn test_one_hot_has_single_one() {
        let p = Preprocessor::new(62);
        let v = p.one_hot(36);
        assert_eq!(v.len(), 62);
        assert_eq!(v[36], 1.0);
        assert_eq!(v.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_one_hot_out_of_range_is_zero() {
        let p = Preprocessor::new(4);
        assert_eq!(p.one_hot(4), vec![0.0; 4]);
    }

    #[test]
    fn test_subsample_tenth() {
        assert_eq!(subsample_len(1000, 10), 100);
        assert_eq!(subsample_len(697_932, 10), 69_793);
        assert_eq!(subsample_len(9, 10), 0);
    }

    #[test]
    fn test_subsample_disabled() {
        assert_eq!(subsample_len(123, 1), 123);
        assert_eq!(subsample_len(123, 0), 123);
    }
}
