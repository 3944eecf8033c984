// ============================================================
// Layer 3 — Label Alphabet
// ============================================================
// The ordered set of characters the classifier can emit.
// Position in the table is the network's output class index.
//
// EMNIST "byclass" orders its 62 classes as:
//   0-9   → classes  0..10
//   A-Z   → classes 10..36
//   a-z   → classes 36..62

use crate::error::{OcrError, OcrResult};

const EMNIST_BYCLASS_CODES: [u8; 62] = *b"0123456789\
ABCDEFGHIJKLMNOPQRSTUVWXYZ\
abcdefghijklmnopqrstuvwxyz";

/// An immutable, ordered table of ASCII code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelAlphabet {
    codes: &'static [u8],
}

impl LabelAlphabet {
    /// The EMNIST byclass mapping used by the dataset and the classifier
    pub const EMNIST_BYCLASS: LabelAlphabet = LabelAlphabet { codes: &EMNIST_BYCLASS_CODES };

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Map a class index back to its character.
    pub fn char_at(&self, index: usize) -> OcrResult<char> {
        self.codes
            .get(index)
            .map(|&c| c as char)
            .ok_or(OcrError::UnknownClass(index))
    }
}

impl Default for LabelAlphabet {
    fn default() -> Self {
        Self::EMNIST_BYCLASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emnist_layout() {
        let a = LabelAlphabet::EMNIST_BYCLASS;
        assert_eq!(a.len(), 62);
        assert_eq!(a.char_at(0).unwrap(), '0');
        assert_eq!(a.char_at(9).unwrap(), '9');
        assert_eq!(a.char_at(10).unwrap(), 'A');
        assert_eq!(a.char_at(35).unwrap(), 'Z');
        assert_eq!(a.char_at(36).unwrap(), 'a');
        assert_eq!(a.char_at(61).unwrap(), 'z');
    }

    #[test]
    fn test_out_of_range_is_error() {
        let a = LabelAlphabet::EMNIST_BYCLASS;
        assert!(matches!(a.char_at(62), Err(OcrError::UnknownClass(62))));
    }
}
