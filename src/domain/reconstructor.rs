// ============================================================
// Layer 3 — Reconstructor
// ============================================================
// Turns an ordered list of glyphs into a text string:
//
//   for each glyph (left → right):
//       char  = alphabet[classifier(glyph)]
//       gap   = next.x - (this.x + this.width)      (0 for the last glyph)
//       if gap > this.width / 4 → append a space
//
// A quarter of the glyph width is roughly the spacing between
// letters of the same word in handwriting; anything wider is
// read as a word boundary.

use crate::domain::{alphabet::LabelAlphabet, glyph::GlyphCandidate, traits::GlyphClassifier};
use crate::error::OcrResult;

/// Classify `glyphs` in order and join them into one string.
///
/// `glyphs` must already be sorted by `x_offset`, as returned by the
/// segmenter. An empty slice yields an empty string.
pub fn reconstruct<C>(
    glyphs:     &[GlyphCandidate],
    classifier: &C,
    alphabet:   &LabelAlphabet,
) -> OcrResult<String>
where
    C: GlyphClassifier + ?Sized,
{
    let mut out = String::with_capacity(glyphs.len() * 2);

    for (i, glyph) in glyphs.iter().enumerate() {
        let class = classifier.classify(&glyph.image)?;
        out.push(alphabet.char_at(class)?);

        let gap = glyphs.get(i + 1).map_or(0, |next| glyph.gap_to(next));
        if is_word_break(gap, glyph.width) {
            out.push(' ');
        }
    }

    tracing::debug!("Reconstructed {} glyphs into '{}'", glyphs.len(), out);
    Ok(out)
}

/// True when the horizontal gap after a glyph of `width` pixels
/// separates two words.
pub fn is_word_break(gap: i64, width: u32) -> bool {
    gap as f64 > f64::from(width) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use image::{GrayImage, Luma};
    use std::cell::Cell;

    /// Returns class indices from a fixed script, one per call.
    struct ScriptedClassifier {
        script: Vec<usize>,
        calls:  Cell<usize>,
    }

    impl ScriptedClassifier {
        fn new(script: Vec<usize>) -> Self {
            Self { script, calls: Cell::new(0) }
        }
    }

    impl GlyphClassifier for ScriptedClassifier {
        fn classify(&self, _glyph: &GrayImage) -> OcrResult<usize> {
            let i = self.calls.get();
            self.calls.set(i + 1);
            Ok(self.script[i])
        }
    }

    /// Reads the class index from the glyph's top-left pixel.
    struct PixelClassifier;

    impl GlyphClassifier for PixelClassifier {
        fn classify(&self, glyph: &GrayImage) -> OcrResult<usize> {
            Ok(glyph.get_pixel(0, 0).0[0] as usize)
        }
    }

    fn glyph(x: u32, w: u32) -> GlyphCandidate {
        GlyphCandidate::new(x, 0, w, 20, GrayImage::new(28, 28))
    }

    fn labelled_glyph(x: u32, w: u32, class: u8) -> GlyphCandidate {
        GlyphCandidate::new(x, 0, w, 20, GrayImage::from_pixel(28, 28, Luma([class])))
    }

    const ALPHABET: LabelAlphabet = LabelAlphabet::EMNIST_BYCLASS;

    #[test]
    fn test_empty_glyphs_give_empty_string() {
        let out = reconstruct(&[], &ScriptedClassifier::new(vec![]), &ALPHABET).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_wide_gap_inserts_one_space() {
        // gap = 40 - (0 + 20) = 20 > 20 / 4
        let glyphs = vec![glyph(0, 20), glyph(40, 20)];
        let classifier = ScriptedClassifier::new(vec![17, 14]); // 'H', 'E'
        let out = reconstruct(&glyphs, &classifier, &ALPHABET).unwrap();
        assert_eq!(out, "H E");
    }

    #[test]
    fn test_zero_gap_inserts_no_space() {
        let glyphs = vec![glyph(0, 20), glyph(20, 20)];
        let classifier = ScriptedClassifier::new(vec![1, 2]);
        let out = reconstruct(&glyphs, &classifier, &ALPHABET).unwrap();
        assert_eq!(out, "12");
    }

    #[test]
    fn test_gap_equal_to_quarter_width_is_not_a_break() {
        // gap = 25 - 20 = 5, width / 4 = 5 → not strictly greater
        let glyphs = vec![glyph(0, 20), glyph(25, 20)];
        let classifier = ScriptedClassifier::new(vec![36, 37]);
        let out = reconstruct(&glyphs, &classifier, &ALPHABET).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_last_glyph_never_gets_trailing_space() {
        let glyphs = vec![glyph(0, 4)];
        let classifier = ScriptedClassifier::new(vec![10]);
        let out = reconstruct(&glyphs, &classifier, &ALPHABET).unwrap();
        assert_eq!(out, "A");
    }

    #[test]
    fn test_each_glyph_classified_in_order() {
        // "hi yo": 'h'=43, 'i'=44, 'y'=60, 'o'=50
        let glyphs = vec![
            labelled_glyph(0, 10, 43),
            labelled_glyph(11, 10, 44),
            labelled_glyph(40, 10, 60),
            labelled_glyph(51, 10, 50),
        ];
        let out = reconstruct(&glyphs, &PixelClassifier, &ALPHABET).unwrap();
        assert_eq!(out, "hi yo");
    }

    #[test]
    fn test_unknown_class_is_error() {
        let glyphs = vec![glyph(0, 10)];
        let classifier = ScriptedClassifier::new(vec![99]);
        let err = reconstruct(&glyphs, &classifier, &ALPHABET).unwrap_err();
        assert!(matches!(err, OcrError::UnknownClass(99)));
    }

    #[test]
    fn test_is_word_break_threshold() {
        assert!(is_word_break(6, 20));
        assert!(!is_word_break(5, 20));
        assert!(!is_word_break(0, 20));
        assert!(!is_word_break(-3, 20));
        // fractional quarter: 7 / 4 = 1.75
        assert!(is_word_break(2, 7));
        assert!(!is_word_break(1, 7));
    }
}
