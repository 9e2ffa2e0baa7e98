//! Combining-mark stripping used for cache key hashing.

use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Decompose `text` canonically (NFD) and drop every nonspacing mark.
///
/// "é" (U+00E9) and "e" + U+0301 both come out as "e". The result stays in
/// decomposed form; it is only ever fed to the hasher.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| get_general_category(*c) != GeneralCategory::NonspacingMark)
        .collect()
}
