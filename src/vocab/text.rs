use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Canonical form used for every vocabulary key and every lookup.
pub fn normalize(word: &str) -> String {
    if is_nfc(word) {
        word.to_string()
    } else {
        word.nfc().collect()
    }
}

/// Trims surrounding whitespace from user input, then normalizes it.
pub fn normalize_input(raw: &str) -> String {
    normalize(raw.trim())
}
