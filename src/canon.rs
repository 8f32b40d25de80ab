//! Canonicalization for tolerant comparison.
//!
//! `canon` is applied only when comparing text; stored and emitted text is
//! never canonicalized in place.

use unicode_normalization::UnicodeNormalization;

/// Normalizes `s` for tolerant comparison: Unicode NFC, then a fixed
/// character-to-character punctuation fold. Idempotent and line-break
/// preserving.
pub fn canon(s: &str) -> String {
    s.nfc().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        '\u{002D}' | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}'
        | '\u{2212}' => '-',
        '\u{0022}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
        '\u{0027}' | '\u{2018}' | '\u{2019}' | '\u{201B}' => '\'',
        '\u{00A0}' | '\u{202F}' => ' ',
        other => other,
    }
}
