//! Canonical comparison keys for SKUs, aliases, and variation labels.
//!
//! Order exports spell the same SKU with inconsistent casing, spacing, and
//! accents ("Colchão PR", "colchao  pr", "COLCHAO-PR"). Every lookup in the
//! category map goes through [`normalize_token`] so that all spellings collapse
//! to one key. [`squash`] is the looser sibling used by the variation override
//! rules, which need to see punctuation such as `+`.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Reduces text to a comparison key: accents stripped, case folded, and every
/// character outside `[a-z0-9]` removed.
///
/// Idempotent: `normalize_token(normalize_token(x)) == normalize_token(x)`.
/// Empty input yields the empty key.
pub fn normalize_token(text: &str) -> String {
    strip_accents(text)
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Like [`normalize_token`] but keeps punctuation: accents stripped, case
/// folded, whitespace removed.
///
/// The `+capa` override rule matches against this form, since the `+` sign
/// carries meaning in variation labels ("Encosto + Capa").
pub fn squash(text: &str) -> String {
    strip_accents(text)
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|ch| !is_combining_mark(*ch)).collect()
}
